//! Status endpoint resolution.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::Url;

use crate::domain::{ConfigError, JobId, JobPage};

/// Suffix appended to the page url by `EndpointStrategy::PageRelative`.
pub const DEFAULT_SUFFIX: &str = "get/";

/// Placeholder substituted by `EndpointStrategy::Template`.
pub const JOB_ID_PLACEHOLDER: &str = "{job_id}";

/// Everything except RFC 3986 unreserved characters, so a job id stays one
/// path segment (`/`, `?`, `#`, `%` are all escaped).
const JOB_ID_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// How the status endpoint url is obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndpointStrategy {
    /// Absolute url handed over by the page.
    Explicit(String),

    /// Page url + fixed suffix (`http://host/logs/12/` -> `http://host/logs/12/get/`).
    PageRelative { page_url: String, suffix: String },

    /// Url pattern with a `{job_id}` placeholder; the id is percent-encoded.
    Template { pattern: String },
}

impl EndpointStrategy {
    /// Pick a strategy from page data.
    ///
    /// Precedence: page `status_url`, then `template`, then page `page_url`.
    pub fn from_page(
        page: &JobPage,
        template: Option<&str>,
        suffix: &str,
    ) -> Result<Self, ConfigError> {
        if let Some(url) = &page.status_url {
            return Ok(EndpointStrategy::Explicit(url.clone()));
        }
        if let Some(pattern) = template {
            return Ok(EndpointStrategy::Template {
                pattern: pattern.to_string(),
            });
        }
        if let Some(page_url) = &page.page_url {
            return Ok(EndpointStrategy::PageRelative {
                page_url: page_url.clone(),
                suffix: suffix.to_string(),
            });
        }
        Err(ConfigError::NoEndpoint)
    }

    /// Build the absolute endpoint url.
    ///
    /// `job_id` is only read by `Template`.
    pub fn resolve(&self, job_id: Option<&JobId>) -> Result<Url, ConfigError> {
        match self {
            EndpointStrategy::Explicit(url) => parse_url(url),
            EndpointStrategy::PageRelative { page_url, suffix } => {
                let mut url = parse_url(page_url)?;
                // location + suffix, without carrying query or fragment over
                let mut path = url.path().to_string();
                if !path.ends_with('/') {
                    path.push('/');
                }
                path.push_str(suffix.trim_start_matches('/'));
                url.set_path(&path);
                url.set_query(None);
                url.set_fragment(None);
                Ok(url)
            }
            EndpointStrategy::Template { pattern } => {
                let job_id = job_id.ok_or(ConfigError::MissingJobId)?;
                let segment = utf8_percent_encode(job_id.as_str(), JOB_ID_SEGMENT).to_string();
                parse_url(&pattern.replace(JOB_ID_PLACEHOLDER, &segment))
            }
        }
    }
}

fn parse_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme {}", url.scheme()),
        });
    }
    Ok(url)
}
