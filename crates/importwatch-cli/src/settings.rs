//! Command line / environment -> page data and poller configuration.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::ArgMatches;
use importwatch_core::PollerConfig;
use importwatch_core::domain::{JobId, JobPage, JobStatus};
use importwatch_core::impls::EndpointStrategy;
use importwatch_core::schedule::{FailurePolicy, PollIntervals, RetryPolicy};

/// Everything `main` needs to run one poller.
#[derive(Debug, Clone)]
pub struct Settings {
    pub page: JobPage,
    pub url_template: Option<String>,
    pub suffix: String,
    pub config: PollerConfig,
    pub json_output: bool,
}

impl Settings {
    pub fn from_matches(matches: &ArgMatches) -> Result<Self> {
        let page = page_from_matches(matches)?;

        let intervals = PollIntervals {
            created: Duration::from_millis(required::<u64>(matches, "created-interval-ms")?),
            running: Duration::from_millis(required::<u64>(matches, "running-interval-ms")?),
        };

        let failure = match matches.get_one::<u32>("retry-max-attempts") {
            Some(&max_attempts) => {
                let base = Duration::from_millis(required::<u64>(matches, "retry-base-ms")?);
                FailurePolicy::retry(RetryPolicy::new(base), max_attempts)?
            }
            None => FailurePolicy::Stop,
        };

        let config = PollerConfig::default()
            .with_intervals(intervals)
            .with_failure_policy(failure)
            .with_request_timeout(Duration::from_secs(required::<u64>(matches, "timeout-secs")?));

        Ok(Self {
            page,
            url_template: matches.get_one::<String>("url-template").cloned(),
            suffix: required::<String>(matches, "suffix")?,
            config,
            json_output: matches.get_flag("json"),
        })
    }

    /// Endpoint strategy for the page. Only needed when the status is pending.
    pub fn endpoint(&self) -> Result<EndpointStrategy> {
        Ok(EndpointStrategy::from_page(
            &self.page,
            self.url_template.as_deref(),
            &self.suffix,
        )?)
    }
}

fn page_from_matches(matches: &ArgMatches) -> Result<JobPage> {
    let mut page = match matches.get_one::<String>("page-data") {
        Some(path) => JobPage::from_file(path)
            .with_context(|| format!("failed to load page data from {path}"))?,
        None => match matches.get_one::<String>("status") {
            Some(status) => JobPage::new(JobStatus::parse(status)),
            None => bail!("no job status: pass --status or --page-data"),
        },
    };

    if let Some(status) = matches.get_one::<String>("status") {
        page.status = JobStatus::parse(status);
    }
    if let Some(job_id) = matches.get_one::<String>("job-id") {
        page.job_id = Some(JobId::new(job_id.as_str()));
    }
    if let Some(url) = matches.get_one::<String>("status-url") {
        page.status_url = Some(url.clone());
    }
    if let Some(url) = matches.get_one::<String>("page-url") {
        page.page_url = Some(url.clone());
    }
    Ok(page)
}

fn required<T: Clone + Send + Sync + 'static>(matches: &ArgMatches, id: &str) -> Result<T> {
    matches
        .get_one::<T>(id)
        .cloned()
        .with_context(|| format!("missing --{id}"))
}
