//! Page data and status response shapes.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::errors::PageDataError;
use super::ids::JobId;
use super::status::JobStatus;

/// Data embedded in the job detail page.
///
/// Read once when the poller starts; never refreshed.
///
/// ```json
/// { "status": "running", "job_id": 12, "status_url": "http://host/logs/12/get/" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPage {
    pub status: JobStatus,

    #[serde(default, deserialize_with = "deserialize_job_id")]
    pub job_id: Option<JobId>,

    /// Pre-built absolute status endpoint.
    #[serde(default)]
    pub status_url: Option<String>,

    /// URL of the page itself (endpoint may be derived from it).
    #[serde(default)]
    pub page_url: Option<String>,
}

impl JobPage {
    pub fn new(status: JobStatus) -> Self {
        Self {
            status,
            job_id: None,
            status_url: None,
            page_url: None,
        }
    }

    pub fn with_job_id(mut self, job_id: JobId) -> Self {
        self.job_id = Some(job_id);
        self
    }

    pub fn with_status_url(mut self, url: impl Into<String>) -> Self {
        self.status_url = Some(url.into());
        self
    }

    pub fn with_page_url(mut self, url: impl Into<String>) -> Self {
        self.page_url = Some(url.into());
        self
    }

    pub fn from_json_str(raw: &str) -> Result<Self, PageDataError> {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        if value.get("status").is_none_or(|s| s.is_null()) {
            return Err(PageDataError::MissingStatus);
        }
        Ok(serde_json::from_value(value)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PageDataError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }
}

/// Body returned by the status endpoint.
///
/// Only `status` is required; the server also echoes the job `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: JobStatus,

    #[serde(default)]
    pub id: Option<serde_json::Value>,
}

impl StatusResponse {
    pub fn new(status: JobStatus) -> Self {
        Self { status, id: None }
    }
}

fn deserialize_job_id<'de, D>(deserializer: D) -> Result<Option<JobId>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(u64),
        Text(String),
    }

    Ok(Option::<RawId>::deserialize(deserializer)?.map(|raw| match raw {
        RawId::Number(n) => JobId::from(n),
        RawId::Text(s) => JobId::new(s),
    }))
}
