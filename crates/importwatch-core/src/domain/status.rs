//! Import job status as reported by the server.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Status of an import job.
///
/// The wire value is a free-form string. `created` / `running` are the
/// pending values written when the job is queued and picked up;
/// `Finished` / `Errors` are written by the import task when it completes.
/// Anything else is kept verbatim in `Other` and treated as terminal.
///
/// Equality is on the exact wire string: `"finished"` is not `Finished`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobStatus {
    /// Queued, not yet picked up.
    Created,

    /// Picked up by the import task.
    Running,

    /// Completed without row errors.
    Finished,

    /// Completed with row errors.
    Errors,

    /// Any other value (e.g. `done`, `failed`).
    Other(String),
}

impl JobStatus {
    pub const CREATED: &'static str = "created";
    pub const RUNNING: &'static str = "running";
    pub const FINISHED: &'static str = "Finished";
    pub const ERRORS: &'static str = "Errors";

    pub fn parse(value: &str) -> Self {
        match value {
            Self::CREATED => JobStatus::Created,
            Self::RUNNING => JobStatus::Running,
            Self::FINISHED => JobStatus::Finished,
            Self::ERRORS => JobStatus::Errors,
            other => JobStatus::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            JobStatus::Created => Self::CREATED,
            JobStatus::Running => Self::RUNNING,
            JobStatus::Finished => Self::FINISHED,
            JobStatus::Errors => Self::ERRORS,
            JobStatus::Other(s) => s,
        }
    }

    /// Is this a status the poller keeps watching?
    pub fn is_pending(&self) -> bool {
        matches!(self, JobStatus::Created | JobStatus::Running)
    }

    pub fn is_terminal(&self) -> bool {
        !self.is_pending()
    }
}

impl From<String> for JobStatus {
    fn from(value: String) -> Self {
        match Self::parse(&value) {
            JobStatus::Other(_) => JobStatus::Other(value),
            known => known,
        }
    }
}

impl From<&str> for JobStatus {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<JobStatus> for String {
    fn from(status: JobStatus) -> Self {
        match status {
            JobStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
