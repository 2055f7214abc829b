//! Status - poller の観測用スナップショット

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{JobId, JobStatus, PollerState};

/// Serializable view of a poller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollerStatus {
    pub job_id: Option<JobId>,

    /// Status the loop compares against.
    pub initial_status: JobStatus,

    #[serde(flatten)]
    pub state: PollerState,

    /// Requests issued.
    pub polls: u64,

    /// Requests that failed.
    pub failures: u64,

    pub last_observed: Option<JobStatus>,

    /// Sum of all delays the loop slept for.
    pub scheduled_delay_ms: u64,

    pub started_at: Option<DateTime<Utc>>,
    pub last_poll_at: Option<DateTime<Utc>>,
}
