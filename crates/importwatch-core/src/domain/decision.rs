//! Decision model: what the poll loop does after one poll cycle.
//!
//! `StatusPoller::poll_once` returns a `PollDecision`; `StatusPoller::run`
//! executes it. Deciding is pure, executing (sleep / reload) is not.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::errors::FetchError;
use super::status::JobStatus;

/// The next action after a poll cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum PollDecision {
    /// Poll again after a delay.
    Reschedule { delay: Duration, reason: String },

    /// The server reports a different status: reload the job view.
    Reload { observed: JobStatus },

    /// Stop polling without reloading.
    Stop { reason: StopReason },
}

impl PollDecision {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            PollDecision::Reschedule { .. } => "reschedule",
            PollDecision::Reload { .. } => "reload",
            PollDecision::Stop { .. } => "stop",
        }
    }
}

/// Why the loop stopped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StopReason {
    /// The status the loop compares against is not pending.
    NotPending { status: JobStatus },

    /// A request failed and the failure policy does not retry it.
    FetchFailed { error: String },

    /// Consecutive failures reached the retry limit.
    RetriesExhausted { attempts: u32, last_error: String },
}

impl StopReason {
    pub fn fetch_failed(err: &FetchError) -> Self {
        StopReason::FetchFailed {
            error: err.to_string(),
        }
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::NotPending { status } => write!(f, "status {status} is not pending"),
            StopReason::FetchFailed { error } => write!(f, "fetch failed: {error}"),
            StopReason::RetriesExhausted {
                attempts,
                last_error,
            } => write!(f, "gave up after {attempts} failed attempts: {last_error}"),
        }
    }
}
