//! Schedule - poll 間隔と失敗時の扱い
//!
//! - **PollIntervals**: pending status ごとの固定間隔（created: 1s, running: 10s）
//! - **FailurePolicy**: リクエスト失敗時に止まるか、backoff して再試行するか
//! - **RetryPolicy**: 再試行時の backoff 計算

mod retry;

pub use retry::RetryPolicy;

use std::time::Duration;

use crate::domain::{ConfigError, JobStatus};

/// Fixed delay between poll cycles, per pending status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollIntervals {
    pub created: Duration,
    pub running: Duration,
}

impl PollIntervals {
    /// Delay before the next poll, or `None` when `status` is not pending.
    pub fn for_status(&self, status: &JobStatus) -> Option<Duration> {
        match status {
            JobStatus::Created => Some(self.created),
            JobStatus::Running => Some(self.running),
            _ => None,
        }
    }
}

impl Default for PollIntervals {
    fn default() -> Self {
        Self {
            created: Duration::from_secs(1),
            running: Duration::from_secs(10),
        }
    }
}

/// What to do when a status request fails.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FailurePolicy {
    /// Stop polling silently.
    #[default]
    Stop,

    /// Retry transient failures with backoff, up to `max_attempts`
    /// consecutive failures.
    Retry {
        policy: RetryPolicy,
        max_attempts: u32,
    },
}

impl FailurePolicy {
    pub fn retry(policy: RetryPolicy, max_attempts: u32) -> Result<Self, ConfigError> {
        if max_attempts == 0 {
            return Err(ConfigError::ZeroRetryAttempts);
        }
        Ok(FailurePolicy::Retry {
            policy,
            max_attempts,
        })
    }
}
