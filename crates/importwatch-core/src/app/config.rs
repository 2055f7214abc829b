//! Poller configuration.

use std::time::Duration;

use crate::schedule::{FailurePolicy, PollIntervals};

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Tunables for one `StatusPoller`.
///
/// `Default` reproduces the page script: 1s while `created`, 10s while
/// `running`, stop on the first failed request.
#[derive(Debug, Clone, PartialEq)]
pub struct PollerConfig {
    pub intervals: PollIntervals,
    pub failure: FailurePolicy,
    pub request_timeout: Duration,
}

impl PollerConfig {
    pub fn with_intervals(mut self, intervals: PollIntervals) -> Self {
        self.intervals = intervals;
        self
    }

    pub fn with_failure_policy(mut self, failure: FailurePolicy) -> Self {
        self.failure = failure;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            intervals: PollIntervals::default(),
            failure: FailurePolicy::default(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}
