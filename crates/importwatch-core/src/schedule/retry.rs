//! Retry policy: decides backoff delays after failed requests.

use std::time::Duration;

/// Backoff for failed status requests.
///
/// Only used by `FailurePolicy::Retry`; the default policy never retries.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Delay after the first failure.
    pub base_delay: Duration,

    /// Backoff multiplier for exponential backoff.
    pub multiplier: f64,

    /// Upper bound for a single delay.
    pub max_delay: Duration,
}

impl RetryPolicy {
    pub fn new(base_delay: Duration) -> Self {
        Self {
            base_delay,
            ..Self::default()
        }
    }

    /// Delay before the next attempt.
    ///
    /// `failures` is the number of consecutive failures so far (1-indexed).
    /// delay = base_delay * multiplier^(failures - 1), capped at `max_delay`.
    ///
    /// With base_delay=2s, multiplier=2.0:
    /// - failure 1: 2s
    /// - failure 2: 4s
    /// - failure 3: 8s
    pub fn next_delay(&self, failures: u32) -> Duration {
        let exponent = failures.saturating_sub(1).min(i32::MAX as u32) as i32;
        let delay_secs = self.base_delay.as_secs_f64() * self.multiplier.powi(exponent);
        if !delay_secs.is_finite() || delay_secs >= self.max_delay.as_secs_f64() {
            return self.max_delay;
        }
        Duration::from_secs_f64(delay_secs)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_secs(2),
            multiplier: 2.0,
            max_delay: Duration::from_secs(60),
        }
    }
}
