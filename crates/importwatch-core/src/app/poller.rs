//! StatusPoller - import job の status を監視する poll loop
//!
//! 1 cycle = fetch → decide → (sleep | reload | stop)。
//! 次の cycle は前の cycle が終わってから始まるので、同時に 2 つの
//! リクエストが飛ぶことはない。
//!
//! 比較対象はつねに起動時の status（`initial_status`）。最後に観測した
//! status ではない。

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use super::config::PollerConfig;
use super::status::PollerStatus;
use crate::domain::{
    FetchError, JobId, JobPage, JobStatus, PollDecision, PollerState, StatusResponse, StopReason,
};
use crate::ports::{Clock, ReloadRequest, Reloader, StatusSource};
use crate::schedule::FailurePolicy;

/// Polls a status endpoint until the job's status changes, then reloads.
pub struct StatusPoller {
    job_id: Option<JobId>,
    initial_status: JobStatus,

    source: Arc<dyn StatusSource>,
    clock: Arc<dyn Clock>,
    reloader: Arc<dyn Reloader>,
    config: PollerConfig,

    state: PollerState,
    polls: u64,
    failures: u64,
    consecutive_failures: u32,
    last_observed: Option<JobStatus>,
    scheduled_delay: Duration,
    started_at: Option<DateTime<Utc>>,
    last_poll_at: Option<DateTime<Utc>>,
}

impl StatusPoller {
    /// Capture the page data. Nothing is fetched until `start` / `run`.
    pub fn new(
        page: &JobPage,
        source: Arc<dyn StatusSource>,
        clock: Arc<dyn Clock>,
        reloader: Arc<dyn Reloader>,
        config: PollerConfig,
    ) -> Self {
        Self {
            job_id: page.job_id.clone(),
            initial_status: page.status.clone(),
            source,
            clock,
            reloader,
            config,
            state: PollerState::Idle,
            polls: 0,
            failures: 0,
            consecutive_failures: 0,
            last_observed: None,
            scheduled_delay: Duration::ZERO,
            started_at: None,
            last_poll_at: None,
        }
    }

    pub fn state(&self) -> &PollerState {
        &self.state
    }

    pub fn initial_status(&self) -> &JobStatus {
        &self.initial_status
    }

    pub fn status(&self) -> PollerStatus {
        PollerStatus {
            job_id: self.job_id.clone(),
            initial_status: self.initial_status.clone(),
            state: self.state.clone(),
            polls: self.polls,
            failures: self.failures,
            last_observed: self.last_observed.clone(),
            scheduled_delay_ms: millis(self.scheduled_delay),
            started_at: self.started_at,
            last_poll_at: self.last_poll_at,
        }
    }

    /// Enter `Polling` if the initial status is pending.
    ///
    /// Returns whether the loop should run. A terminal initial status leaves
    /// the poller `Idle` and no request is ever issued.
    pub fn start(&mut self) -> bool {
        match &self.state {
            PollerState::Idle if self.initial_status.is_pending() => {
                self.started_at = Some(self.clock.now());
                self.state = PollerState::Polling {
                    status: self.initial_status.clone(),
                };
                tracing::info!(
                    job_id = ?self.job_id,
                    status = %self.initial_status,
                    endpoint = self.source.endpoint(),
                    "Status poller started"
                );
                true
            }
            PollerState::Idle => {
                tracing::debug!(
                    job_id = ?self.job_id,
                    status = %self.initial_status,
                    "Status is not pending, not polling"
                );
                false
            }
            PollerState::Polling { .. } => true,
            PollerState::Reloaded { .. } | PollerState::Stopped { .. } => false,
        }
    }

    /// Run until the poller reaches a terminal state.
    ///
    /// The first request is issued immediately.
    pub async fn run(&mut self) -> PollerState {
        if !self.start() {
            return self.state.clone();
        }
        while !self.state.is_terminal() {
            self.step().await;
        }
        self.state.clone()
    }

    /// One poll cycle: fetch, decide, then sleep / reload / stop.
    pub async fn step(&mut self) -> PollDecision {
        let decision = self.poll_once().await;
        self.apply(&decision).await;
        decision
    }

    /// Fetch once and decide what to do next. Does not sleep or reload.
    pub async fn poll_once(&mut self) -> PollDecision {
        let result = self.source.fetch().await;
        self.polls += 1;
        self.last_poll_at = Some(self.clock.now());

        match &result {
            Ok(response) => {
                self.consecutive_failures = 0;
                self.last_observed = Some(response.status.clone());
                self.check_echoed_id(response);
            }
            Err(err) => {
                self.failures += 1;
                self.consecutive_failures = self.consecutive_failures.saturating_add(1);
                tracing::debug!(
                    job_id = ?self.job_id,
                    endpoint = self.source.endpoint(),
                    error = %err,
                    consecutive_failures = self.consecutive_failures,
                    "Status request failed"
                );
            }
        }

        decide(
            &self.initial_status,
            &result,
            self.consecutive_failures,
            &self.config,
        )
    }

    async fn apply(&mut self, decision: &PollDecision) {
        match decision {
            PollDecision::Reschedule { delay, reason } => {
                tracing::debug!(
                    job_id = ?self.job_id,
                    delay_ms = millis(*delay),
                    reason = %reason,
                    "Next poll scheduled"
                );
                self.scheduled_delay = self.scheduled_delay.saturating_add(*delay);
                self.clock.sleep(*delay).await;
            }
            PollDecision::Reload { observed } => {
                tracing::info!(
                    job_id = ?self.job_id,
                    previous = %self.initial_status,
                    observed = %observed,
                    "Status changed, reloading"
                );
                self.state = PollerState::Reloaded {
                    observed: observed.clone(),
                };
                let request = ReloadRequest {
                    job_id: self.job_id.clone(),
                    previous: self.initial_status.clone(),
                    observed: observed.clone(),
                };
                self.reloader.reload(&request).await;
            }
            PollDecision::Stop { reason } => {
                match reason {
                    StopReason::NotPending { .. } => {
                        tracing::debug!(job_id = ?self.job_id, reason = %reason, "Polling stopped")
                    }
                    _ => tracing::warn!(job_id = ?self.job_id, reason = %reason, "Polling stopped"),
                }
                self.state = PollerState::Stopped {
                    reason: reason.clone(),
                };
            }
        }
    }

    fn check_echoed_id(&self, response: &StatusResponse) {
        if let (Some(job_id), Some(echoed)) = (&self.job_id, &response.id)
            && !job_id.matches_json(echoed)
        {
            tracing::warn!(
                job_id = %job_id,
                echoed = %echoed,
                "Status endpoint answered for a different job"
            );
        }
    }
}

/// Whole milliseconds, saturating at `u64::MAX`.
fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Pure decision for one poll cycle.
///
/// * `initial_status` - status the page was rendered with.
/// * `consecutive_failures` - failures in a row, including this one.
pub fn decide(
    initial_status: &JobStatus,
    result: &Result<StatusResponse, FetchError>,
    consecutive_failures: u32,
    config: &PollerConfig,
) -> PollDecision {
    match result {
        Ok(response) if response.status != *initial_status => PollDecision::Reload {
            observed: response.status.clone(),
        },
        Ok(_) => match config.intervals.for_status(initial_status) {
            Some(delay) => PollDecision::Reschedule {
                delay,
                reason: format!("status still {initial_status}"),
            },
            None => PollDecision::Stop {
                reason: StopReason::NotPending {
                    status: initial_status.clone(),
                },
            },
        },
        Err(err) => match &config.failure {
            FailurePolicy::Stop => PollDecision::Stop {
                reason: StopReason::fetch_failed(err),
            },
            FailurePolicy::Retry { .. } if !err.is_transient() => PollDecision::Stop {
                reason: StopReason::fetch_failed(err),
            },
            FailurePolicy::Retry { max_attempts, .. } if consecutive_failures >= *max_attempts => {
                PollDecision::Stop {
                    reason: StopReason::RetriesExhausted {
                        attempts: consecutive_failures,
                        last_error: err.to_string(),
                    },
                }
            }
            FailurePolicy::Retry {
                policy,
                max_attempts,
            } => {
                let delay = policy.next_delay(consecutive_failures);
                PollDecision::Reschedule {
                    delay,
                    reason: format!(
                        "retry {}/{} after {:?}: {err}",
                        consecutive_failures + 1,
                        max_attempts,
                        delay
                    ),
                }
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impls::{RecordingReloader, ScriptedSource};
    use crate::ports::ManualClock;
    use crate::schedule::RetryPolicy;
    use rstest::rstest;

    struct Harness {
        poller: StatusPoller,
        source: ScriptedSource,
        clock: ManualClock,
        reloader: RecordingReloader,
    }

    fn harness(initial: JobStatus, script: Vec<Result<StatusResponse, FetchError>>) -> Harness {
        harness_with(initial, script, PollerConfig::default())
    }

    fn harness_with(
        initial: JobStatus,
        script: Vec<Result<StatusResponse, FetchError>>,
        config: PollerConfig,
    ) -> Harness {
        let source = ScriptedSource::new(script);
        let clock = ManualClock::default();
        let reloader = RecordingReloader::new();
        let page = JobPage::new(initial).with_job_id(JobId::from(7));
        let poller = StatusPoller::new(
            &page,
            Arc::new(source.clone()),
            Arc::new(clock.clone()),
            Arc::new(reloader.clone()),
            config,
        );
        Harness {
            poller,
            source,
            clock,
            reloader,
        }
    }

    fn ok(status: JobStatus) -> Result<StatusResponse, FetchError> {
        Ok(StatusResponse::new(status))
    }

    fn network_error() -> Result<StatusResponse, FetchError> {
        Err(FetchError::Network("connection refused".into()))
    }

    #[rstest]
    #[case::finished(JobStatus::Finished)]
    #[case::errors(JobStatus::Errors)]
    #[case::done(JobStatus::Other("done".into()))]
    #[tokio::test]
    async fn terminal_initial_status_never_fetches(#[case] initial: JobStatus) {
        let mut h = harness(initial, vec![ok(JobStatus::Running)]);

        let state = h.poller.run().await;

        assert_eq!(state, PollerState::Idle);
        assert_eq!(h.source.calls(), 0);
        assert!(h.clock.sleeps().is_empty());
        assert!(h.reloader.requests().is_empty());
    }

    #[tokio::test]
    async fn created_unchanged_reschedules_after_one_second() {
        let mut h = harness(JobStatus::Created, vec![ok(JobStatus::Created)]);
        assert!(h.poller.start());

        let decision = h.poller.step().await;

        assert_eq!(decision.name(), "reschedule");
        assert_eq!(h.clock.sleeps(), vec![Duration::from_millis(1000)]);
        assert!(h.reloader.requests().is_empty());
        assert_eq!(
            h.poller.state(),
            &PollerState::Polling {
                status: JobStatus::Created
            }
        );
    }

    #[tokio::test]
    async fn running_unchanged_reschedules_after_ten_seconds() {
        let mut h = harness(JobStatus::Running, vec![ok(JobStatus::Running)]);
        assert!(h.poller.start());

        h.poller.step().await;

        assert_eq!(h.clock.sleeps(), vec![Duration::from_millis(10_000)]);
        assert!(h.reloader.requests().is_empty());
    }

    #[tokio::test]
    async fn changed_status_reloads_and_stops_polling() {
        let mut h = harness(
            JobStatus::Created,
            vec![ok(JobStatus::Other("done".into())), ok(JobStatus::Created)],
        );

        let state = h.poller.run().await;

        assert_eq!(
            state,
            PollerState::Reloaded {
                observed: JobStatus::Other("done".into())
            }
        );
        assert_eq!(h.source.calls(), 1);
        assert!(h.clock.sleeps().is_empty());
        assert_eq!(
            h.reloader.requests(),
            vec![ReloadRequest {
                job_id: Some(JobId::from(7)),
                previous: JobStatus::Created,
                observed: JobStatus::Other("done".into()),
            }]
        );
    }

    #[tokio::test]
    async fn failed_request_stops_silently_by_default() {
        let mut h = harness(JobStatus::Running, vec![network_error(), ok(JobStatus::Running)]);

        let state = h.poller.run().await;

        assert!(matches!(
            state,
            PollerState::Stopped {
                reason: StopReason::FetchFailed { .. }
            }
        ));
        assert_eq!(h.source.calls(), 1);
        assert!(h.clock.sleeps().is_empty());
        assert!(h.reloader.requests().is_empty());
    }

    #[tokio::test]
    async fn keeps_polling_until_status_changes() {
        let mut h = harness(
            JobStatus::Created,
            vec![
                ok(JobStatus::Created),
                ok(JobStatus::Created),
                ok(JobStatus::Running),
            ],
        );

        let state = h.poller.run().await;

        assert_eq!(
            state,
            PollerState::Reloaded {
                observed: JobStatus::Running
            }
        );
        assert_eq!(h.source.calls(), 3);
        assert_eq!(h.clock.sleeps(), vec![Duration::from_secs(1); 2]);

        let status = h.poller.status();
        assert_eq!(status.polls, 3);
        assert_eq!(status.scheduled_delay_ms, 2000);
        assert_eq!(status.last_observed, Some(JobStatus::Running));
    }

    #[tokio::test]
    async fn compares_against_initial_status_not_last_observed() {
        // running -> created is still a change from the rendered status
        let mut h = harness(JobStatus::Running, vec![ok(JobStatus::Created)]);

        let state = h.poller.run().await;

        assert_eq!(
            state,
            PollerState::Reloaded {
                observed: JobStatus::Created
            }
        );
    }

    #[tokio::test]
    async fn terminal_poller_does_not_restart() {
        let mut h = harness(JobStatus::Running, vec![ok(JobStatus::Finished)]);
        h.poller.run().await;

        assert!(!h.poller.start());
        h.poller.run().await;
        assert_eq!(h.source.calls(), 1);
        assert_eq!(h.reloader.requests().len(), 1);
    }

    #[tokio::test]
    async fn retry_policy_backs_off_then_gives_up() {
        let failure = FailurePolicy::retry(RetryPolicy::new(Duration::from_millis(500)), 3).unwrap();
        let mut h = harness_with(
            JobStatus::Running,
            vec![network_error(), network_error(), network_error()],
            PollerConfig::default().with_failure_policy(failure),
        );

        let state = h.poller.run().await;

        assert_eq!(
            h.clock.sleeps(),
            vec![Duration::from_millis(500), Duration::from_millis(1000)]
        );
        assert!(matches!(
            state,
            PollerState::Stopped {
                reason: StopReason::RetriesExhausted { attempts: 3, .. }
            }
        ));
        assert_eq!(h.poller.status().failures, 3);
    }

    #[tokio::test]
    async fn retry_policy_resets_after_success() {
        let failure = FailurePolicy::retry(RetryPolicy::new(Duration::from_millis(500)), 2).unwrap();
        let mut h = harness_with(
            JobStatus::Running,
            vec![
                network_error(),
                ok(JobStatus::Running),
                network_error(),
                ok(JobStatus::Errors),
            ],
            PollerConfig::default().with_failure_policy(failure),
        );

        let state = h.poller.run().await;

        assert_eq!(
            h.clock.sleeps(),
            vec![
                Duration::from_millis(500),
                Duration::from_secs(10),
                Duration::from_millis(500),
            ]
        );
        assert_eq!(
            state,
            PollerState::Reloaded {
                observed: JobStatus::Errors
            }
        );
    }

    #[test]
    fn retry_policy_does_not_retry_permanent_failures() {
        let config = PollerConfig::default()
            .with_failure_policy(FailurePolicy::retry(RetryPolicy::default(), 5).unwrap());
        let result = Err(FetchError::Http {
            status: 404,
            body: "not found".into(),
        });

        let decision = decide(&JobStatus::Running, &result, 1, &config);

        assert!(matches!(
            decision,
            PollDecision::Stop {
                reason: StopReason::FetchFailed { .. }
            }
        ));
    }

    #[test]
    fn millis_saturates_instead_of_truncating() {
        assert_eq!(millis(Duration::from_millis(1500)), 1500);
        assert_eq!(millis(Duration::MAX), u64::MAX);
    }

    #[tokio::test]
    async fn status_view_saturates_huge_delays() {
        let intervals = crate::schedule::PollIntervals {
            created: Duration::MAX,
            running: Duration::from_secs(10),
        };
        let mut h = harness_with(
            JobStatus::Created,
            vec![ok(JobStatus::Created)],
            PollerConfig::default().with_intervals(intervals),
        );
        assert!(h.poller.start());

        h.poller.step().await;

        assert_eq!(h.poller.status().scheduled_delay_ms, u64::MAX);
    }

    #[test]
    fn unchanged_non_pending_status_stops() {
        let decision = decide(
            &JobStatus::Finished,
            &ok(JobStatus::Finished),
            0,
            &PollerConfig::default(),
        );
        assert_eq!(
            decision,
            PollDecision::Stop {
                reason: StopReason::NotPending {
                    status: JobStatus::Finished
                }
            }
        );
    }

    #[tokio::test]
    async fn mismatched_echoed_id_is_only_logged() {
        let response = StatusResponse {
            status: JobStatus::Running,
            id: Some(serde_json::json!(99)),
        };
        let mut h = harness(JobStatus::Running, vec![Ok(response)]);
        assert!(h.poller.start());

        let decision = h.poller.step().await;

        assert_eq!(decision.name(), "reschedule");
    }

    #[tokio::test]
    async fn status_view_tracks_timestamps() {
        let mut h = harness(JobStatus::Created, vec![ok(JobStatus::Created), ok(JobStatus::Running)]);

        h.poller.run().await;

        let status = h.poller.status();
        assert_eq!(status.started_at, Some(DateTime::<Utc>::UNIX_EPOCH));
        assert_eq!(
            status.last_poll_at,
            Some(DateTime::<Utc>::UNIX_EPOCH + chrono::Duration::seconds(1))
        );
    }
}
