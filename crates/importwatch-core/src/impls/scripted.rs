//! In-memory fakes for the poll loop (開発・テスト用).
//!
//! - **ScriptedSource**: 事前に並べた応答を順番に返す StatusSource
//! - **RecordingReloader**: reload 要求を記録するだけの Reloader

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::{FetchError, JobStatus, StatusResponse};
use crate::ports::{ReloadRequest, Reloader, StatusSource};

/// Status source replaying a fixed script of responses.
///
/// Once the script is exhausted every fetch fails with a network error.
#[derive(Clone)]
pub struct ScriptedSource {
    inner: Arc<Mutex<ScriptState>>,
}

struct ScriptState {
    script: VecDeque<Result<StatusResponse, FetchError>>,
    calls: usize,
}

impl ScriptedSource {
    pub fn new(script: Vec<Result<StatusResponse, FetchError>>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ScriptState {
                script: script.into(),
                calls: 0,
            })),
        }
    }

    /// Script of successful responses with the given statuses.
    pub fn statuses(statuses: &[JobStatus]) -> Self {
        Self::new(
            statuses
                .iter()
                .cloned()
                .map(|s| Ok(StatusResponse::new(s)))
                .collect(),
        )
    }

    /// Number of fetches issued so far.
    pub fn calls(&self) -> usize {
        self.lock().calls
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ScriptState> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl StatusSource for ScriptedSource {
    async fn fetch(&self) -> Result<StatusResponse, FetchError> {
        let mut state = self.lock();
        state.calls += 1;
        state
            .script
            .pop_front()
            .unwrap_or_else(|| Err(FetchError::Network("script exhausted".to_string())))
    }

    fn endpoint(&self) -> &str {
        "scripted://status"
    }
}

/// Reloader that only records what it was asked to do.
#[derive(Clone, Default)]
pub struct RecordingReloader {
    requests: Arc<Mutex<Vec<ReloadRequest>>>,
}

impl RecordingReloader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> Vec<ReloadRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl Reloader for RecordingReloader {
    async fn reload(&self, request: &ReloadRequest) {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(request.clone());
    }
}
