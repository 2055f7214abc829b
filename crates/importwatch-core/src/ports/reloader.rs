//! Reloader port - 状態変化時の再描画

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{JobId, JobStatus};

/// A status change that ends the poll loop.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReloadRequest {
    pub job_id: Option<JobId>,

    /// Status the page was rendered with.
    pub previous: JobStatus,

    /// Status the server reports now.
    pub observed: JobStatus,
}

/// Reloader re-renders the job view after the status changed.
///
/// Called at most once per poller; no poll is scheduled afterwards.
#[async_trait]
pub trait Reloader: Send + Sync {
    async fn reload(&self, request: &ReloadRequest);
}
