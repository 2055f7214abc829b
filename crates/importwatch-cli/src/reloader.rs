use async_trait::async_trait;
use importwatch_core::ports::{ReloadRequest, Reloader};

/// Re-renders the job on stdout after its status changed.
///
/// Human-readable by default, one JSON object per reload with `json`.
pub struct ConsoleReloader {
    json: bool,
}

impl ConsoleReloader {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    pub fn render(&self, request: &ReloadRequest) -> String {
        if self.json {
            return serde_json::to_string(request)
                .unwrap_or_else(|e| format!("{{\"error\":\"{e}\"}}"));
        }
        match &request.job_id {
            Some(job_id) => format!(
                "job {job_id}: {} -> {}",
                request.previous, request.observed
            ),
            None => format!("job: {} -> {}", request.previous, request.observed),
        }
    }
}

#[async_trait]
impl Reloader for ConsoleReloader {
    async fn reload(&self, request: &ReloadRequest) {
        println!("{}", self.render(request));
    }
}
