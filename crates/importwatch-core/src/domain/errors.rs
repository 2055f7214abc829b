//! Errors - エラー型と分類
//!
//! - `FetchError`: 1 回の poll cycle の失敗。poll loop の外には `Err` として出ない
//! - `ConfigError`: 起動前の設定エラー
//! - `PageDataError`: page data の読み込みエラー

use thiserror::Error;

/// Failure of a single status request.
///
/// Carried inside `PollDecision::Stop` / used to compute retry delays.
/// Kept `Clone + PartialEq` so decisions can be compared in tests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Connection, DNS, TLS or other transport failure.
    #[error("request failed: {0}")]
    Network(String),

    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// Server answered with a non-2xx status code.
    #[error("status endpoint returned {status}: {body}")]
    Http { status: u16, body: String },

    /// Body was not JSON or lacked a `status` field.
    #[error("malformed status body: {0}")]
    Decode(String),
}

impl FetchError {
    /// Is a retry likely to help?
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Network(_) | FetchError::Timeout => true,
            FetchError::Http { status, .. } => *status >= 500 || *status == 429,
            FetchError::Decode(_) => false,
        }
    }
}

/// Invalid poller configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("no status endpoint: set --status-url, --url-template or --page-url")]
    NoEndpoint,

    #[error("url template needs a job id")]
    MissingJobId,

    #[error("retry max_attempts must be at least 1")]
    ZeroRetryAttempts,

    #[error("failed to build http client: {0}")]
    Client(String),
}

/// Page data could not be read.
#[derive(Debug, Error)]
pub enum PageDataError {
    #[error("page data has no status")]
    MissingStatus,

    #[error("failed to read page data: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid page data json: {0}")]
    Json(#[from] serde_json::Error),
}
