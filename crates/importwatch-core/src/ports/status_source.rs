//! StatusSource port - ステータス取得の抽象化
//!
//! 本番は `HttpStatusSource`（GET {endpoint}）、テストは `ScriptedSource`。

use async_trait::async_trait;

use crate::domain::{FetchError, StatusResponse};

/// StatusSource は job の現在の status を 1 回取得する
///
/// # 契約
/// - 1 回の呼び出しが 1 回の poll cycle のリクエストに対応
/// - 失敗はすべて `FetchError` で返す（panic しない）
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn fetch(&self) -> Result<StatusResponse, FetchError>;

    /// Where requests go, for logs.
    fn endpoint(&self) -> &str;
}
