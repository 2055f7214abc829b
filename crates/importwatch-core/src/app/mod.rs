//! App - アプリケーション層
//!
//! ports を組み合わせて poll loop を組み立てる。
//!
//! # 主要コンポーネント
//! - **StatusPoller**: fetch → decide → (sleep | reload | stop) のループ
//! - **PollerConfig**: 間隔・失敗時の扱い・タイムアウト
//! - **PollerStatus**: 観測用スナップショット

pub mod config;
pub mod poller;
pub mod status;

pub use self::config::PollerConfig;
pub use self::poller::{StatusPoller, decide};
pub use self::status::PollerStatus;
