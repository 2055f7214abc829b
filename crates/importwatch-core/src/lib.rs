//! importwatch-core
//!
//! Core building blocks for watching a long-running import job.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（status, ids, page data, decision, state, errors）
//! - **schedule**: poll 間隔と失敗時の backoff
//! - **ports**: 抽象化レイヤー（Clock, StatusSource, Reloader）
//! - **impls**: 実装（HttpStatusSource, EndpointStrategy, テスト用 fake）
//! - **app**: poll loop 本体（StatusPoller）

pub mod app;
pub mod domain;
pub mod impls;
pub mod ports;
pub mod schedule;

pub use app::{PollerConfig, PollerStatus, StatusPoller};
pub use domain::{JobId, JobPage, JobStatus, PollDecision, PollerState};
