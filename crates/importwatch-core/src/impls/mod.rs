//! Implementations - ports の実装
//!
//! - **HttpStatusSource**: reqwest による status endpoint への GET
//! - **EndpointStrategy**: endpoint url の決め方（明示 / page 相対 / template）
//! - **ScriptedSource**, **RecordingReloader**: 開発・テスト用

pub mod endpoint;
pub mod http_source;
pub mod scripted;

pub use self::endpoint::{DEFAULT_SUFFIX, EndpointStrategy};
pub use self::http_source::HttpStatusSource;
pub use self::scripted::{RecordingReloader, ScriptedSource};
