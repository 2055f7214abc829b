//! Ports - 抽象化レイヤー
//!
//! poll loop が外部（時刻、HTTP、画面）に触れる箇所をすべて trait にしておく。
//! テストでは ManualClock / ScriptedSource / RecordingReloader に差し替える。

pub mod clock;
pub mod reloader;
pub mod status_source;

pub use self::clock::{Clock, ManualClock, SystemClock};
pub use self::reloader::{ReloadRequest, Reloader};
pub use self::status_source::StatusSource;
