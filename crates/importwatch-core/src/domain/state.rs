//! Poller state machine.

use serde::{Deserialize, Serialize};

use super::decision::StopReason;
use super::status::JobStatus;

/// PollerState は poll loop の状態を表現
///
/// # 状態遷移
/// - Idle -> Polling(s)            （s が pending のとき）
/// - Polling(s) -> Polling(s)      （サーバがまだ s を返す）
/// - Polling(s) -> Reloaded(t)     （サーバが t != s を返す）
/// - Polling(s) -> Stopped(reason) （失敗 / pending でない）
///
/// Idle / Reloaded / Stopped は終端。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PollerState {
    /// Never started polling.
    Idle,

    /// Polling; carries the status the loop compares against.
    Polling { status: JobStatus },

    /// A different status was observed and the view was reloaded.
    Reloaded { observed: JobStatus },

    /// Stopped without a reload.
    Stopped { reason: StopReason },
}

impl PollerState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PollerState::Polling { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_polling_is_non_terminal() {
        assert!(PollerState::Idle.is_terminal());
        assert!(
            !PollerState::Polling {
                status: JobStatus::Running
            }
            .is_terminal()
        );
        assert!(
            PollerState::Reloaded {
                observed: JobStatus::Finished
            }
            .is_terminal()
        );
        assert!(
            PollerState::Stopped {
                reason: StopReason::FetchFailed {
                    error: "x".into()
                }
            }
            .is_terminal()
        );
    }

    #[test]
    fn serializes_with_state_tag() {
        let json = serde_json::to_value(PollerState::Polling {
            status: JobStatus::Created,
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"state": "polling", "status": "created"}));
    }
}
