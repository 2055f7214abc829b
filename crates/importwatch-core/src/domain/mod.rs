//! Domain model (status, ids, page data, decisions, state, errors).

pub mod decision;
pub mod errors;
pub mod ids;
pub mod page;
pub mod state;
pub mod status;

pub use self::decision::{PollDecision, StopReason};
pub use self::errors::{ConfigError, FetchError, PageDataError};
pub use self::ids::JobId;
pub use self::page::{JobPage, StatusResponse};
pub use self::state::PollerState;
pub use self::status::JobStatus;
