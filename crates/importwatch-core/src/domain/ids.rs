//! Job identifier.
//!
//! サーバ側では import log の primary key（整数）だが、こちらでは
//! 不透明なトークンとして扱う。URL 組み立て以外では中身を見ない。

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque token identifying which job's status endpoint to query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Does a JSON `id` echoed back by the server refer to this job?
    ///
    /// The server echoes the primary key as a number or a string.
    pub fn matches_json(&self, value: &serde_json::Value) -> bool {
        match value {
            serde_json::Value::String(s) => s == &self.0,
            serde_json::Value::Number(n) => n.to_string() == self.0,
            _ => false,
        }
    }
}

impl From<&str> for JobId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<u64> for JobId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
