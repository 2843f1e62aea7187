//! The module contains the `Session`, the single top-level container for one
//! group's expense-splitting activity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The live session every other entity belongs to.
///
/// Exactly one session exists per engine instance. It is created on first
/// use (or when loading the persisted document fails) and lives for the
/// process lifetime; only its entities come and go.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: i64,
    pub name: String,
    /// Creation time, persisted as epoch milliseconds.
    #[serde(with = "chrono::serde::ts_milliseconds", default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(name: String) -> Self {
        Self {
            id: 1,
            name,
            created_at: Utc::now(),
        }
    }
}
