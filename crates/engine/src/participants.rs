//! The module contains the `Participant` struct.

use serde::{Deserialize, Serialize};

/// A person taking part in the session.
///
/// Names are free-form and not required to be unique; two participants may
/// both be called "Budi". The id is what everything else references.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: i64,
    pub session_id: i64,
    pub name: String,
}
