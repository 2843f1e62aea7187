//! The module contains the `ItemShare` join row.

use serde::{Deserialize, Serialize};

use crate::ParticipantId;

/// Records that a participant is one of the people splitting an item.
///
/// The pair `(item_id, participant_id)` is the identity of the row; the
/// mutation contract never creates the same pair twice. Splitting is always
/// even among the sharers of an item, so the row carries no weight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemShare {
    pub item_id: i64,
    pub participant_id: ParticipantId,
}
