//! The snapshot document: the whole session state as one value.
//!
//! `SessionData` is both the in-memory state the engine mutates and the
//! document the store persists. The engine treats it as copy-on-write: a
//! mutation works on a private clone and only publishes it once every
//! cascade has run, so readers never observe dangling references.

use serde::{Deserialize, Serialize};

use crate::{Bill, BillId, Item, ItemId, ItemShare, Participant, ParticipantId, Session};

/// The persisted and in-memory shape of one session.
///
/// Unknown fields in a loaded document are ignored, so documents written by
/// newer builds still load.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionData {
    pub session: Session,
    #[serde(default)]
    pub participants: Vec<Participant>,
    #[serde(default)]
    pub bills: Vec<Bill>,
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub shares: Vec<ItemShare>,
}

/// Next identifier for a collection: `max(existing) + 1`, starting at 1.
///
/// Deterministic and collision-free as long as every insertion goes through
/// this function.
fn next_id(ids: impl Iterator<Item = i64>) -> i64 {
    ids.max().unwrap_or(0) + 1
}

impl SessionData {
    /// A fresh snapshot with an empty session, used on first start or when
    /// the persisted document cannot be loaded.
    pub fn seed(session_name: &str) -> Self {
        Self {
            session: Session::new(session_name.to_string()),
            participants: Vec::new(),
            bills: Vec::new(),
            items: Vec::new(),
            shares: Vec::new(),
        }
    }

    pub fn next_participant_id(&self) -> ParticipantId {
        next_id(self.participants.iter().map(|p| p.id))
    }

    pub fn next_bill_id(&self) -> BillId {
        next_id(self.bills.iter().map(|b| b.id))
    }

    pub fn next_item_id(&self) -> ItemId {
        next_id(self.items.iter().map(|i| i.id))
    }

    pub fn participant(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    pub fn bill(&self, id: BillId) -> Option<&Bill> {
        self.bills.iter().find(|b| b.id == id)
    }

    pub(crate) fn bill_mut(&mut self, id: BillId) -> Option<&mut Bill> {
        self.bills.iter_mut().find(|b| b.id == id)
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Removes a participant, cascading to their shares and to any bill
    /// that names them as payer (the bill keeps its `total_paid`).
    ///
    /// Returns `false` and leaves the snapshot untouched when the id does
    /// not exist.
    pub(crate) fn remove_participant(&mut self, id: ParticipantId) -> bool {
        let before = self.participants.len();
        self.participants.retain(|p| p.id != id);
        if self.participants.len() == before {
            return false;
        }
        self.shares.retain(|share| share.participant_id != id);
        for bill in &mut self.bills {
            if bill.payer_id == Some(id) {
                bill.payer_id = None;
            }
        }
        true
    }

    /// Removes a bill, its items and those items' shares.
    pub(crate) fn remove_bill(&mut self, id: BillId) -> bool {
        let before = self.bills.len();
        self.bills.retain(|b| b.id != id);
        if self.bills.len() == before {
            return false;
        }
        let removed: Vec<ItemId> = self
            .items
            .iter()
            .filter(|item| item.bill_id == id)
            .map(|item| item.id)
            .collect();
        self.items.retain(|item| item.bill_id != id);
        self.shares.retain(|share| !removed.contains(&share.item_id));
        true
    }

    /// Removes an item and its shares.
    pub(crate) fn remove_item(&mut self, id: ItemId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        if self.items.len() == before {
            return false;
        }
        self.shares.retain(|share| share.item_id != id);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> SessionData {
        let mut data = SessionData::seed("Sesi Coba-coba");
        for name in ["A", "B"] {
            let id = data.next_participant_id();
            data.participants.push(Participant {
                id,
                session_id: data.session.id,
                name: name.to_string(),
            });
        }
        let bill_id = data.next_bill_id();
        let mut bill = Bill::new(bill_id, data.session.id, String::from("Makan"));
        bill.payer_id = Some(1);
        bill.total_paid = 90_000.0;
        data.bills.push(bill);
        let item_id = data.next_item_id();
        data.items.push(Item {
            id: item_id,
            bill_id,
            name: String::from("Sate"),
            price: 45_000.0,
            quantity: 2,
        });
        for participant_id in [1, 2] {
            data.shares.push(ItemShare {
                item_id,
                participant_id,
            });
        }
        data
    }

    #[test]
    fn ids_start_at_one_and_grow() {
        let data = SessionData::seed("Sesi");
        assert_eq!(data.next_participant_id(), 1);
        assert_eq!(data.next_bill_id(), 1);

        let data = snapshot();
        assert_eq!(data.next_participant_id(), 3);
    }

    #[test]
    fn next_id_tracks_the_surviving_maximum() {
        let mut data = snapshot();
        assert!(data.remove_participant(2));
        assert_eq!(data.next_participant_id(), 2);

        // A second removal of the same id is a no-op.
        assert!(!data.remove_participant(2));
    }

    #[test]
    fn remove_participant_cascades_to_shares_and_payer() {
        let mut data = snapshot();
        assert!(data.remove_participant(1));

        assert!(data.shares.iter().all(|s| s.participant_id != 1));
        assert!(data.bills.iter().all(|b| b.payer_id != Some(1)));
        // The fronted amount stays on the bill even without a payer.
        assert_eq!(data.bills[0].total_paid, 90_000.0);
    }

    #[test]
    fn remove_bill_cascades_to_items_and_shares() {
        let mut data = snapshot();
        assert!(data.remove_bill(1));

        assert!(data.items.is_empty());
        assert!(data.shares.is_empty());
        assert!(!data.remove_bill(1));
    }

    #[test]
    fn remove_item_cascades_to_shares() {
        let mut data = snapshot();
        assert!(data.remove_item(1));

        assert!(data.shares.is_empty());
        // Participants and the bill are untouched.
        assert_eq!(data.participants.len(), 2);
        assert_eq!(data.bills.len(), 1);
    }

    #[test]
    fn document_round_trips_with_camel_case_fields() {
        let mut data = snapshot();
        // `createdAt` persists with millisecond precision, so pin it to a
        // whole millisecond before comparing the round trip.
        data.session.created_at = chrono::DateTime::from_timestamp_millis(1_700_000_000_000)
            .unwrap_or_default();
        let raw = serde_json::to_string_pretty(&data).unwrap();

        assert!(raw.contains("\"sessionId\""));
        assert!(raw.contains("\"taxPercentage\""));
        assert!(raw.contains("\"payerId\""));
        assert!(raw.contains("\"createdAt\""));

        let parsed: SessionData = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed, data);
    }

    #[test]
    fn loading_tolerates_unknown_fields_and_missing_defaults() {
        // Shaped like a document from an older build: defaults omitted,
        // plus a field this build does not know about.
        let raw = r#"{
            "session": {"id": 1, "name": "Sesi Lama", "createdAt": 0},
            "participants": [{"id": 1, "sessionId": 1, "name": "A"}],
            "bills": [{"id": 1, "sessionId": 1, "name": "Makan"}],
            "items": [{"id": 1, "billId": 1, "name": "Sate", "price": 45000.0}],
            "shares": [{"itemId": 1, "participantId": 1}],
            "payments": []
        }"#;

        let parsed: SessionData = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.bills[0].tax_percentage, 0.0);
        assert_eq!(parsed.bills[0].payer_id, None);
        assert_eq!(parsed.bills[0].total_paid, 0.0);
        assert_eq!(parsed.items[0].quantity, 1);
    }

    #[test]
    fn unknown_ids_are_no_ops() {
        let mut data = snapshot();
        let untouched = data.clone();

        assert!(!data.remove_participant(99));
        assert!(!data.remove_bill(99));
        assert!(!data.remove_item(99));
        assert_eq!(data, untouched);
    }
}
