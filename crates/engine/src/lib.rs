//! In-memory ledger engine for splitting group bills.
//!
//! The engine owns the current [`SessionData`] snapshot and is the only
//! writer. Every mutation works on a private clone, runs the removal
//! cascades needed to keep references consistent, and publishes the clone
//! wholesale; the per-participant balance summary is then recomputed from
//! scratch. Readers holding an earlier snapshot are never affected.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

pub use balance::{BalanceSummary, session_summary};
pub use bills::Bill;
pub use error::EngineError;
pub use item_shares::ItemShare;
pub use items::Item;
pub use participants::Participant;
pub use session::Session;
pub use snapshot::SessionData;
pub use store::{SessionStore, StoreError};

mod balance;
mod bills;
mod error;
mod item_shares;
mod items;
mod participants;
mod session;
mod snapshot;
mod store;

pub type ParticipantId = i64;
pub type BillId = i64;
pub type ItemId = i64;

type ResultEngine<T> = Result<T, EngineError>;

/// Session name used when seeding a fresh snapshot.
pub const DEFAULT_SESSION_NAME: &str = "Sesi Patungan";

#[derive(Debug)]
pub struct Engine {
    data: Arc<SessionData>,
    summary: HashMap<ParticipantId, BalanceSummary>,
    store: Option<Box<dyn SessionStore>>,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// The current snapshot. Cheap to clone and stays fully consistent even
    /// while later mutations replace the engine's own copy.
    pub fn snapshot(&self) -> Arc<SessionData> {
        Arc::clone(&self.data)
    }

    pub fn session_name(&self) -> &str {
        &self.data.session.name
    }

    pub fn participants(&self) -> &[Participant] {
        &self.data.participants
    }

    pub fn bills(&self) -> &[Bill] {
        &self.data.bills
    }

    pub fn items_for_bill(&self, bill_id: BillId) -> impl Iterator<Item = &Item> {
        self.data.items.iter().filter(move |item| item.bill_id == bill_id)
    }

    pub fn shares_for_item(&self, item_id: ItemId) -> impl Iterator<Item = &ItemShare> {
        self.data.shares.iter().filter(move |share| share.item_id == item_id)
    }

    /// Balances derived from the latest snapshot, one entry per current
    /// participant.
    pub fn summary(&self) -> &HashMap<ParticipantId, BalanceSummary> {
        &self.summary
    }

    /// Adds a participant to the session.
    ///
    /// Blank or whitespace-only names are rejected and leave the snapshot
    /// untouched. Duplicate names are allowed.
    pub fn add_participant(&mut self, name: &str) -> ResultEngine<ParticipantId> {
        if name.trim().is_empty() {
            return Err(EngineError::BlankName);
        }
        let mut next = (*self.data).clone();
        let id = next.next_participant_id();
        next.participants.push(Participant {
            id,
            session_id: next.session.id,
            name: name.to_string(),
        });
        self.commit(next);
        Ok(id)
    }

    /// Removes a participant together with all their item shares, and clears
    /// the payer on any bill they fronted.
    ///
    /// Returns `false` (a no-op) when the id does not exist.
    pub fn remove_participant(&mut self, id: ParticipantId) -> bool {
        let mut next = (*self.data).clone();
        if !next.remove_participant(id) {
            return false;
        }
        self.commit(next);
        true
    }

    /// Creates an empty bill with a default name and returns its id so the
    /// caller can navigate straight to it.
    pub fn add_bill(&mut self) -> BillId {
        let mut next = (*self.data).clone();
        let id = next.next_bill_id();
        let name = format!("Bill Baru #{}", next.bills.len() + 1);
        next.bills.push(Bill::new(id, next.session.id, name));
        self.commit(next);
        id
    }

    /// Removes a bill together with its items and those items' shares.
    ///
    /// Returns `false` (a no-op) when the id does not exist.
    pub fn remove_bill(&mut self, id: BillId) -> bool {
        let mut next = (*self.data).clone();
        if !next.remove_bill(id) {
            return false;
        }
        self.commit(next);
        true
    }

    /// Replaces a bill's header fields.
    ///
    /// The tax percentage must be finite and non-negative. The payer, when
    /// given, must be a current participant, which keeps the "payer always
    /// exists" invariant checkable at the door. `total_paid` and the name
    /// are accepted as-is: the paid amount is whatever the payer fronted
    /// (never validated against the item total) and a bill may be renamed
    /// to anything, including an empty string.
    pub fn update_bill_header(
        &mut self,
        bill_id: BillId,
        name: &str,
        tax_percentage: f64,
        payer_id: Option<ParticipantId>,
        total_paid: f64,
    ) -> ResultEngine<()> {
        if !tax_percentage.is_finite() || tax_percentage < 0.0 {
            return Err(EngineError::InvalidAmount(
                "tax percentage must be >= 0".to_string(),
            ));
        }
        if let Some(payer) = payer_id
            && self.data.participant(payer).is_none()
        {
            return Err(EngineError::KeyNotFound(format!("participant {payer}")));
        }
        let mut next = (*self.data).clone();
        let Some(bill) = next.bill_mut(bill_id) else {
            return Err(EngineError::KeyNotFound(format!("bill {bill_id}")));
        };
        bill.name = name.to_string();
        bill.tax_percentage = tax_percentage;
        bill.payer_id = payer_id;
        bill.total_paid = total_paid;
        self.commit(next);
        Ok(())
    }

    /// Adds an item to a bill and, as the even-split default, one share per
    /// participant currently in the session.
    pub fn add_item(
        &mut self,
        bill_id: BillId,
        name: &str,
        price: f64,
        quantity: u32,
    ) -> ResultEngine<ItemId> {
        if name.trim().is_empty() {
            return Err(EngineError::BlankName);
        }
        if !price.is_finite() || price <= 0.0 {
            return Err(EngineError::InvalidAmount("price must be > 0".to_string()));
        }
        if quantity == 0 {
            return Err(EngineError::InvalidAmount(
                "quantity must be > 0".to_string(),
            ));
        }
        if self.data.bill(bill_id).is_none() {
            return Err(EngineError::KeyNotFound(format!("bill {bill_id}")));
        }
        let mut next = (*self.data).clone();
        let id = next.next_item_id();
        next.items.push(Item {
            id,
            bill_id,
            name: name.to_string(),
            price,
            quantity,
        });
        let shares = next.participants.iter().map(|participant| ItemShare {
            item_id: id,
            participant_id: participant.id,
        });
        next.shares.extend(shares);
        self.commit(next);
        Ok(id)
    }

    /// Removes an item and its shares.
    ///
    /// Returns `false` (a no-op) when the id does not exist.
    pub fn remove_item(&mut self, id: ItemId) -> bool {
        let mut next = (*self.data).clone();
        if !next.remove_item(id) {
            return false;
        }
        self.commit(next);
        true
    }

    /// Replaces the set of people splitting an item.
    ///
    /// Duplicate ids in the input collapse to a single share, so the
    /// `(item, participant)` pair stays unique. Ids that do not reference a
    /// current participant are silently dropped rather than rejecting the
    /// whole call, matching how the selection UI hands back stale ids.
    pub fn replace_item_shares(
        &mut self,
        item_id: ItemId,
        participant_ids: &[ParticipantId],
    ) -> ResultEngine<()> {
        if self.data.item(item_id).is_none() {
            return Err(EngineError::KeyNotFound(format!("item {item_id}")));
        }
        let mut next = (*self.data).clone();
        let selected: BTreeSet<ParticipantId> = participant_ids
            .iter()
            .copied()
            .filter(|id| next.participant(*id).is_some())
            .collect();
        next.shares.retain(|share| share.item_id != item_id);
        next.shares.extend(selected.into_iter().map(|participant_id| ItemShare {
            item_id,
            participant_id,
        }));
        self.commit(next);
        Ok(())
    }

    /// Publishes a fully cascaded snapshot, recomputes balances and saves.
    ///
    /// A failed save is logged and nothing else: the in-memory snapshot
    /// stays authoritative for this process.
    fn commit(&mut self, next: SessionData) {
        self.data = Arc::new(next);
        self.summary = balance::session_summary(&self.data);
        if let Some(store) = &self.store
            && let Err(err) = store.save(&self.data)
        {
            tracing::warn!("failed to persist session snapshot: {err}");
        }
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    store: Option<Box<dyn SessionStore>>,
    session_name: Option<String>,
}

impl EngineBuilder {
    /// Attach the session lifecycle collaborator. Without one the engine
    /// runs purely in memory.
    pub fn store(mut self, store: Box<dyn SessionStore>) -> EngineBuilder {
        self.store = Some(store);
        self
    }

    /// Session name used when no persisted snapshot exists yet.
    pub fn session_name(mut self, name: &str) -> EngineBuilder {
        self.session_name = Some(name.to_string());
        self
    }

    /// Construct `Engine`, loading the persisted snapshot when one exists.
    ///
    /// A load failure is logged and treated like an absent snapshot: the
    /// engine seeds a fresh session and persists it right away, so the next
    /// start finds a well-formed document.
    pub fn build(self) -> Engine {
        let loaded = match &self.store {
            Some(store) => match store.load() {
                Ok(data) => data,
                Err(err) => {
                    tracing::warn!("failed to load session snapshot: {err}");
                    None
                }
            },
            None => None,
        };

        let (data, fresh) = match loaded {
            Some(data) => (data, false),
            None => {
                let name = self.session_name.as_deref().unwrap_or(DEFAULT_SESSION_NAME);
                tracing::debug!("seeding fresh session \"{name}\"");
                (SessionData::seed(name), true)
            }
        };

        let summary = balance::session_summary(&data);
        let engine = Engine {
            data: Arc::new(data),
            summary,
            store: self.store,
        };
        if fresh
            && let Some(store) = &engine.store
            && let Err(err) = store.save(&engine.data)
        {
            tracing::warn!("failed to persist seeded session: {err}");
        }
        engine
    }
}
