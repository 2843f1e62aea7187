//! The balance aggregator: a pure fold from a snapshot to per-participant
//! totals.
//!
//! The fold is re-run in full after every mutation; balances are never
//! patched incrementally. It also never fails: a dangling reference (which
//! the cascades make structurally impossible) simply contributes nothing.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{ParticipantId, SessionData};

/// Net result for one participant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSummary {
    /// Sum of this participant's portions of every item they share.
    pub total_billed: f64,
    /// Sum of `total_paid` over the bills this participant fronted.
    pub total_paid: f64,
}

impl BalanceSummary {
    /// Positive means the participant is owed money, negative means they
    /// still owe.
    pub fn final_balance(&self) -> f64 {
        self.total_paid - self.total_billed
    }
}

/// Computes the balance of every current participant.
///
/// Every participant appears in the result, zeroed when they have no
/// activity. All arithmetic is plain `f64`; the division by the sharer
/// count is exact real division and nothing is rounded here (rounding is a
/// presentation concern).
pub fn session_summary(data: &SessionData) -> HashMap<ParticipantId, BalanceSummary> {
    let mut summary: HashMap<ParticipantId, BalanceSummary> = data
        .participants
        .iter()
        .map(|p| (p.id, BalanceSummary::default()))
        .collect();

    for bill in &data.bills {
        let Some(payer_id) = bill.payer_id else {
            continue;
        };
        // A payer outside the participant set would be a dangling reference;
        // it contributes nothing rather than failing the fold.
        if let Some(entry) = summary.get_mut(&payer_id) {
            entry.total_paid += bill.total_paid;
        }
    }

    for item in &data.items {
        let Some(bill) = data.bill(item.bill_id) else {
            continue;
        };
        let sharers: Vec<ParticipantId> = data
            .shares
            .iter()
            .filter(|share| share.item_id == item.id)
            .map(|share| share.participant_id)
            .collect();
        if sharers.is_empty() {
            // Orphaned item: an allowed state that costs nobody anything.
            continue;
        }
        let cost_per_sharer = item.line_cost(bill.tax_percentage) / sharers.len() as f64;
        for participant_id in sharers {
            if let Some(entry) = summary.get_mut(&participant_id) {
                entry.total_billed += cost_per_sharer;
            }
        }
    }

    summary
}
