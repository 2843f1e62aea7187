//! The module contains the `Bill` struct and its implementation.

use serde::{Deserialize, Serialize};

use crate::ParticipantId;

/// One expense event ("receipt") with zero or more line items.
///
/// `payer_id` is the single participant who fronted the money for the whole
/// bill; `total_paid` is what they actually paid. The two are tracked
/// separately from the items on purpose: the paid amount may differ from the
/// computed item total (tips, rounding on the receipt) and is never
/// validated against it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub id: i64,
    pub session_id: i64,
    pub name: String,
    /// Non-negative percentage applied multiplicatively to every item's
    /// line cost within this bill.
    #[serde(default)]
    pub tax_percentage: f64,
    /// Cleared the instant the referenced participant is removed.
    #[serde(default)]
    pub payer_id: Option<ParticipantId>,
    #[serde(default)]
    pub total_paid: f64,
}

impl Bill {
    /// A fresh bill: zero tax, no payer, nothing paid yet.
    pub fn new(id: i64, session_id: i64, name: String) -> Self {
        Self {
            id,
            session_id,
            name,
            tax_percentage: 0.0,
            payer_id: None,
            total_paid: 0.0,
        }
    }
}
