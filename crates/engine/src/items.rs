//! The module contains the `Item` struct and its implementation.

use serde::{Deserialize, Serialize};

/// A line entry on a bill with unit price and quantity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: i64,
    pub bill_id: i64,
    pub name: String,
    /// Unit price. The mutation contract only admits values > 0.
    pub price: f64,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

impl Item {
    /// Full cost of this line: `price * quantity * (1 + tax/100)`.
    ///
    /// The tax percentage comes from the parent bill, not the item.
    pub fn line_cost(&self, tax_percentage: f64) -> f64 {
        self.price * f64::from(self.quantity) * (1.0 + tax_percentage / 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(price: f64, quantity: u32) -> Item {
        Item {
            id: 1,
            bill_id: 1,
            name: String::from("Nasi Goreng"),
            price,
            quantity,
        }
    }

    #[test]
    fn line_cost_without_tax() {
        assert_eq!(item(25_000.0, 2).line_cost(0.0), 50_000.0);
    }

    #[test]
    fn line_cost_applies_tax_multiplicatively() {
        // 100 * 2 * 1.10; plain double arithmetic, so compare with a tolerance.
        assert!((item(100.0, 2).line_cost(10.0) - 220.0).abs() < 1e-9);
    }
}
