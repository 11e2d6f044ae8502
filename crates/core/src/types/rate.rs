//! Shipping rates returned to the checkout.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Tax line that every rate's tax amount is reported under.
pub const TAX_LINE_KEY: &str = "1";

/// A single shipping option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rate {
    /// Carrier rate code.
    pub id: String,
    /// Display name shown to the shopper.
    pub label: String,
    /// Total cost of the option.
    pub cost: Decimal,
    /// Tax amounts keyed by tax line, as quoted by the rate service.
    pub taxes: BTreeMap<String, Value>,
}

impl Rate {
    /// Create a rate with its tax amount on the fixed tax line.
    #[must_use]
    pub fn new(id: String, label: String, cost: Decimal, tax: Value) -> Self {
        Self {
            id,
            label,
            cost,
            taxes: BTreeMap::from([(TAX_LINE_KEY.to_string(), tax)]),
        }
    }
}
