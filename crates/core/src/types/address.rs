//! Postal addresses as sent to the rate service.
//!
//! The same shape is used for the store origin and the shopper destination.
//! Field order matters: it is the order the fields appear in the signed body.

use serde::{Deserialize, Serialize};

/// Country reference. The rate service expects the ISO-2 code in both fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub name: String,
    pub code2: String,
}

impl Country {
    /// Build a country from its ISO-2 code.
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        Self {
            name: code.to_string(),
            code2: code.to_string(),
        }
    }
}

/// State or province reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    pub name: String,
}

/// A postal address in rate-request form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub postcode: String,
    pub address1: String,
    pub address2: String,
    /// Always empty; the rate service does not use phone numbers.
    pub phone: String,
    pub city: String,
    pub country: Country,
    pub state: State,
    /// Only destinations carry a company. Origins omit the key entirely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
}
