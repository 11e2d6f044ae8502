//! Rate request document.
//!
//! The request is serialized once with [`RateRequest::to_bytes`]; those exact
//! bytes are both signed and sent as the HTTP body.

use serde::{Deserialize, Serialize};

use super::address::Address;
use super::line_item::LineItem;

/// Package id of the single synthesized package.
pub const PACKAGE_ID: u32 = 1;

/// The shipment sent for quoting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageRequest {
    pub id: u32,
    pub currency_code: String,
    pub origin: Address,
    pub destination: Address,
    pub items: Vec<LineItem>,
}

/// Top-level rate request body: `{"packages": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateRequest {
    pub packages: Vec<PackageRequest>,
}

impl RateRequest {
    /// Wrap a single shipment in a request, using the fixed package id.
    #[must_use]
    pub fn single(
        currency_code: String,
        origin: Address,
        destination: Address,
        items: Vec<LineItem>,
    ) -> Self {
        Self {
            packages: vec![PackageRequest {
                id: PACKAGE_ID,
                currency_code,
                origin,
                destination,
                items,
            }],
        }
    }

    /// Serialize to the canonical compact JSON byte form.
    ///
    /// Fields are emitted in declaration order, so the same request always
    /// produces the same bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}
