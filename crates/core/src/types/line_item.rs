//! Cart line items in rate-request form.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Product dimensions, nested under `additional_fields` in the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditionalFields {
    pub dimensions_unit: String,
    pub height: Option<Decimal>,
    pub width: Option<Decimal>,
    pub length: Option<Decimal>,
}

/// One cart line. Lines with the same SKU are never merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Cart line key.
    pub id: String,
    pub product_id: u64,
    /// `None` when the line is not a variation.
    pub variant_id: Option<u64>,
    pub sku: String,
    pub name: String,
    /// Unit price.
    pub price: Decimal,
    /// Tax for the whole line.
    pub tax: Decimal,
    pub quantity: u32,
    pub weight_unit: String,
    pub weight: Option<Decimal>,
    /// Product options. Not populated, but the rate service expects the key.
    pub options: Vec<serde_json::Value>,
    pub additional_fields: AdditionalFields,
}
