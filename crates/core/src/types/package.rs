//! Shipping package supplied by the checkout host.
//!
//! This is the host's view of the cart, before it is turned into a
//! [`RateRequest`](super::RateRequest). `destination` and `contents` are
//! optional because hosts may call before the shopper has entered an address
//! or while the cart is being rebuilt; the rate engine reports those cases
//! instead of failing.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Destination fields as captured at checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageDestination {
    /// ISO-2 country code.
    pub country: String,
    pub state: String,
    pub postcode: String,
    pub city: String,
    pub address_1: String,
    pub address_2: String,
}

/// Catalog data for the product on a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartProduct {
    #[serde(default)]
    pub sku: String,
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub weight: Option<Decimal>,
    #[serde(default)]
    pub height: Option<Decimal>,
    #[serde(default)]
    pub width: Option<Decimal>,
    #[serde(default)]
    pub length: Option<Decimal>,
}

/// One cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Cart line key.
    pub key: String,
    pub product_id: u64,
    /// Hosts send `0` or omit the field for simple products.
    #[serde(default)]
    pub variation_id: Option<u64>,
    pub quantity: u32,
    #[serde(default)]
    pub line_tax: Decimal,
    pub product: CartProduct,
}

/// Logged-in customer details, when the host has a customer object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInfo {
    #[serde(default)]
    pub shipping_company: String,
}

/// The package to quote.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingPackage {
    #[serde(default)]
    pub destination: Option<PackageDestination>,
    /// Cart lines in cart order.
    #[serde(default)]
    pub contents: Option<Vec<CartItem>>,
    #[serde(default)]
    pub customer: Option<CustomerInfo>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_host_package() {
        let json = r#"{
            "destination": {"country": "AU", "state": "VIC", "postcode": "3000",
                            "city": "Melbourne", "address_1": "1 Collins St"},
            "contents": [
                {"key": "abc123", "product_id": 7, "variation_id": 0, "quantity": 2,
                 "line_tax": "1.20", "product": {"sku": "TEE", "name": "Tee", "price": "12.00",
                 "weight": "0.2"}}
            ]
        }"#;

        let package: ShippingPackage = serde_json::from_str(json).unwrap();
        let destination = package.destination.unwrap();
        assert_eq!(destination.address_2, "");

        let contents = package.contents.unwrap();
        assert_eq!(contents[0].variation_id, Some(0));
        assert_eq!(contents[0].product.height, None);
        assert!(package.customer.is_none());
    }

    #[test]
    fn test_missing_sections_are_none() {
        let package: ShippingPackage = serde_json::from_str("{}").unwrap();
        assert!(package.destination.is_none());
        assert!(package.contents.is_none());
    }
}
