//! Integration tests for live shipping rates.
//!
//! Tests run against an `httpmock` server standing in for the remote rate
//! service; no database is required.
//!
//! ```bash
//! cargo test -p live-rates-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `rate_client` - outbound POST, headers and status handling
//! - `shipping_service` - full calculation with the real HTTP poster
//! - `http_api` - axum router: checkout endpoint, settings endpoints, health

use live_rates_core::{CartItem, CartProduct, CustomerInfo, PackageDestination, ShippingPackage};
use live_rates_server::config::{MethodConfig, ServerConfig, StoreConfig};
use rust_decimal::Decimal;
use secrecy::SecretString;

/// Admin token accepted by [`test_config`].
pub const ADMIN_TOKEN: &str = "kQ7vX2pL9mZ4rT8wB3nF6hJ1cD5gS0yA";

/// Shared secret used by the mock rate service.
pub const SHARED_SECRET: &str = "it-shared-s3cr3t";

/// Path the mock rate service answers on.
pub const RATES_PATH: &str = "/shipping/rates";

/// A rates document with two packages of two rates each.
pub const TWO_BY_TWO: &str = r#"{"packages_rates": [
    {"rates": [
        {"code": "AUSPOST_REG", "name": "Regular", "total_cost": "9.95", "calculated_taxes": "0.90"},
        {"code": "AUSPOST_EXP", "name": "Express", "total_cost": "14.95", "calculated_taxes": "1.36"}
    ]},
    {"rates": [
        {"code": "COURIER_STD", "name": "Courier", "total_cost": "12.00", "calculated_taxes": "1.09"},
        {"code": "COURIER_PRI", "name": "Courier Priority", "total_cost": "22.00", "calculated_taxes": "2.00"}
    ]}
]}"#;

/// Store located in Sydney, trading in AUD.
#[must_use]
pub fn store_config() -> StoreConfig {
    StoreConfig {
        default_country: "AU:NSW".to_string(),
        postcode: "2000".to_string(),
        address: "1 George St".to_string(),
        address_2: String::new(),
        city: "Sydney".to_string(),
        state: String::new(),
        currency: "AUD".to_string(),
        weight_unit: "kg".to_string(),
        dimension_unit: "cm".to_string(),
    }
}

/// Server configuration for in-process tests.
///
/// # Panics
///
/// Never; the host literal is valid.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn test_config() -> ServerConfig {
    ServerConfig {
        database_url: SecretString::from("postgres://unused@localhost/unused"),
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        base_url: "http://localhost:3000".to_string(),
        admin_token: SecretString::from(ADMIN_TOKEN),
        method: MethodConfig::default(),
        store: store_config(),
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// A package headed to Melbourne with `quantity` mugs.
#[must_use]
pub fn package(quantity: u32) -> ShippingPackage {
    ShippingPackage {
        destination: Some(PackageDestination {
            country: "AU".to_string(),
            state: "VIC".to_string(),
            postcode: "3000".to_string(),
            city: "Melbourne".to_string(),
            address_1: "1 Collins St".to_string(),
            address_2: String::new(),
        }),
        contents: Some(vec![CartItem {
            key: "c4ca4238a0b923820dcc509a6f75849b".to_string(),
            product_id: 42,
            variation_id: Some(0),
            quantity,
            line_tax: Decimal::new(200, 2),
            product: CartProduct {
                sku: "MUG-BLK".to_string(),
                name: "Black Mug".to_string(),
                price: Decimal::new(2200, 2),
                weight: Some(Decimal::new(35, 2)),
                height: Some(Decimal::new(10, 0)),
                width: Some(Decimal::new(9, 0)),
                length: Some(Decimal::new(12, 0)),
            },
        }]),
        customer: Some(CustomerInfo {
            shipping_company: "Acme".to_string(),
        }),
    }
}
