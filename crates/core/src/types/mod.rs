//! Core types for the live shipping rates service.
//!
//! The request side (`address`, `line_item`, `request`) is what gets signed and
//! sent to the remote rate service. The response side (`response`, `rate`)
//! is what comes back and is handed to the checkout. `package` is the input
//! supplied by the checkout host, and `cache` is the per-session rate set.

pub mod address;
pub mod cache;
pub mod line_item;
pub mod package;
pub mod rate;
pub mod request;
pub mod response;

pub use address::{Address, Country, State};
pub use cache::CacheEntry;
pub use line_item::{AdditionalFields, LineItem};
pub use package::{CartItem, CartProduct, CustomerInfo, PackageDestination, ShippingPackage};
pub use rate::{Rate, TAX_LINE_KEY};
pub use request::{PACKAGE_ID, PackageRequest, RateRequest};
pub use response::{PackageRates, QuotedRate, RatesResponse};
