//! Live Rates Core - Shared types library.
//!
//! This crate provides the types exchanged between the pieces of the live
//! shipping rates service:
//! - `server` - Rate engine and HTTP surface used by the checkout host
//! - `cli` - Command-line tools for migrations and settings
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Rate request/response documents, host package input, cached rate sets

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
