//! Live shipping rate engine.
//!
//! # Architecture
//!
//! - [`RequestBuilder`] turns store config and the host package into a [`RateRequest`]
//! - [`signer`] computes the `sha256=` signature over the serialized bytes
//! - [`RateCache`] keeps fetched rate sets in the shopper's session for 5 minutes
//! - [`RateClient`] posts the signed body to the rate service and parses the reply
//! - [`ShippingRateService`] runs the whole flow and never fails outward
//!
//! Collaborators are injected through three seams: [`SettingsProvider`]
//! (rate service URL and secret), [`SessionCache`] (per-shopper storage) and
//! [`HttpPoster`] (the outbound POST).
//!
//! [`RateRequest`]: live_rates_core::RateRequest

pub mod builder;
pub mod cache;
pub mod client;
pub mod service;
pub mod signer;

pub use builder::{BuildError, RequestBuilder};
pub use cache::{
    CACHE_TTL_SECONDS, CacheError, MemorySessionCache, RateCache, SessionCache, cache_key,
    fresh_entry,
};
pub use client::{HttpPoster, PostResponse, RateClient, ReqwestPoster, SIGNATURE_HEADER};
pub use service::{RateSettings, SettingsProvider, ShippingRateService};

use thiserror::Error;

/// Diagnostic codes logged when rates cannot be calculated.
///
/// Operators use these to tell configuration problems from missing input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticCode {
    /// Rate service URL is not set.
    MissingUrl = 10,
    /// Shared signing secret is not set.
    MissingSecret = 20,
    /// Package has no destination.
    MissingDestination = 100,
    /// Package has no contents.
    MissingContents = 200,
}

impl DiagnosticCode {
    /// Numeric code as written to the logs.
    #[must_use]
    pub const fn code(self) -> u16 {
        self as u16
    }

    const fn subject(self) -> &'static str {
        match self {
            Self::MissingUrl | Self::MissingSecret => "settings",
            Self::MissingDestination => "destination",
            Self::MissingContents => "contents",
        }
    }
}

/// Errors that stop a rate calculation.
///
/// None of these reach the checkout; [`ShippingRateService::calculate_shipping`]
/// logs them and returns no rates.
#[derive(Debug, Error)]
pub enum ShippingError {
    /// Rate service URL or secret is not configured.
    #[error("Missing shipping rates settings. error code: {}", .0.code())]
    ConfigurationMissing(DiagnosticCode),

    /// Package lacks destination or contents.
    #[error("Unable to get {} info. error code: {}", .0.subject(), .0.code())]
    InputMissing(DiagnosticCode),

    /// Settings could not be loaded.
    #[error("Settings error: {0}")]
    Settings(String),

    /// Request document could not be built.
    #[error("Build error: {0}")]
    Build(#[from] BuildError),

    /// Request could not be serialized or signed.
    #[error("Signing error: {0}")]
    Signing(String),

    /// Network, TLS or timeout failure.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Rate service answered with a status other than 200.
    #[error("HTTP Error: {0}")]
    Remote(u16),

    /// Response body was not a valid rates document.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl ShippingError {
    /// Diagnostic code, for configuration and input errors.
    #[must_use]
    pub const fn diagnostic_code(&self) -> Option<u16> {
        match self {
            Self::ConfigurationMissing(code) | Self::InputMissing(code) => Some(code.code()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_codes() {
        assert_eq!(DiagnosticCode::MissingUrl.code(), 10);
        assert_eq!(DiagnosticCode::MissingSecret.code(), 20);
        assert_eq!(DiagnosticCode::MissingDestination.code(), 100);
        assert_eq!(DiagnosticCode::MissingContents.code(), 200);
    }

    #[test]
    fn test_configuration_error_display() {
        let err = ShippingError::ConfigurationMissing(DiagnosticCode::MissingSecret);
        assert_eq!(
            err.to_string(),
            "Missing shipping rates settings. error code: 20"
        );
        assert_eq!(err.diagnostic_code(), Some(20));
    }

    #[test]
    fn test_input_error_display() {
        let err = ShippingError::InputMissing(DiagnosticCode::MissingContents);
        assert_eq!(err.to_string(), "Unable to get contents info. error code: 200");

        let err = ShippingError::InputMissing(DiagnosticCode::MissingDestination);
        assert_eq!(
            err.to_string(),
            "Unable to get destination info. error code: 100"
        );
    }

    #[test]
    fn test_remote_error_has_no_code() {
        let err = ShippingError::Remote(500);
        assert_eq!(err.to_string(), "HTTP Error: 500");
        assert_eq!(err.diagnostic_code(), None);
    }
}
