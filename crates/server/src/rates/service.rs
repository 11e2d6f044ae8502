//! Shipping rate orchestration.
//!
//! `calculate_shipping` walks a fixed sequence: method switch, settings,
//! package input, build + sign, session cache, remote fetch, cache write.
//! The first failing step ends the calculation with no rates.

use std::fmt;
use std::future::Future;

use chrono::{DateTime, Utc};
use live_rates_core::{Rate, ShippingPackage};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, error, instrument};

use super::builder::RequestBuilder;
use super::cache::{RateCache, SessionCache, cache_key, fresh_entry};
use super::client::{HttpPoster, RateClient};
use super::{DiagnosticCode, ShippingError, signer};
use crate::config::MethodConfig;
use crate::settings::SettingsError;

/// Rate service URL and shared signing secret.
///
/// Implements `Debug` manually to redact the secret.
#[derive(Clone, Default)]
pub struct RateSettings {
    pub url: Option<String>,
    pub secret: Option<SecretString>,
}

impl fmt::Debug for RateSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RateSettings")
            .field("url", &self.url)
            .field("secret", &self.secret.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl RateSettings {
    /// Configured URL, unless unset or blank.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Configured secret, unless unset or blank.
    #[must_use]
    pub fn secret(&self) -> Option<&SecretString> {
        self.secret
            .as_ref()
            .filter(|secret| !secret.expose_secret().trim().is_empty())
    }
}

/// Read access to the rate service settings.
pub trait SettingsProvider: Send + Sync {
    fn rate_settings(&self) -> impl Future<Output = Result<RateSettings, SettingsError>> + Send;
}

/// Computes live shipping rates for checkout packages.
///
/// Settings and the HTTP poster are shared for the whole process; the session
/// cache belongs to one shopper and is passed on every call.
#[derive(Debug)]
pub struct ShippingRateService<S, H> {
    method: MethodConfig,
    builder: RequestBuilder,
    settings: S,
    client: RateClient<H>,
}

impl<S: SettingsProvider, H: HttpPoster> ShippingRateService<S, H> {
    #[must_use]
    pub const fn new(
        method: MethodConfig,
        builder: RequestBuilder,
        settings: S,
        client: RateClient<H>,
    ) -> Self {
        Self {
            method,
            builder,
            settings,
            client,
        }
    }

    #[must_use]
    pub const fn method(&self) -> &MethodConfig {
        &self.method
    }

    #[must_use]
    pub const fn settings(&self) -> &S {
        &self.settings
    }

    #[must_use]
    pub const fn client(&self) -> &RateClient<H> {
        &self.client
    }

    /// Calculate rates for a package.
    ///
    /// Always returns a list, possibly empty. Failures are logged with their
    /// diagnostic code and never reach the caller.
    pub async fn calculate_shipping<C: SessionCache>(
        &self,
        package: &ShippingPackage,
        cache: &C,
    ) -> Vec<Rate> {
        self.calculate_shipping_at(package, cache, Utc::now()).await
    }

    /// [`calculate_shipping`](Self::calculate_shipping) with an explicit clock.
    pub async fn calculate_shipping_at<C: SessionCache>(
        &self,
        package: &ShippingPackage,
        cache: &C,
        now: DateTime<Utc>,
    ) -> Vec<Rate> {
        match self.try_calculate(package, cache, now).await {
            Ok(rates) => rates,
            Err(err) => {
                log_failure(&err);
                Vec::new()
            }
        }
    }

    /// Run the calculation, reporting why it stopped.
    ///
    /// # Errors
    ///
    /// Returns the first `ShippingError` encountered. A disabled method is
    /// not an error and yields `Ok` with no rates.
    #[instrument(skip_all, fields(method = %self.method.id))]
    pub async fn try_calculate<C: SessionCache>(
        &self,
        package: &ShippingPackage,
        cache: &C,
        now: DateTime<Utc>,
    ) -> Result<Vec<Rate>, ShippingError> {
        if !self.method.enabled {
            debug!("Live shipping rates disabled");
            return Ok(Vec::new());
        }

        let settings = self
            .settings
            .rate_settings()
            .await
            .map_err(|e| ShippingError::Settings(e.to_string()))?;
        let url = settings
            .url()
            .ok_or(ShippingError::ConfigurationMissing(DiagnosticCode::MissingUrl))?;
        let secret = settings
            .secret()
            .ok_or(ShippingError::ConfigurationMissing(DiagnosticCode::MissingSecret))?;

        let destination = package
            .destination
            .as_ref()
            .ok_or(ShippingError::InputMissing(DiagnosticCode::MissingDestination))?;
        let contents = package
            .contents
            .as_deref()
            .ok_or(ShippingError::InputMissing(DiagnosticCode::MissingContents))?;

        let request = self
            .builder
            .build(destination, contents, package.customer.as_ref())?;
        let body = request
            .to_bytes()
            .map_err(|e| ShippingError::Signing(e.to_string()))?;
        let signature = signer::sign(&body, secret)?;

        let key = cache_key(&self.method.id, &signature);
        let rate_cache = RateCache::new(cache);
        if let Some(entry) = rate_cache.get(&key, now).await {
            debug!(count = entry.rates.len(), "Using cached shipping rates");
            return Ok(entry.rates);
        }

        let rates = self.client.fetch_rates(url, body, &signature).await?;
        rate_cache
            .put(&key, &fresh_entry(&signature, rates.clone(), now))
            .await;

        Ok(rates)
    }
}

fn log_failure(err: &ShippingError) {
    match err.diagnostic_code() {
        Some(code) => error!(code, "Error: {err}"),
        None => error!("Error: {err}"),
    }
}
