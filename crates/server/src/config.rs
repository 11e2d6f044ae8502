//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `LIVE_RATES_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `LIVE_RATES_BASE_URL` - Public URL of this service
//! - `LIVE_RATES_ADMIN_TOKEN` - Bearer token for the settings endpoints (high entropy)
//! - `STORE_DEFAULT_COUNTRY` - Store location as `Country:State` (e.g., `AU:NSW`)
//!
//! ## Optional
//! - `LIVE_RATES_HOST` - Bind address (default: 127.0.0.1)
//! - `LIVE_RATES_PORT` - Listen port (default: 3000)
//! - `LIVE_RATES_METHOD_ENABLED` - `yes` to offer live rates (default: yes)
//! - `STORE_POSTCODE`, `STORE_ADDRESS`, `STORE_ADDRESS_2`, `STORE_CITY`, `STORE_STATE` - Store address
//! - `STORE_CURRENCY` - ISO 4217 currency code (default: AUD)
//! - `STORE_WEIGHT_UNIT` - Weight unit (default: kg)
//! - `STORE_DIMENSION_UNIT` - Dimension unit (default: cm)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Trace sample rate (default: 0.0)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use thiserror::Error;

use secrecy::{ExposeSecret, SecretString};

/// Value that turns the shipping method on.
pub const ENABLED_VALUE: &str = "yes";

/// Method id used as the cache-key prefix.
pub const METHOD_ID: &str = "ps_live_shipping_rates";

const MIN_ADMIN_TOKEN_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL
    pub base_url: String,
    /// Bearer token required by the settings endpoints
    pub admin_token: SecretString,
    /// Shipping method switch
    pub method: MethodConfig,
    /// Store origin, currency and units
    pub store: StoreConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Fraction of errors sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

/// Shipping method configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodConfig {
    /// Cache-key prefix.
    pub id: String,
    /// Whether live rates are offered at all.
    pub enabled: bool,
}

impl Default for MethodConfig {
    fn default() -> Self {
        Self {
            id: METHOD_ID.to_string(),
            enabled: true,
        }
    }
}

/// Store-wide settings used to build the rate request origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Store location as `Country:State`.
    pub default_country: String,
    pub postcode: String,
    pub address: String,
    pub address_2: String,
    pub city: String,
    /// Explicit store state. Falls back to the state in `default_country`.
    pub state: String,
    pub currency: String,
    pub weight_unit: String,
    pub dimension_unit: String,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the admin token fails validation (length, placeholder detection,
    /// entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("LIVE_RATES_DATABASE_URL")?;
        let host = get_env_or_default("LIVE_RATES_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("LIVE_RATES_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("LIVE_RATES_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("LIVE_RATES_PORT".to_string(), e.to_string())
            })?;
        let base_url = get_required_env("LIVE_RATES_BASE_URL")?;
        let admin_token = get_validated_secret("LIVE_RATES_ADMIN_TOKEN")?;
        validate_token_length(&admin_token, "LIVE_RATES_ADMIN_TOKEN")?;

        let method = MethodConfig {
            id: METHOD_ID.to_string(),
            enabled: get_env_or_default("LIVE_RATES_METHOD_ENABLED", ENABLED_VALUE)
                == ENABLED_VALUE,
        };
        let store = StoreConfig::from_env()?;

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            admin_token,
            method,
            store,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: get_rate("SENTRY_SAMPLE_RATE", 1.0)?,
            sentry_traces_sample_rate: get_rate("SENTRY_TRACES_SAMPLE_RATE", 0.0)?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl StoreConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            default_country: get_required_env("STORE_DEFAULT_COUNTRY")?,
            postcode: get_env_or_default("STORE_POSTCODE", ""),
            address: get_env_or_default("STORE_ADDRESS", ""),
            address_2: get_env_or_default("STORE_ADDRESS_2", ""),
            city: get_env_or_default("STORE_CITY", ""),
            state: get_env_or_default("STORE_STATE", ""),
            currency: get_env_or_default("STORE_CURRENCY", "AUD"),
            weight_unit: get_env_or_default("STORE_WEIGHT_UNIT", "kg"),
            dimension_unit: get_env_or_default("STORE_DIMENSION_UNIT", "cm"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get database URL with fallback to generic `DATABASE_URL` (used by Fly.io postgres attach).
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get a sample rate in `0.0..=1.0`.
fn get_rate(key: &str, default: f32) -> Result<f32, ConfigError> {
    let Some(raw) = get_optional_env(key) else {
        return Ok(default);
    };
    let rate = raw
        .parse::<f32>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !(0.0..=1.0).contains(&rate) {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("must be between 0.0 and 1.0 (got {rate})"),
        ));
    }
    Ok(rate)
}

/// Validate that a token meets minimum length requirements.
fn validate_token_length(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_ADMIN_TOKEN_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_ADMIN_TOKEN_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated token."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}
