//! Rate service settings storage.
//!
//! Two values are stored: the rate service URL and the shared signing secret.
//! Production reads them from `PostgreSQL` through a short-lived `moka` cache;
//! tests and embedded hosts use the in-memory store.

use std::fmt;
use std::sync::LazyLock;
use std::time::Duration;

use moka::future::Cache;
use regex::Regex;
use secrecy::SecretString;
use sqlx::PgPool;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

use crate::db::{RepositoryError, SettingsRepository};
use crate::rates::{RateSettings, SettingsProvider};

/// Settings key for the rate service URL.
pub const URL_KEY: &str = "shipping_rates_url";

/// Settings key for the shared signing secret.
pub const SECRET_KEY: &str = "shipping_rates_secret";

/// How long database reads are reused.
const READ_CACHE_TTL_SECS: u64 = 60;

const CACHE_KEY: &str = "rate_settings";

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("Invalid regex"));
static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid regex"));

/// Errors reading or writing settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Database operation failed.
    #[error("settings repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// URL is not an absolute `http` or `https` URL.
    #[error("invalid rate service URL: {0}")]
    InvalidUrl(String),
}

/// Clean a single-line text value before it is stored.
///
/// Strips markup tags, drops control characters (line breaks and tabs
/// included), collapses runs of whitespace and trims the ends.
#[must_use]
pub fn sanitize_text_field(raw: &str) -> String {
    let without_tags = TAG_RE.replace_all(raw, "");
    let printable: String = without_tags
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();

    WHITESPACE_RE
        .replace_all(&printable, " ")
        .trim()
        .to_string()
}

/// Check that `url` is an absolute `http`/`https` URL.
///
/// # Errors
///
/// Returns `SettingsError::InvalidUrl` otherwise.
pub fn validate_url(url: &str) -> Result<(), SettingsError> {
    let parsed = url::Url::parse(url).map_err(|e| SettingsError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(SettingsError::InvalidUrl(format!(
            "unsupported scheme {other:?}"
        ))),
    }
}

fn to_settings(url: Option<String>, secret: Option<String>) -> RateSettings {
    RateSettings {
        url,
        secret: secret.map(SecretString::from),
    }
}

// =============================================================================
// PostgreSQL store
// =============================================================================

/// Settings persisted in `live_rates.settings`.
#[derive(Clone)]
pub struct PgSettingsStore {
    pool: PgPool,
    cache: Cache<&'static str, RateSettings>,
}

impl fmt::Debug for PgSettingsStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgSettingsStore")
            .field("cached", &self.cache.entry_count())
            .finish_non_exhaustive()
    }
}

impl PgSettingsStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        let cache = Cache::builder()
            .max_capacity(1)
            .time_to_live(Duration::from_secs(READ_CACHE_TTL_SECS))
            .build();

        Self { pool, cache }
    }

    /// Read both settings, bypassing the cache.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::Repository` if the query fails.
    pub async fn load_uncached(&self) -> Result<RateSettings, SettingsError> {
        let repo = SettingsRepository::new(&self.pool);
        let url = repo.get(URL_KEY).await?;
        let secret = repo.get(SECRET_KEY).await?;
        Ok(to_settings(url, secret))
    }

    /// Store both settings in one transaction. Values must already be
    /// sanitized.
    ///
    /// The read cache is dropped whether or not the write succeeds, so the
    /// next read reflects what the database actually holds.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::Repository` if the transaction fails; neither
    /// value is changed in that case.
    pub async fn save(&self, url: &str, secret: &str) -> Result<(), SettingsError> {
        let result = SettingsRepository::new(&self.pool)
            .upsert_all(&[(URL_KEY, url), (SECRET_KEY, secret)])
            .await;
        self.cache.invalidate(CACHE_KEY).await;
        Ok(result?)
    }

    /// Delete both settings.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::Repository` if the delete fails.
    pub async fn clear(&self) -> Result<u64, SettingsError> {
        let result = SettingsRepository::new(&self.pool)
            .delete(&[URL_KEY, SECRET_KEY])
            .await;
        self.cache.invalidate(CACHE_KEY).await;
        Ok(result?)
    }
}

impl SettingsProvider for PgSettingsStore {
    async fn rate_settings(&self) -> Result<RateSettings, SettingsError> {
        if let Some(settings) = self.cache.get(CACHE_KEY).await {
            return Ok(settings);
        }

        let settings = self.load_uncached().await?;
        self.cache.insert(CACHE_KEY, settings.clone()).await;
        debug!("Loaded rate settings from database");
        Ok(settings)
    }
}

// =============================================================================
// In-memory store
// =============================================================================

/// Settings held in process memory.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    values: RwLock<(Option<String>, Option<String>)>,
}

impl MemorySettingsStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with the given values, stored as-is.
    #[must_use]
    pub fn with_values(url: Option<&str>, secret: Option<&str>) -> Self {
        Self {
            values: RwLock::new((url.map(String::from), secret.map(String::from))),
        }
    }

    pub async fn save(&self, url: &str, secret: &str) {
        *self.values.write().await = (Some(url.to_string()), Some(secret.to_string()));
    }

    pub async fn clear(&self) -> u64 {
        let mut values = self.values.write().await;
        let removed = u64::from(values.0.is_some()) + u64::from(values.1.is_some());
        *values = (None, None);
        removed
    }
}

impl SettingsProvider for MemorySettingsStore {
    async fn rate_settings(&self) -> Result<RateSettings, SettingsError> {
        let (url, secret) = self.values.read().await.clone();
        Ok(to_settings(url, secret))
    }
}

// =============================================================================
// SettingsStore
// =============================================================================

/// Settings backend selected at startup.
#[derive(Debug)]
pub enum SettingsStore {
    Postgres(PgSettingsStore),
    Memory(MemorySettingsStore),
}

impl SettingsStore {
    /// Sanitize, validate and store both settings.
    ///
    /// Returns the values as stored.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::InvalidUrl` if the sanitized URL is not an
    /// `http`/`https` URL, or `SettingsError::Repository` if a write fails.
    #[instrument(skip_all)]
    pub async fn save(&self, url: &str, secret: &str) -> Result<RateSettings, SettingsError> {
        let url = sanitize_text_field(url);
        let secret = sanitize_text_field(secret);
        validate_url(&url)?;

        match self {
            Self::Postgres(store) => store.save(&url, &secret).await?,
            Self::Memory(store) => store.save(&url, &secret).await,
        }

        info!(url = %url, "Rate settings updated");
        Ok(to_settings(Some(url), Some(secret)))
    }

    /// Delete both settings.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::Repository` if the delete fails.
    #[instrument(skip_all)]
    pub async fn clear(&self) -> Result<u64, SettingsError> {
        let removed = match self {
            Self::Postgres(store) => store.clear().await?,
            Self::Memory(store) => store.clear().await,
        };

        info!(removed, "Rate settings removed");
        Ok(removed)
    }
}

impl SettingsProvider for SettingsStore {
    async fn rate_settings(&self) -> Result<RateSettings, SettingsError> {
        match self {
            Self::Postgres(store) => store.rate_settings().await,
            Self::Memory(store) => store.rate_settings().await,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn test_sanitize_strips_tags_and_whitespace() {
        assert_eq!(
            sanitize_text_field("  <b>https://rates.test/quote</b>\n"),
            "https://rates.test/quote"
        );
        assert_eq!(sanitize_text_field("a\tb\r\n  c"), "a b c");
        assert_eq!(sanitize_text_field("<script>x</script>"), "x");
        assert_eq!(sanitize_text_field("   "), "");
    }

    #[test]
    fn test_sanitize_keeps_plain_values() {
        assert_eq!(sanitize_text_field("s3cr3t+/=="), "s3cr3t+/==");
        assert_eq!(
            sanitize_text_field("https://rates.test/q?a=1&b=2"),
            "https://rates.test/q?a=1&b=2"
        );
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("https://rates.test/quote").is_ok());
        assert!(validate_url("http://127.0.0.1:8080/").is_ok());
        assert!(matches!(
            validate_url("ftp://rates.test"),
            Err(SettingsError::InvalidUrl(_))
        ));
        assert!(matches!(
            validate_url("not a url"),
            Err(SettingsError::InvalidUrl(_))
        ));
        assert!(validate_url("").is_err());
    }

    #[tokio::test]
    async fn test_memory_store_starts_empty() {
        let store = SettingsStore::Memory(MemorySettingsStore::new());
        let settings = store.rate_settings().await.unwrap();
        assert!(settings.url().is_none());
        assert!(settings.secret().is_none());
    }

    #[tokio::test]
    async fn test_save_sanitizes_and_round_trips() {
        let store = SettingsStore::Memory(MemorySettingsStore::new());

        let saved = store
            .save(" https://rates.test/quote\n", "<i>k3y</i> ")
            .await
            .unwrap();
        assert_eq!(saved.url(), Some("https://rates.test/quote"));

        let settings = store.rate_settings().await.unwrap();
        assert_eq!(settings.url.as_deref(), Some("https://rates.test/quote"));
        assert_eq!(settings.secret().unwrap().expose_secret(), "k3y");
    }

    #[tokio::test]
    async fn test_save_rejects_bad_url() {
        let store = SettingsStore::Memory(MemorySettingsStore::new());
        let err = store.save("javascript:alert(1)", "k3y").await.unwrap_err();
        assert!(matches!(err, SettingsError::InvalidUrl(_)));
        assert!(store.rate_settings().await.unwrap().url.is_none());
    }

    fn unreachable_pg_store() -> PgSettingsStore {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(300))
            .connect_lazy("postgres://lsr@127.0.0.1:9/lsr")
            .unwrap();
        PgSettingsStore::new(pool)
    }

    #[tokio::test]
    async fn test_failed_save_drops_cached_settings() {
        let store = unreachable_pg_store();
        store
            .cache
            .insert(CACHE_KEY, to_settings(Some("https://old.test".into()), Some("old".into())))
            .await;

        let err = store.save("https://new.test", "new").await.unwrap_err();
        assert!(matches!(err, SettingsError::Repository(_)));
        assert!(store.cache.get(CACHE_KEY).await.is_none());
    }

    #[tokio::test]
    async fn test_failed_clear_drops_cached_settings() {
        let store = unreachable_pg_store();
        store
            .cache
            .insert(CACHE_KEY, to_settings(Some("https://old.test".into()), Some("old".into())))
            .await;

        assert!(store.clear().await.is_err());
        assert!(store.cache.get(CACHE_KEY).await.is_none());
    }

    #[tokio::test]
    async fn test_clear_removes_both_values() {
        let store = SettingsStore::Memory(MemorySettingsStore::with_values(
            Some("https://rates.test"),
            Some("k3y"),
        ));

        assert_eq!(store.clear().await.unwrap(), 2);
        let settings = store.rate_settings().await.unwrap();
        assert!(settings.url.is_none());
        assert!(settings.secret.is_none());
        assert_eq!(store.clear().await.unwrap(), 0);
    }
}
