//! Per-session rate cache.
//!
//! Rate sets are keyed by `<method_id>-<signature>`, so any change to the
//! destination, the cart or the secret lands on a different key and no
//! explicit invalidation is needed. Entries are trusted for
//! [`CACHE_TTL_SECONDS`] after the fetch that produced them.

use std::collections::HashMap;
use std::future::Future;

use chrono::{DateTime, Duration, Utc};
use live_rates_core::{CacheEntry, Rate};
use thiserror::Error;
use tokio::sync::RwLock;
use tower_sessions::Session;
use tracing::{debug, warn};

/// How long a fetched rate set stays valid.
pub const CACHE_TTL_SECONDS: i64 = 300;

/// Errors from the session storage backend.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Session store failed.
    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

/// Per-shopper key-value storage for cached rate sets.
pub trait SessionCache: Send + Sync {
    /// Load the entry stored under `key`.
    fn load(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<CacheEntry>, CacheError>> + Send;

    /// Store `entry` under `key`, replacing any previous entry.
    fn store(
        &self,
        key: &str,
        entry: &CacheEntry,
    ) -> impl Future<Output = Result<(), CacheError>> + Send;

    /// Remove the entry stored under `key`.
    fn remove(&self, key: &str) -> impl Future<Output = Result<(), CacheError>> + Send;
}

impl SessionCache for Session {
    async fn load(&self, key: &str) -> Result<Option<CacheEntry>, CacheError> {
        Ok(self.get::<CacheEntry>(key).await?)
    }

    async fn store(&self, key: &str, entry: &CacheEntry) -> Result<(), CacheError> {
        self.insert(key, entry).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), CacheError> {
        self.remove_value(key).await?;
        Ok(())
    }
}

/// In-memory session cache for a single shopper.
///
/// Used by hosts that keep their own session lifetime, and in tests.
#[derive(Debug, Default)]
pub struct MemorySessionCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl MemorySessionCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, expired ones included.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl SessionCache for MemorySessionCache {
    async fn load(&self, key: &str) -> Result<Option<CacheEntry>, CacheError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn store(&self, key: &str, entry: &CacheEntry) -> Result<(), CacheError> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), entry.clone());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), CacheError> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

/// Derive the cache key for a signed request.
#[must_use]
pub fn cache_key(method_id: &str, signature: &str) -> String {
    format!("{method_id}-{signature}")
}

/// Build a fresh entry valid for [`CACHE_TTL_SECONDS`] from `now`.
#[must_use]
pub fn fresh_entry(signature: &str, rates: Vec<Rate>, now: DateTime<Utc>) -> CacheEntry {
    CacheEntry {
        signature: signature.to_string(),
        valid_until: now + Duration::seconds(CACHE_TTL_SECONDS),
        rates,
    }
}

/// TTL-aware view over a shopper's session cache.
///
/// Storage failures are logged and treated as a miss; a broken session must
/// not block the checkout.
#[derive(Debug)]
pub struct RateCache<'a, C> {
    store: &'a C,
}

impl<'a, C: SessionCache> RateCache<'a, C> {
    #[must_use]
    pub const fn new(store: &'a C) -> Self {
        Self { store }
    }

    /// Get the entry for `key` if it is still valid at `now`.
    ///
    /// An expired entry is removed and reported as absent.
    pub async fn get(&self, key: &str, now: DateTime<Utc>) -> Option<CacheEntry> {
        let entry = match self.store.load(key).await {
            Ok(entry) => entry?,
            Err(e) => {
                warn!(error = %e, "Failed to read cached shipping rates");
                return None;
            }
        };

        if entry.is_valid_at(now) {
            return Some(entry);
        }

        debug!(valid_until = %entry.valid_until, "Cached shipping rates expired");
        self.invalidate(key).await;
        None
    }

    /// Store an entry, overwriting any previous one.
    pub async fn put(&self, key: &str, entry: &CacheEntry) {
        if let Err(e) = self.store.store(key, entry).await {
            warn!(error = %e, "Failed to cache shipping rates");
        }
    }

    /// Delete the entry for `key`.
    pub async fn invalidate(&self, key: &str) {
        if let Err(e) = self.store.remove(key).await {
            warn!(error = %e, "Failed to evict cached shipping rates");
        }
    }
}
