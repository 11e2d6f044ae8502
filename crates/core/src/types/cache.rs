//! Cached rate sets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::rate::Rate;

/// Rates fetched for one signed request, valid until `valid_until`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Signature header of the request these rates answer.
    pub signature: String,
    pub valid_until: DateTime<Utc>,
    pub rates: Vec<Rate>,
}

impl CacheEntry {
    /// Whether the entry can still be trusted at `now`.
    #[must_use]
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.valid_until > now
    }
}
