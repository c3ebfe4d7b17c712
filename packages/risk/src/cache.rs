//! Cache-aside storage for raw risk payloads.
//!
//! Entries are keyed by (region, disaster type) and expire after the TTL
//! passed to [`RiskCache::set`]. Cache failures are reported as
//! [`CacheError`] so the caller can decide how to degrade; the assessor
//! treats a failed read as a miss and a failed write as a no-op.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use disaster_watch_risk_models::{DisasterType, RegionId, RiskData};
use tokio::time::Instant;

/// Prefix of every rendered cache key.
pub const CACHE_KEY_PREFIX: &str = "risk_data";

/// Errors from cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// The backing store could not be reached or is unusable.
    #[error("Cache unavailable: {message}")]
    Unavailable {
        /// Description of the failure.
        message: String,
    },

    /// A payload could not be encoded or a stored entry decoded.
    #[error("Cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Composite key of a cached payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CacheKey {
    /// Region the payload was fetched for.
    pub region_id: RegionId,
    /// Disaster type the payload was fetched for.
    pub disaster_type: DisasterType,
}

impl CacheKey {
    #[must_use]
    pub const fn new(region_id: RegionId, disaster_type: DisasterType) -> Self {
        Self {
            region_id,
            disaster_type,
        }
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{CACHE_KEY_PREFIX}:{}:{}",
            self.region_id, self.disaster_type
        )
    }
}

/// Key-value store for raw risk payloads.
#[async_trait]
pub trait RiskCache: Send + Sync {
    /// Returns the live entry for `key`, or `None` if absent or expired.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if the store cannot be read.
    async fn get(&self, key: &CacheKey) -> Result<Option<RiskData>, CacheError>;

    /// Stores `value` under `key` for `ttl`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if the store cannot be written.
    async fn set(&self, key: &CacheKey, value: &RiskData, ttl: Duration)
    -> Result<(), CacheError>;
}

struct CachedEntry {
    payload: String,
    expires_at: Instant,
}

/// In-process [`RiskCache`] holding JSON-encoded payloads.
///
/// Expiry uses [`tokio::time::Instant`], so tests can drive it with a
/// paused clock.
#[derive(Default)]
pub struct MemoryRiskCache {
    entries: Mutex<BTreeMap<String, CachedEntry>>,
}

impl MemoryRiskCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every expired entry and returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Unavailable`] if the entry lock is poisoned.
    pub fn purge_expired(&self) -> Result<usize, CacheError> {
        let now = Instant::now();
        let mut entries = self.lock()?;
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at > now);
        Ok(before - entries.len())
    }

    /// Number of stored entries, including expired ones not yet purged.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Unavailable`] if the entry lock is poisoned.
    pub fn len(&self) -> Result<usize, CacheError> {
        Ok(self.lock()?.len())
    }

    /// Returns `true` if nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Unavailable`] if the entry lock is poisoned.
    pub fn is_empty(&self) -> Result<bool, CacheError> {
        Ok(self.lock()?.is_empty())
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<String, CachedEntry>>, CacheError> {
        self.entries.lock().map_err(|_| CacheError::Unavailable {
            message: "risk cache lock poisoned".to_string(),
        })
    }
}

#[async_trait]
impl RiskCache for MemoryRiskCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<RiskData>, CacheError> {
        let rendered = key.to_string();
        let payload = {
            let mut entries = self.lock()?;
            match entries.get(&rendered) {
                Some(entry) if entry.expires_at > Instant::now() => entry.payload.clone(),
                Some(_) => {
                    entries.remove(&rendered);
                    return Ok(None);
                }
                None => return Ok(None),
            }
        };

        Ok(Some(serde_json::from_str(&payload)?))
    }

    async fn set(
        &self,
        key: &CacheKey,
        value: &RiskData,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let payload = serde_json::to_string(value)?;
        let entry = CachedEntry {
            payload,
            expires_at: Instant::now() + ttl,
        };
        self.lock()?.insert(key.to_string(), entry);
        Ok(())
    }
}
