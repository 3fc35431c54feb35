//! The cache engine
//!
//! [`CacheEngine`] is the explicit context object owning the entries, the
//! running byte total, the metrics and the resolved configuration. It is
//! synchronous and holds no locks; [`crate::SmartCache`] wraps it for shared
//! async use and wires it to a snapshot store.

use crate::cache_type::{CacheType, PolicyTable};
use crate::clock::{Clock, SystemClock};
use crate::config::{CacheConfig, ExpiryMode};
use crate::error::Result;
use crate::metrics::{CacheMetrics, CacheStats};
use crate::persistence::{SNAPSHOT_VERSION, Snapshot};
use crate::store::{CacheEntry, CacheStore, composite_key, payload_size};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

/// What `set` did with the value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOutcome {
    /// Stored, after evicting `evicted` other entries to make room
    Stored { size_bytes: u64, evicted: usize },
    /// Larger than the whole capacity; not stored, nothing evicted
    Rejected { size_bytes: u64, max_size_bytes: u64 },
}

impl SetOutcome {
    pub fn is_stored(&self) -> bool {
        matches!(self, SetOutcome::Stored { .. })
    }
}

/// Fixed-capacity, multi-type result cache
pub struct CacheEngine {
    store: CacheStore,
    metrics: CacheMetrics,
    policies: PolicyTable,
    max_size_bytes: u64,
    expiry_mode: ExpiryMode,
    credits_total: u64,
    clock: Arc<dyn Clock>,
}

impl CacheEngine {
    /// Create an empty engine on the wall clock
    pub fn new(config: &CacheConfig) -> Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create an empty engine reading time from `clock`
    pub fn with_clock(config: &CacheConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store: CacheStore::new(),
            metrics: CacheMetrics::new(config.credits_total),
            policies: config.policy_table()?,
            max_size_bytes: config.max_size_bytes,
            expiry_mode: config.expiry_mode,
            credits_total: config.credits_total,
            clock,
        })
    }

    /// Look up a value, recording a hit or a miss for `cache_type`
    pub fn get(&mut self, key: &str, cache_type: CacheType) -> Option<Value> {
        let cache_key = composite_key(cache_type, key);
        let unit_cost = self.policies.unit_cost(cache_type);

        let expired = self.store.get(&cache_key).map(|entry| self.is_expired(entry));
        let fresh = match expired {
            Some(false) => self.store.get(&cache_key).map(|entry| entry.data.clone()),
            Some(true) => {
                if self.expiry_mode == ExpiryMode::Eager {
                    self.store.remove(&cache_key);
                    log::debug!("Expired entry {cache_key} removed on read");
                }
                None
            }
            None => None,
        };

        match fresh {
            Some(data) => {
                self.metrics.record_hit(cache_type, &self.policies);
                log::debug!("Cache HIT: {cache_type} - saved R{unit_cost}");
                Some(data)
            }
            None => {
                self.metrics.record_miss(cache_type, &self.policies);
                log::debug!("Cache MISS: {cache_type} - will cost R{unit_cost}");
                None
            }
        }
    }

    /// Typed lookup; a payload that does not decode as `T` counts as a miss
    pub fn get_as<T: DeserializeOwned>(&mut self, key: &str, cache_type: CacheType) -> Option<T> {
        let value = self.get(key, cache_type)?;
        match serde_json::from_value(value) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                log::warn!("Cached {cache_type} entry '{key}' did not decode: {e}");
                None
            }
        }
    }

    /// Store a value, evicting the oldest entries if the capacity requires it
    ///
    /// Overwriting a key replaces the old entry and its size. A value larger
    /// than the whole capacity is rejected without touching other entries.
    pub fn set(&mut self, key: &str, data: Value, cache_type: CacheType) -> SetOutcome {
        let cache_key = composite_key(cache_type, key);
        let size_bytes = payload_size(&data);

        if size_bytes > self.max_size_bytes {
            log::warn!(
                "Refusing to cache {cache_key}: {size_bytes} bytes exceeds capacity of {} bytes",
                self.max_size_bytes
            );
            return SetOutcome::Rejected {
                size_bytes,
                max_size_bytes: self.max_size_bytes,
            };
        }

        self.store.remove(&cache_key);

        let mut evicted = 0;
        while self.store.size_bytes() + size_bytes > self.max_size_bytes && !self.store.is_empty() {
            evicted += self.evict_old_entries();
        }

        let entry = CacheEntry {
            data,
            cache_type,
            created_at: self.clock.now(),
            size_bytes,
        };
        self.store.insert(cache_key.clone(), entry);
        log::debug!("Cached: {cache_key} - size: {size_bytes} bytes");

        SetOutcome::Stored {
            size_bytes,
            evicted,
        }
    }

    /// Serialize `value` and store it
    pub fn set_value<T: Serialize>(
        &mut self,
        key: &str,
        value: &T,
        cache_type: CacheType,
    ) -> Result<SetOutcome> {
        let data = serde_json::to_value(value)?;
        Ok(self.set(key, data, cache_type))
    }

    /// Whether an entry has outlived its type's retention
    pub fn is_expired(&self, entry: &CacheEntry) -> bool {
        self.clock.now() - entry.created_at > self.policies.retention(entry.cache_type)
    }

    /// Remove the oldest quarter (rounded up) of all entries
    ///
    /// Expiry plays no part in the selection. Returns how many were removed.
    pub fn evict_old_entries(&mut self) -> usize {
        if self.store.is_empty() {
            return 0;
        }
        let count = self.store.len().div_ceil(4);
        let victims = self.store.oldest_keys(count);
        for key in &victims {
            self.store.remove(key);
        }
        log::info!("Evicted {} old cache entries", victims.len());
        victims.len()
    }

    /// Remove every expired entry, returning how many were removed
    pub fn cleanup_expired_entries(&mut self) -> usize {
        let now = self.clock.now();
        let policies = &self.policies;
        let expired = self
            .store
            .keys_where(|entry| now - entry.created_at > policies.retention(entry.cache_type));
        for key in &expired {
            self.store.remove(key);
        }
        if !expired.is_empty() {
            log::info!("Cleaned up {} expired cache entries", expired.len());
        }
        expired.len()
    }

    /// Remove one entry without touching the metrics
    pub fn invalidate(&mut self, key: &str, cache_type: CacheType) -> bool {
        self.store.remove(&composite_key(cache_type, key)).is_some()
    }

    /// Drop every entry; metrics are kept
    pub fn clear(&mut self) -> usize {
        let removed = self.store.len();
        self.store.clear();
        removed
    }

    /// Whether an entry is physically present, fresh or not
    pub fn contains(&self, key: &str, cache_type: CacheType) -> bool {
        self.store.contains_key(&composite_key(cache_type, key))
    }

    pub fn entry(&self, key: &str, cache_type: CacheType) -> Option<&CacheEntry> {
        self.store.get(&composite_key(cache_type, key))
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Running byte total
    pub fn cache_size(&self) -> u64 {
        self.store.size_bytes()
    }

    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_bytes
    }

    pub fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }

    pub fn policies(&self) -> &PolicyTable {
        &self.policies
    }

    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    /// Reporting projection
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            total_entries: self.store.len(),
            total_size: self.store.size_bytes(),
            max_size: self.max_size_bytes,
            efficiency: self.metrics.efficiency,
            total_savings: self.metrics.total_savings,
            credits_used: self.metrics.credits_used,
            credits_total: self.credits_total,
        }
    }

    /// Capture entries and metrics
    pub fn snapshot(&self) -> Snapshot {
        let mut entries: Vec<(String, CacheEntry)> = self
            .store
            .iter()
            .map(|(k, e)| (k.clone(), e.clone()))
            .collect();
        entries.sort_by(|(a, _), (b, _)| a.cmp(b));
        Snapshot {
            version: SNAPSHOT_VERSION,
            entries,
            metrics: self.metrics.clone(),
            saved_at: self.clock.now(),
        }
    }

    /// Replace the state with a snapshot
    ///
    /// The byte total is recomputed from the loaded entries; the configured
    /// credit budget wins over the persisted one.
    pub fn restore(&mut self, snapshot: Snapshot) {
        self.store = CacheStore::from_entries(snapshot.entries);
        self.metrics = snapshot.metrics;
        self.metrics.credits_total = self.credits_total;
        self.metrics.recompute(&self.policies);
        log::info!(
            "Loaded cache with {} entries ({} bytes)",
            self.store.len(),
            self.store.size_bytes()
        );
    }
}
