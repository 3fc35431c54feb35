//! Shared async handle over the engine and its snapshot store
//!
//! [`SmartCache`] is cheap to clone. Every operation takes the engine lock
//! for the duration of one synchronous engine call, so mutations never
//! interleave; a lookup followed by a store across an `.await` is not atomic
//! and the later store simply wins.

use crate::cache_type::CacheType;
use crate::clock::{Clock, SystemClock};
use crate::config::CacheConfig;
use crate::engine::{CacheEngine, SetOutcome};
use crate::error::{PersistenceError, Result};
use crate::metrics::{CacheMetrics, CacheStats};
use crate::persistence::{SNAPSHOT_VERSION, SnapshotStore};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Efficiency below which the metrics refresh logs a warning
pub const EFFICIENCY_WARNING_THRESHOLD: u32 = 85;

/// Efficiency at or above which the metrics refresh reports optimal
pub const EFFICIENCY_TARGET: u32 = 90;

/// Page/app visibility as reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
}

/// Result of rehydrating from persistence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Snapshot applied
    Restored { entries: usize, size_bytes: u64 },
    /// Nothing saved yet
    NoSnapshot,
    /// Snapshot unreadable, corrupt or too new; starting empty
    ColdStart,
}

/// Cloneable handle shared by the wrappers and the maintenance tasks
#[derive(Clone)]
pub struct SmartCache {
    engine: Arc<Mutex<CacheEngine>>,
    store: Arc<dyn SnapshotStore>,
    config: Arc<CacheConfig>,
    /// Serializes snapshot writes so a later snapshot is never overwritten
    /// by an earlier one
    save_lock: Arc<Mutex<()>>,
}

impl SmartCache {
    /// Wrap an existing engine
    pub fn new(engine: CacheEngine, store: Arc<dyn SnapshotStore>, config: CacheConfig) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
            store,
            config: Arc::new(config),
            save_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Build an engine on the wall clock and rehydrate it from `store`
    pub async fn open(config: CacheConfig, store: Arc<dyn SnapshotStore>) -> Result<Self> {
        Self::open_with_clock(config, store, Arc::new(SystemClock)).await
    }

    /// Build an engine on `clock` and rehydrate it from `store`
    pub async fn open_with_clock(
        config: CacheConfig,
        store: Arc<dyn SnapshotStore>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let engine = CacheEngine::with_clock(&config, clock)?;
        let cache = Self::new(engine, store, config);
        cache.load_from_persistence().await;
        log::info!(
            "Smart caching initialized ({}) - targeting {EFFICIENCY_TARGET}% efficiency",
            cache.store.describe()
        );
        Ok(cache)
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Run a closure against the engine under the lock
    pub async fn with_engine<R>(&self, f: impl FnOnce(&mut CacheEngine) -> R) -> R {
        let mut engine = self.engine.lock().await;
        f(&mut engine)
    }

    pub async fn get(&self, key: &str, cache_type: CacheType) -> Option<Value> {
        self.engine.lock().await.get(key, cache_type)
    }

    pub async fn get_as<T: DeserializeOwned>(&self, key: &str, cache_type: CacheType) -> Option<T> {
        self.engine.lock().await.get_as(key, cache_type)
    }

    /// Store a value and flush a snapshot if it was accepted
    pub async fn set(&self, key: &str, data: Value, cache_type: CacheType) -> SetOutcome {
        let outcome = self.engine.lock().await.set(key, data, cache_type);
        if outcome.is_stored() {
            self.save_to_persistence().await;
        }
        outcome
    }

    /// Serialize and store a value
    pub async fn set_value<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        cache_type: CacheType,
    ) -> Result<SetOutcome> {
        let data = serde_json::to_value(value)?;
        Ok(self.set(key, data, cache_type).await)
    }

    /// Memory-pressure entry point; safe on an empty cache
    pub async fn evict_old_entries(&self) -> usize {
        self.engine.lock().await.evict_old_entries()
    }

    /// Remove expired entries, flushing when anything was removed
    pub async fn cleanup_expired_entries(&self) -> usize {
        let removed = self.engine.lock().await.cleanup_expired_entries();
        if removed > 0 {
            self.save_to_persistence().await;
        }
        removed
    }

    pub async fn invalidate(&self, key: &str, cache_type: CacheType) -> bool {
        let removed = self.engine.lock().await.invalidate(key, cache_type);
        if removed {
            self.save_to_persistence().await;
        }
        removed
    }

    pub async fn clear(&self) -> usize {
        let removed = self.engine.lock().await.clear();
        self.save_to_persistence().await;
        removed
    }

    pub async fn stats(&self) -> CacheStats {
        self.engine.lock().await.stats()
    }

    pub async fn metrics(&self) -> CacheMetrics {
        self.engine.lock().await.metrics().clone()
    }

    /// Periodic metrics refresh: report efficiency against the target
    pub async fn refresh_metrics(&self) -> CacheStats {
        let stats = self.stats().await;
        if stats.efficiency < EFFICIENCY_WARNING_THRESHOLD {
            log::warn!(
                "Cache efficiency below target: {}% (saved R{}, {} of {} credits used)",
                stats.efficiency,
                stats.total_savings,
                stats.credits_used,
                stats.credits_total
            );
        } else if stats.efficiency >= EFFICIENCY_TARGET {
            log::debug!("Cache efficiency optimal: {}%", stats.efficiency);
        }
        stats
    }

    /// Save a snapshot, returning the failure to the caller
    pub async fn try_save(&self) -> Result<()> {
        let _guard = self.save_lock.lock().await;
        let snapshot = self.engine.lock().await.snapshot();
        self.store.save(&snapshot).await
    }

    /// Save a snapshot; failures are logged and the in-memory state stays
    /// authoritative. Returns whether the save succeeded.
    pub async fn save_to_persistence(&self) -> bool {
        match self.try_save().await {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Could not save cache to {}: {e}", self.store.describe());
                false
            }
        }
    }

    /// Replace in-memory state with the stored snapshot
    ///
    /// Any read or decode failure leaves the engine untouched and is logged.
    pub async fn load_from_persistence(&self) -> LoadOutcome {
        let snapshot = match self.store.load().await {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => return LoadOutcome::NoSnapshot,
            Err(e) => {
                log::warn!("Could not load cache from {}: {e}", self.store.describe());
                return LoadOutcome::ColdStart;
            }
        };

        if !snapshot.is_supported() {
            let err = PersistenceError::unsupported_version(snapshot.version, SNAPSHOT_VERSION);
            log::warn!("Ignoring snapshot from {}: {err}", self.store.describe());
            return LoadOutcome::ColdStart;
        }

        let mut engine = self.engine.lock().await;
        engine.restore(snapshot);
        LoadOutcome::Restored {
            entries: engine.len(),
            size_bytes: engine.cache_size(),
        }
    }

    /// React to the host hiding or showing the app
    pub async fn on_visibility_change(&self, visibility: Visibility) {
        match visibility {
            Visibility::Hidden => {
                log::debug!("Hidden - flushing cache snapshot");
                self.save_to_persistence().await;
            }
            Visibility::Visible => log::debug!("Visible - resuming operations"),
        }
    }
}
