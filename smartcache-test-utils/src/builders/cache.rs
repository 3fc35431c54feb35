//! Builder for caches on a manual clock

use chrono::TimeDelta;
use serde_json::Value;
use smartcache_core::persistence::SnapshotStore;
use smartcache_core::{
    CacheConfig, CacheType, ExpiryMode, ManualClock, MemoryStore, Result, SmartCache,
};
use std::sync::Arc;

/// JSON string whose serialized form is exactly `size` bytes (minimum 2)
pub fn payload_of_size(size: usize) -> Value {
    Value::String("x".repeat(size.saturating_sub(2)))
}

/// A built cache together with the handles a test drives it through
pub struct TestCache {
    pub cache: SmartCache,
    pub clock: ManualClock,
}

impl TestCache {
    /// Move the clock forward
    pub fn advance(&self, delta: TimeDelta) {
        self.clock.advance(delta);
    }
}

/// Builder for a [`SmartCache`] with seeded entries
///
/// Seeded entries are written one second apart, in order, so their age
/// ordering is deterministic. Seeding bypasses snapshot flushes.
pub struct TestCacheBuilder {
    config: CacheConfig,
    store: Arc<dyn SnapshotStore>,
    clock: ManualClock,
    seed: Vec<(String, Value, CacheType)>,
}

impl TestCacheBuilder {
    pub fn new() -> Self {
        Self {
            config: CacheConfig::test(),
            store: Arc::new(MemoryStore::new()),
            clock: ManualClock::default(),
            seed: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: CacheConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_max_size_bytes(mut self, max_size_bytes: u64) -> Self {
        self.config = self.config.with_max_size_bytes(max_size_bytes);
        self
    }

    pub fn with_expiry_mode(mut self, mode: ExpiryMode) -> Self {
        self.config = self.config.with_expiry_mode(mode);
        self
    }

    pub fn with_store(mut self, store: impl SnapshotStore + 'static) -> Self {
        self.store = Arc::new(store);
        self
    }

    pub fn with_clock(mut self, clock: ManualClock) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_entry(mut self, key: &str, data: Value, cache_type: CacheType) -> Self {
        self.seed.push((key.to_string(), data, cache_type));
        self
    }

    /// Seed `count` entries of `size` bytes named `{prefix}{i}`
    pub fn with_sized_entries(
        mut self,
        prefix: &str,
        count: usize,
        size: usize,
        cache_type: CacheType,
    ) -> Self {
        for i in 0..count {
            self.seed
                .push((format!("{prefix}{i}"), payload_of_size(size), cache_type));
        }
        self
    }

    pub async fn build(self) -> Result<TestCache> {
        let cache = SmartCache::open_with_clock(
            self.config,
            self.store,
            Arc::new(self.clock.clone()),
        )
        .await?;

        let clock = self.clock;
        let seed = self.seed;
        cache
            .with_engine(|engine| {
                for (key, data, cache_type) in seed {
                    engine.set(&key, data, cache_type);
                    clock.advance(TimeDelta::seconds(1));
                }
            })
            .await;

        Ok(TestCache { cache, clock })
    }
}

impl Default for TestCacheBuilder {
    fn default() -> Self {
        Self::new()
    }
}
