//! Cache command orchestrator
//!
//! Opens the snapshot-backed cache for one CLI invocation and runs a single
//! operation against it. Every command that changes state ends with an
//! explicit save whose failure is reported to the user.

use crate::error::{CliError, ErrorContext};
use crate::output::StatsReport;
use anyhow::{Context, Result};
use log::debug;
use serde_json::Value;
use smartcache_core::{CacheConfig, CacheType, JsonFileStore, SetOutcome, SmartCache};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Orchestrator for the cache inspection and maintenance commands
pub struct CacheOrchestrator {
    cache: SmartCache,
    snapshot: PathBuf,
}

impl CacheOrchestrator {
    /// Open the cache stored at `snapshot`
    pub async fn open(config: &CacheConfig, snapshot: PathBuf) -> Result<Self> {
        debug!("Opening cache snapshot at {}", snapshot.display());
        let store = JsonFileStore::new(&snapshot);
        let cache = SmartCache::open(config.clone(), Arc::new(store))
            .await
            .context("Failed to open cache")?;
        Ok(Self { cache, snapshot })
    }

    pub fn cache(&self) -> &SmartCache {
        &self.cache
    }

    pub fn snapshot_path(&self) -> &Path {
        &self.snapshot
    }

    pub async fn stats(&self) -> StatsReport {
        let stats = self.cache.stats().await;
        let metrics = self.cache.metrics().await;
        StatsReport::new(self.snapshot.clone(), stats, &metrics)
    }

    /// Look up a value; the recorded hit or miss is persisted
    pub async fn get(&self, cache_type: CacheType, key: &str) -> Result<Option<Value>> {
        let value = self.cache.get(key, cache_type).await;
        self.persist().await?;
        Ok(value)
    }

    /// Store a JSON document given on the command line
    pub async fn set(&self, cache_type: CacheType, key: &str, raw: &str) -> Result<SetOutcome> {
        let data: Value = serde_json::from_str(raw).map_err(|e| {
            CliError::misuse(&format!("Value is not valid JSON: {e}"))
                .with_context("value", raw)
                .with_suggestion("Quote the value, e.g. '{\"skills\": [\"rust\"]}'")
        })?;
        let outcome = self.cache.set(key, data, cache_type).await;
        self.persist().await?;
        Ok(outcome)
    }

    pub async fn cleanup(&self) -> Result<usize> {
        let removed = self.cache.cleanup_expired_entries().await;
        self.persist().await?;
        Ok(removed)
    }

    pub async fn evict(&self) -> Result<usize> {
        let removed = self.cache.evict_old_entries().await;
        self.persist().await?;
        Ok(removed)
    }

    pub async fn clear(&self) -> Result<usize> {
        let removed = self.cache.clear().await;
        self.persist().await?;
        Ok(removed)
    }

    /// Save the snapshot, failing the command if the write fails
    pub async fn persist(&self) -> Result<()> {
        self.cache
            .try_save()
            .await
            .with_context(|| format!("Failed to save snapshot to {}", self.snapshot.display()))
    }
}
