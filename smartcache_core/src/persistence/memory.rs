//! In-memory snapshot store
//!
//! Keeps the last snapshot in process memory. Useful for tests and for
//! embedding the engine where durability is handled elsewhere.

use crate::error::Result;
use crate::persistence::{Snapshot, SnapshotStore};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Snapshot store that lives in memory
///
/// Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slot: Arc<RwLock<Option<Snapshot>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a snapshot already saved
    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            slot: Arc::new(RwLock::new(Some(snapshot))),
        }
    }

    /// Last saved snapshot
    pub async fn latest(&self) -> Option<Snapshot> {
        self.slot.read().await.clone()
    }
}

#[async_trait]
impl SnapshotStore for MemoryStore {
    async fn save(&self, snapshot: &Snapshot) -> Result<()> {
        *self.slot.write().await = Some(snapshot.clone());
        Ok(())
    }

    async fn load(&self) -> Result<Option<Snapshot>> {
        Ok(self.slot.read().await.clone())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::CacheMetrics;
    use crate::persistence::SNAPSHOT_VERSION;
    use chrono::Utc;

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = MemoryStore::new();
        assert!(store.load().await.unwrap().is_none());

        let snapshot = Snapshot {
            version: SNAPSHOT_VERSION,
            entries: Vec::new(),
            metrics: CacheMetrics::default(),
            saved_at: Utc::now(),
        };
        store.save(&snapshot).await.unwrap();

        let shared = store.clone();
        assert_eq!(shared.latest().await, Some(snapshot));
    }
}
