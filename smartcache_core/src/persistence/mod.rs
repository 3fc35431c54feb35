//! Snapshot persistence
//!
//! The engine serializes its whole state (entries and metrics) as one
//! [`Snapshot`] and hands it to a [`SnapshotStore`]. Stores are best-effort
//! durability aids: callers log their errors and carry on.

use crate::error::Result;
use crate::metrics::CacheMetrics;
use crate::store::CacheEntry;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod file;
pub mod memory;
pub mod noop;

pub use file::JsonFileStore;
pub use memory::MemoryStore;
pub use noop::NoOpStore;

/// Schema version written into every snapshot
pub const SNAPSHOT_VERSION: u32 = 1;

/// Full serialized copy of the store and metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Snapshots written before versioning existed decode as version 0
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub entries: Vec<(String, CacheEntry)>,
    #[serde(default)]
    pub metrics: CacheMetrics,
    pub saved_at: DateTime<Utc>,
}

impl Snapshot {
    /// Whether this build can read the snapshot
    pub fn is_supported(&self) -> bool {
        self.version <= SNAPSHOT_VERSION
    }
}

/// Durable home for snapshots
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Persist a snapshot, replacing any previous one
    async fn save(&self, snapshot: &Snapshot) -> Result<()>;

    /// Read the last snapshot
    ///
    /// Returns `Ok(None)` when nothing was saved yet, or an error when the
    /// snapshot could not be read or decoded.
    async fn load(&self) -> Result<Option<Snapshot>>;

    /// Short description for log lines
    fn describe(&self) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unversioned_snapshot_decodes_as_version_zero() {
        let snapshot: Snapshot = serde_json::from_str(
            r#"{"entries": [], "metrics": {}, "saved_at": "2025-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(snapshot.version, 0);
        assert!(snapshot.is_supported());
    }

    #[test]
    fn test_newer_snapshot_is_not_supported() {
        let snapshot: Snapshot =
            serde_json::from_str(r#"{"version": 99, "saved_at": "2025-01-01T00:00:00Z"}"#).unwrap();
        assert!(!snapshot.is_supported());
    }
}
