//! No-operation snapshot store

use crate::error::Result;
use crate::persistence::{Snapshot, SnapshotStore};
use async_trait::async_trait;

/// A store that discards every snapshot
///
/// This is useful for:
/// - Running the engine without durability
/// - Benchmarking without I/O effects
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpStore;

impl NoOpStore {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SnapshotStore for NoOpStore {
    async fn save(&self, _snapshot: &Snapshot) -> Result<()> {
        Ok(())
    }

    async fn load(&self) -> Result<Option<Snapshot>> {
        Ok(None)
    }

    fn describe(&self) -> String {
        "disabled".to_string()
    }
}
