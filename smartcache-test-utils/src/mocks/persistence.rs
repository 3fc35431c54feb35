//! Snapshot stores with scripted behaviour

use async_trait::async_trait;
use smartcache_core::error::PersistenceError;
use smartcache_core::persistence::{Snapshot, SnapshotStore};
use smartcache_core::{MemoryStore, Result};
use std::io;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Which side of a [`FailingStore`] fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreFailure {
    Save,
    Load,
    Both,
}

/// Store whose save and/or load always fail, as a full disk or a
/// permission problem would
#[derive(Debug, Clone)]
pub struct FailingStore {
    failure: StoreFailure,
    save_attempts: Arc<AtomicUsize>,
}

impl FailingStore {
    pub fn new(failure: StoreFailure) -> Self {
        Self {
            failure,
            save_attempts: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of save calls received, successful or not
    pub fn save_attempts(&self) -> usize {
        self.save_attempts.load(Ordering::SeqCst)
    }

    fn path() -> &'static Path {
        Path::new("/unwritable/cache.json")
    }
}

#[async_trait]
impl SnapshotStore for FailingStore {
    async fn save(&self, _snapshot: &Snapshot) -> Result<()> {
        self.save_attempts.fetch_add(1, Ordering::SeqCst);
        match self.failure {
            StoreFailure::Save | StoreFailure::Both => Err(PersistenceError::write_failed(
                Self::path(),
                io::Error::new(io::ErrorKind::StorageFull, "quota exceeded"),
            )
            .into()),
            StoreFailure::Load => Ok(()),
        }
    }

    async fn load(&self) -> Result<Option<Snapshot>> {
        match self.failure {
            StoreFailure::Load | StoreFailure::Both => Err(PersistenceError::read_failed(
                Self::path(),
                io::Error::new(io::ErrorKind::PermissionDenied, "access denied"),
            )
            .into()),
            StoreFailure::Save => Ok(None),
        }
    }

    fn describe(&self) -> String {
        format!("failing store ({:?})", self.failure)
    }
}

/// In-memory store that also counts saves and loads
#[derive(Debug, Clone, Default)]
pub struct RecordingStore {
    inner: MemoryStore,
    saves: Arc<AtomicUsize>,
    loads: Arc<AtomicUsize>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            inner: MemoryStore::with_snapshot(snapshot),
            ..Self::default()
        }
    }

    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub async fn latest(&self) -> Option<Snapshot> {
        self.inner.latest().await
    }
}

#[async_trait]
impl SnapshotStore for RecordingStore {
    async fn save(&self, snapshot: &Snapshot) -> Result<()> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        self.inner.save(snapshot).await
    }

    async fn load(&self) -> Result<Option<Snapshot>> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.inner.load().await
    }

    fn describe(&self) -> String {
        "recording memory store".to_string()
    }
}
