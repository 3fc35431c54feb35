//! JSON file snapshot store
//!
//! Writes go to a sibling temporary file which is then renamed over the
//! snapshot, so a crash mid-write leaves the previous snapshot intact.

use crate::error::{PersistenceError, Result};
use crate::persistence::{Snapshot, SnapshotStore};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Snapshot file name used inside a data directory
pub const SNAPSHOT_FILE: &str = "cache.json";

/// Snapshot store backed by a single JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Store the snapshot at an explicit path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store the snapshot as `cache.json` inside `dir`
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(SNAPSHOT_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| SNAPSHOT_FILE.into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl Default for JsonFileStore {
    fn default() -> Self {
        // XDG data directory, falling back to the working directory
        let dir = dirs::data_dir()
            .map(|d| d.join("smartcache"))
            .unwrap_or_else(|| PathBuf::from(".smartcache"));
        Self::in_dir(&dir)
    }
}

#[async_trait]
impl SnapshotStore for JsonFileStore {
    async fn save(&self, snapshot: &Snapshot) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| PersistenceError::write_failed(parent, e))?;
        }

        let data = serde_json::to_vec(snapshot)
            .map_err(|e| PersistenceError::write_failed(&self.path, e))?;

        let temp = self.temp_path();
        let mut file = fs::File::create(&temp)
            .await
            .map_err(|e| PersistenceError::write_failed(&temp, e))?;
        file.write_all(&data)
            .await
            .map_err(|e| PersistenceError::write_failed(&temp, e))?;
        file.flush()
            .await
            .map_err(|e| PersistenceError::write_failed(&temp, e))?;
        drop(file);

        fs::rename(&temp, &self.path)
            .await
            .map_err(|e| PersistenceError::write_failed(&self.path, e))?;

        log::debug!(
            "Saved snapshot with {} entries to {}",
            snapshot.entries.len(),
            self.path.display()
        );
        Ok(())
    }

    async fn load(&self) -> Result<Option<Snapshot>> {
        let data = match fs::read(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(PersistenceError::read_failed(&self.path, e).into()),
        };

        let snapshot: Snapshot = serde_json::from_slice(&data)
            .map_err(|e| PersistenceError::corrupt(e.to_string()).with_path(&self.path))?;
        Ok(Some(snapshot))
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}
