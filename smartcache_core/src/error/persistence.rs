//! Snapshot persistence error types

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Persistence error with additional context
#[derive(Error, Debug)]
#[error("{}", format_persistence_error(self))]
pub struct PersistenceError {
    /// The kind of persistence error
    pub kind: PersistenceErrorKind,
    /// Location of the snapshot (if file backed)
    pub path: Option<PathBuf>,
    /// Human readable detail
    pub detail: Option<String>,
    /// Underlying error (if any)
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

/// Kind of persistence error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistenceErrorKind {
    /// Snapshot could not be written
    WriteFailed,
    /// Snapshot could not be read
    ReadFailed,
    /// Snapshot was read but could not be decoded
    CorruptSnapshot,
    /// Snapshot was written by a newer schema
    UnsupportedVersion,
}

impl PersistenceError {
    /// Create a write failure
    pub fn write_failed(
        path: &Path,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            kind: PersistenceErrorKind::WriteFailed,
            path: Some(path.to_path_buf()),
            detail: None,
            source: Some(source.into()),
        }
    }

    /// Create a read failure
    pub fn read_failed(
        path: &Path,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            kind: PersistenceErrorKind::ReadFailed,
            path: Some(path.to_path_buf()),
            detail: None,
            source: Some(source.into()),
        }
    }

    /// Create a corrupt snapshot error
    pub fn corrupt(detail: impl Into<String>) -> Self {
        Self {
            kind: PersistenceErrorKind::CorruptSnapshot,
            path: None,
            detail: Some(detail.into()),
            source: None,
        }
    }

    /// Create an unsupported schema version error
    pub fn unsupported_version(found: u32, supported: u32) -> Self {
        Self {
            kind: PersistenceErrorKind::UnsupportedVersion,
            path: None,
            detail: Some(format!("found version {found}, supported up to {supported}")),
            source: None,
        }
    }

    /// Create a persistence error from a standard I/O error
    pub fn from_io(source: std::io::Error) -> Self {
        Self {
            kind: PersistenceErrorKind::ReadFailed,
            path: None,
            detail: None,
            source: Some(Box::new(source)),
        }
    }

    /// Attach the snapshot location
    pub fn with_path(mut self, path: &Path) -> Self {
        self.path = Some(path.to_path_buf());
        self
    }

    /// Whether loading should fall back to a cold start
    pub fn is_cold_start(&self) -> bool {
        !matches!(self.kind, PersistenceErrorKind::WriteFailed)
    }
}

fn format_persistence_error(error: &PersistenceError) -> String {
    let what = match error.kind {
        PersistenceErrorKind::WriteFailed => "Failed to write snapshot",
        PersistenceErrorKind::ReadFailed => "Failed to read snapshot",
        PersistenceErrorKind::CorruptSnapshot => "Corrupt snapshot",
        PersistenceErrorKind::UnsupportedVersion => "Unsupported snapshot version",
    };

    let mut message = what.to_string();
    if let Some(path) = &error.path {
        message.push_str(&format!(" at {}", path.display()));
    }
    if let Some(detail) = &error.detail {
        message.push_str(&format!(": {detail}"));
    } else if let Some(source) = &error.source {
        message.push_str(&format!(": {source}"));
    }
    message
}
