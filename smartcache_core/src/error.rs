//! Error types for the SmartCache core library
//!
//! Errors are organized into logical categories. Cache storage itself never
//! surfaces these to callers of `get`/`set`; they are produced by the
//! persistence collaborators, configuration validation and the wrappers
//! around expensive operations.

use thiserror::Error;

pub mod internal;
pub mod persistence;
pub mod validation;

pub use internal::InternalError;
pub use persistence::{PersistenceError, PersistenceErrorKind};
pub use validation::ValidationError;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the SmartCache core library
///
/// Errors are categorized into three main types:
/// - Persistence errors: snapshot reads and writes
/// - Validation errors: configuration and input validation
/// - Internal errors: expensive operations, serialization, invariants
#[derive(Error, Debug)]
pub enum Error {
    /// Snapshot persistence errors
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    /// Validation related errors
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Internal library errors
    #[error(transparent)]
    Internal(#[from] InternalError),
}

impl Error {
    /// Whether the caller can carry on with in-memory state after this error
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Persistence(_) => true,
            Self::Validation(_) => false,
            Self::Internal(err) => err.is_recoverable(),
        }
    }
}

// Conversions from external error types

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Self::Persistence(PersistenceError::from_io(source))
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Self::Internal(InternalError::serialization(source.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as StdError;
    use std::io;
    use std::path::Path;
    use std::time::Duration;

    #[test]
    fn test_write_failure_is_recoverable() {
        let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "read-only");
        let error = Error::Persistence(PersistenceError::write_failed(
            Path::new("/snapshots/cache.json"),
            io_error,
        ));

        assert!(error.is_recoverable());
        assert!(error.to_string().contains("/snapshots/cache.json"));
        assert!(error.source().is_some());
    }

    #[test]
    fn test_unknown_cache_type_is_not_recoverable() {
        let error = Error::Validation(ValidationError::unknown_cache_type("video"));

        assert!(!error.is_recoverable());
        assert!(error.to_string().contains("video"));
    }

    #[test]
    fn test_from_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "gone");
        let error: Error = io_error.into();

        match error {
            Error::Persistence(err) => assert_eq!(err.kind, PersistenceErrorKind::ReadFailed),
            _ => panic!("Expected Persistence error"),
        }
    }

    #[test]
    fn test_from_serde_json_error() {
        let parse_error = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let error: Error = parse_error.into();

        assert!(matches!(
            error,
            Error::Internal(InternalError::Serialization { .. })
        ));
    }

    #[test]
    fn test_timeout_display() {
        let error = Error::Internal(InternalError::operation_timeout(
            "cv_analysis",
            Duration::from_millis(1500),
        ));

        assert!(error.to_string().contains("cv_analysis"));
        assert!(error.to_string().contains("1500"));
        assert!(error.is_recoverable());
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }
}
