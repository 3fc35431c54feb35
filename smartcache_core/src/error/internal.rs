//! Internal library error types

use std::time::Duration;
use thiserror::Error;

/// Internal library errors
#[derive(Error, Debug)]
pub enum InternalError {
    /// Expensive operation did not finish in time
    #[error("Operation '{operation}' timed out after {timeout_ms} ms")]
    OperationTimeout { operation: String, timeout_ms: u128 },

    /// Expensive operation reported a failure
    #[error("Operation '{operation}' failed: {message}")]
    OperationFailed { operation: String, message: String },

    /// Payload could not be (de)serialized
    #[error("Serialization failed: {message}")]
    Serialization { message: String },

    /// Internal assertion failure
    #[error("Internal assertion failed: {message}")]
    Assertion { message: String },
}

impl InternalError {
    /// Create an operation timeout error
    pub fn operation_timeout(operation: &str, timeout: Duration) -> Self {
        Self::OperationTimeout {
            operation: operation.to_string(),
            timeout_ms: timeout.as_millis(),
        }
    }

    /// Create an operation failure error
    pub fn operation_failed(operation: &str, message: impl Into<String>) -> Self {
        Self::OperationFailed {
            operation: operation.to_string(),
            message: message.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Create an internal assertion failure error
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::Assertion {
            message: message.into(),
        }
    }

    /// Check if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::OperationTimeout { .. } | Self::OperationFailed { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_timeout_error() {
        let error = InternalError::operation_timeout("job_matching", Duration::from_secs(2));
        assert!(error.to_string().contains("job_matching"));
        assert!(error.to_string().contains("2000 ms"));
        assert!(error.is_recoverable());
    }

    #[test]
    fn test_operation_failed_error() {
        let error = InternalError::operation_failed("template_generation", "model offline");
        assert!(error.to_string().contains("template_generation"));
        assert!(error.to_string().contains("model offline"));
        assert!(error.is_recoverable());
    }

    #[test]
    fn test_serialization_error() {
        let error = InternalError::serialization("key must be a string");
        assert!(error.to_string().contains("Serialization failed"));
        assert!(!error.is_recoverable());
    }

    #[test]
    fn test_assertion_error() {
        let error = InternalError::assertion("Invariant violated");
        assert!(error.to_string().contains("Internal assertion failed"));
        assert!(!error.is_recoverable());
    }
}
