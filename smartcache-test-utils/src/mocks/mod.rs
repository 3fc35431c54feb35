//! Mock implementations for testing

pub mod operations;
pub mod persistence;

pub use operations::{CountingOperation, FailingOperation};
pub use persistence::{FailingStore, RecordingStore, StoreFailure};
