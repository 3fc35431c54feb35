//! Test utilities for SmartCache
//!
//! This crate provides mock snapshot stores, mock expensive operations,
//! cache builders and domain fixtures for testing the SmartCache crates.

pub mod builders;
pub mod mocks;

// Re-export commonly used types
pub use builders::{TestCache, TestCacheBuilder, fixtures, payload_of_size};
pub use mocks::{CountingOperation, FailingOperation, FailingStore, RecordingStore, StoreFailure};
