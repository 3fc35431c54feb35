//! Builders and fixtures for cache scenarios

pub mod cache;
pub mod fixtures;

pub use cache::{TestCache, TestCacheBuilder, payload_of_size};
