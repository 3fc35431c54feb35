//! Command orchestrators for business logic
//!
//! This module provides orchestrators that coordinate between the CLI layer
//! and the core library services.

pub mod cache_orchestrator;
pub mod demo_orchestrator;

pub use cache_orchestrator::CacheOrchestrator;
pub use demo_orchestrator::{DemoOptions, DemoOrchestrator, DemoStep};
