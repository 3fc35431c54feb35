//! SmartCache Core Library
//!
//! Size-bounded, type-aware caching of expensive operation results (CV
//! analysis, job matching, cover letter templates) with hit/miss accounting,
//! snapshot persistence and periodic maintenance.

pub mod cache_type;
pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod persistence;
pub mod scheduler;
pub mod services;
pub mod smart_cache;
pub mod store;

// Mock stores and operations live in the smartcache-test-utils crate

// Re-export main types
pub use cache_type::{CachePolicy, CacheType, PolicyOverride, PolicyTable};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{CacheConfig, ExpiryMode, MaintenanceConfig};
pub use engine::{CacheEngine, SetOutcome};
pub use error::{Error, Result};
pub use metrics::{CacheMetrics, CacheStats, HitMiss};
pub use persistence::{JsonFileStore, MemoryStore, NoOpStore, Snapshot, SnapshotStore};
pub use scheduler::{MaintenanceScheduler, MemoryProbe, NoMemoryProbe};
pub use smart_cache::{LoadOutcome, SmartCache, Visibility};
pub use store::{CacheEntry, CacheStore, composite_key, payload_size};
