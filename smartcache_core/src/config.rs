//! Engine configuration

use crate::cache_type::{CacheType, PolicyOverride, PolicyTable};
use crate::error::{Result, ValidationError};
use crate::metrics::DEFAULT_CREDITS_TOTAL;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// How a lookup treats an entry that has outlived its retention
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpiryMode {
    /// Report a miss but leave the entry (and its bytes) in place until cleanup
    #[default]
    Lazy,
    /// Report a miss and remove the entry immediately
    Eager,
}

/// Intervals for the periodic maintenance tasks
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MaintenanceConfig {
    pub metrics_refresh_secs: u64,
    pub flush_secs: u64,
    pub cleanup_secs: u64,
    pub memory_check_secs: u64,
    /// Heap usage ratio above which the memory probe triggers eviction
    pub memory_pressure_threshold: f64,
}

impl Default for MaintenanceConfig {
    fn default() -> Self {
        Self {
            metrics_refresh_secs: 30,
            flush_secs: 5,
            cleanup_secs: 60 * 60,
            memory_check_secs: 60,
            memory_pressure_threshold: 0.9,
        }
    }
}

impl MaintenanceConfig {
    pub fn metrics_refresh_interval(&self) -> Duration {
        Duration::from_secs(self.metrics_refresh_secs)
    }

    pub fn flush_interval(&self) -> Duration {
        Duration::from_secs(self.flush_secs)
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_secs)
    }

    pub fn memory_check_interval(&self) -> Duration {
        Duration::from_secs(self.memory_check_secs)
    }
}

/// Core cache configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CacheConfig {
    /// Capacity limit for the sum of entry sizes
    pub max_size_bytes: u64,
    pub expiry_mode: ExpiryMode,
    pub credits_total: u64,
    /// Per-type retention and cost overrides
    pub policies: BTreeMap<CacheType, PolicyOverride>,
    pub maintenance: MaintenanceConfig,
    /// Upper bound on a single expensive operation
    pub operation_timeout_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_size_bytes: 50 * 1024 * 1024, // 50MB
            expiry_mode: ExpiryMode::Lazy,
            credits_total: DEFAULT_CREDITS_TOTAL,
            policies: BTreeMap::new(),
            maintenance: MaintenanceConfig::default(),
            operation_timeout_secs: 30,
        }
    }
}

impl CacheConfig {
    /// Create a test configuration
    pub fn test() -> Self {
        Self {
            max_size_bytes: 1000,
            maintenance: MaintenanceConfig {
                metrics_refresh_secs: 1,
                flush_secs: 1,
                cleanup_secs: 1,
                memory_check_secs: 1,
                memory_pressure_threshold: 0.9,
            },
            operation_timeout_secs: 5,
            ..Self::default()
        }
    }

    /// Builder-style capacity override
    pub fn with_max_size_bytes(mut self, max_size_bytes: u64) -> Self {
        self.max_size_bytes = max_size_bytes;
        self
    }

    /// Builder-style expiry mode override
    pub fn with_expiry_mode(mut self, mode: ExpiryMode) -> Self {
        self.expiry_mode = mode;
        self
    }

    pub fn operation_timeout(&self) -> Duration {
        Duration::from_secs(self.operation_timeout_secs)
    }

    /// Resolve the per-type policy table
    pub fn policy_table(&self) -> Result<PolicyTable> {
        PolicyTable::from_overrides(&self.policies)
    }

    /// Reject configurations the engine cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.max_size_bytes == 0 {
            return Err(ValidationError::invalid_configuration("max_size_bytes must be positive").into());
        }
        if self.operation_timeout_secs == 0 {
            return Err(
                ValidationError::invalid_configuration("operation_timeout_secs must be positive")
                    .into(),
            );
        }
        let m = &self.maintenance;
        for (name, secs) in [
            ("maintenance.metrics_refresh_secs", m.metrics_refresh_secs),
            ("maintenance.flush_secs", m.flush_secs),
            ("maintenance.cleanup_secs", m.cleanup_secs),
            ("maintenance.memory_check_secs", m.memory_check_secs),
        ] {
            if secs == 0 {
                return Err(ValidationError::invalid_parameter(name, "interval must be positive").into());
            }
        }
        if !(m.memory_pressure_threshold > 0.0 && m.memory_pressure_threshold <= 1.0) {
            return Err(ValidationError::invalid_parameter(
                "maintenance.memory_pressure_threshold",
                "must be in (0, 1]",
            )
            .into());
        }
        self.policy_table().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = CacheConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_size_bytes, 52_428_800);
        assert_eq!(config.expiry_mode, ExpiryMode::Lazy);
        assert_eq!(config.maintenance.cleanup_interval(), Duration::from_secs(3600));
    }

    #[test]
    fn test_test_config_is_valid() {
        assert!(CacheConfig::test().validate().is_ok());
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        let config = CacheConfig::default().with_max_size_bytes(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        let mut config = CacheConfig::default();
        config.maintenance.flush_secs = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("flush_secs"));
    }

    #[test]
    fn test_bad_threshold_is_rejected() {
        let mut config = CacheConfig::default();
        config.maintenance.memory_pressure_threshold = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: CacheConfig = serde_json::from_str(
            r#"{"max_size_bytes": 2048, "expiry_mode": "eager", "policies": {"job": {"retention_secs": 60}}}"#,
        )
        .unwrap();
        assert_eq!(config.max_size_bytes, 2048);
        assert_eq!(config.expiry_mode, ExpiryMode::Eager);
        assert_eq!(config.credits_total, 1500);
        let table = config.policy_table().unwrap();
        assert_eq!(table.retention(CacheType::Job), chrono::TimeDelta::seconds(60));
    }
}
