//! Hit/miss accounting and the simulated savings model
//!
//! Only the tracked types (cv, job, template) are tallied. Efficiency,
//! savings and credits are derived values, refreshed on every observation and
//! stored alongside the counters so a snapshot carries what was last reported.

use crate::cache_type::{CacheType, PolicyTable};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Efficiency reported before any tracked lookup has happened
pub const DEFAULT_EFFICIENCY: u32 = 90;

/// Credit budget the credits-used figure is computed against
pub const DEFAULT_CREDITS_TOTAL: u64 = 1500;

/// Hit and miss counters for one cache type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitMiss {
    pub hits: u64,
    pub misses: u64,
}

/// Cache metrics, persisted with every snapshot
///
/// Missing fields in an older snapshot fall back to the defaults, so loading
/// merges the saved values over a fresh set of metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheMetrics {
    pub counters: BTreeMap<CacheType, HitMiss>,
    pub efficiency: u32,
    pub total_savings: u64,
    pub credits_used: u64,
    pub credits_total: u64,
}

impl Default for CacheMetrics {
    fn default() -> Self {
        Self::new(DEFAULT_CREDITS_TOTAL)
    }
}

impl CacheMetrics {
    /// Fresh metrics with no observations
    pub fn new(credits_total: u64) -> Self {
        Self {
            counters: BTreeMap::new(),
            efficiency: DEFAULT_EFFICIENCY,
            total_savings: 0,
            credits_used: credits_used(credits_total, DEFAULT_EFFICIENCY),
            credits_total,
        }
    }

    /// Record a hit. Untracked types are ignored; returns whether it counted.
    pub fn record_hit(&mut self, cache_type: CacheType, policies: &PolicyTable) -> bool {
        if !cache_type.is_tracked() {
            return false;
        }
        self.counters.entry(cache_type).or_default().hits += 1;
        self.recompute(policies);
        true
    }

    /// Record a miss. Untracked types are ignored; returns whether it counted.
    pub fn record_miss(&mut self, cache_type: CacheType, policies: &PolicyTable) -> bool {
        if !cache_type.is_tracked() {
            return false;
        }
        self.counters.entry(cache_type).or_default().misses += 1;
        self.recompute(policies);
        true
    }

    /// Refresh efficiency, savings and credits from the counters
    pub fn recompute(&mut self, policies: &PolicyTable) {
        self.efficiency = efficiency(self.total_hits(), self.total_misses());
        self.total_savings = CacheType::TRACKED
            .iter()
            .map(|t| self.hits(*t) * policies.unit_cost(*t))
            .sum();
        self.credits_used = credits_used(self.credits_total, self.efficiency);
    }

    pub fn hits(&self, cache_type: CacheType) -> u64 {
        self.counters.get(&cache_type).map_or(0, |c| c.hits)
    }

    pub fn misses(&self, cache_type: CacheType) -> u64 {
        self.counters.get(&cache_type).map_or(0, |c| c.misses)
    }

    pub fn total_hits(&self) -> u64 {
        CacheType::TRACKED.iter().map(|t| self.hits(*t)).sum()
    }

    pub fn total_misses(&self) -> u64 {
        CacheType::TRACKED.iter().map(|t| self.misses(*t)).sum()
    }

    /// Credits saved relative to the budget
    pub fn credits_saved(&self) -> u64 {
        self.credits_total.saturating_sub(self.credits_used)
    }
}

/// Hit rate in whole percent, rounded half up; [`DEFAULT_EFFICIENCY`] with no data
pub fn efficiency(hits: u64, misses: u64) -> u32 {
    let total = u128::from(hits) + u128::from(misses);
    if total == 0 {
        return DEFAULT_EFFICIENCY;
    }
    // round(100 * h / t) == floor((200 * h + t) / (2 * t))
    ((200 * u128::from(hits) + total) / (2 * total)) as u32
}

/// floor(credits_total * (1 - efficiency / 100))
pub fn credits_used(credits_total: u64, efficiency: u32) -> u64 {
    let remaining = 100u128.saturating_sub(u128::from(efficiency));
    (u128::from(credits_total) * remaining / 100) as u64
}

/// Read-only projection handed to reporting collaborators
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub total_entries: usize,
    pub total_size: u64,
    pub max_size: u64,
    pub efficiency: u32,
    pub total_savings: u64,
    pub credits_used: u64,
    pub credits_total: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_fresh_metrics_report_defaults() {
        let metrics = CacheMetrics::default();
        assert_eq!(metrics.efficiency, 90);
        assert_eq!(metrics.credits_used, 150);
        assert_eq!(metrics.total_savings, 0);
        assert_eq!(metrics.credits_saved(), 1350);
    }

    #[test]
    fn test_nine_hits_one_miss_is_ninety_percent() {
        let policies = PolicyTable::default();
        let mut metrics = CacheMetrics::default();
        for _ in 0..9 {
            metrics.record_hit(CacheType::Job, &policies);
        }
        metrics.record_miss(CacheType::Cv, &policies);

        assert_eq!(metrics.total_hits(), 9);
        assert_eq!(metrics.total_misses(), 1);
        assert_eq!(metrics.efficiency, 90);
        assert_eq!(metrics.total_savings, 45);
        assert_eq!(metrics.credits_used, 150);
    }

    #[test]
    fn test_untracked_types_are_ignored() {
        let policies = PolicyTable::default();
        let mut metrics = CacheMetrics::default();

        assert!(!metrics.record_hit(CacheType::Semantic, &policies));
        assert!(!metrics.record_miss(CacheType::General, &policies));
        assert_eq!(metrics.total_hits() + metrics.total_misses(), 0);
        assert_eq!(metrics.efficiency, DEFAULT_EFFICIENCY);
    }

    #[test]
    fn test_savings_weight_by_unit_cost() {
        let policies = PolicyTable::default();
        let mut metrics = CacheMetrics::default();
        metrics.record_hit(CacheType::Cv, &policies);
        metrics.record_hit(CacheType::Template, &policies);
        metrics.record_hit(CacheType::Job, &policies);

        assert_eq!(metrics.total_savings, 50 + 15 + 5);
        assert_eq!(metrics.efficiency, 100);
        assert_eq!(metrics.credits_used, 0);
    }

    #[test]
    fn test_rounding_is_half_up() {
        // 1 / 8 = 12.5%
        assert_eq!(efficiency(1, 7), 13);
        // 2 / 3 = 66.67%
        assert_eq!(efficiency(2, 1), 67);
        assert_eq!(efficiency(0, 5), 0);
    }

    #[test]
    fn test_credits_used_floors() {
        assert_eq!(credits_used(1500, 67), 495);
        assert_eq!(credits_used(1000, 33), 670);
        assert_eq!(credits_used(7, 50), 3);
    }

    #[test]
    fn test_partial_snapshot_merges_over_defaults() {
        let metrics: CacheMetrics =
            serde_json::from_str(r#"{"counters":{"cv":{"hits":3,"misses":1}}}"#).unwrap();
        assert_eq!(metrics.hits(CacheType::Cv), 3);
        assert_eq!(metrics.credits_total, DEFAULT_CREDITS_TOTAL);
    }

    proptest! {
        #[test]
        fn prop_efficiency_matches_rounded_ratio(hits in 0u64..10_000, misses in 0u64..10_000) {
            let expected = if hits + misses == 0 {
                90
            } else {
                (100.0 * hits as f64 / (hits + misses) as f64).round() as u32
            };
            prop_assert_eq!(efficiency(hits, misses), expected);
        }
    }
}
