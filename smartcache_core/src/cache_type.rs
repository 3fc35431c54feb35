//! Cache categories and their retention/cost policies
//!
//! Every cached result belongs to one [`CacheType`]. The type decides how long
//! an entry stays fresh, what a hit is worth in the savings accounting, and
//! whether hits and misses count towards the efficiency metric.

use crate::error::{Result, ValidationError};
use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Category of a cached result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheType {
    /// CV analysis results
    Cv,
    /// Job match results
    Job,
    /// Cover letter base templates
    Template,
    /// Semantic job match results
    Semantic,
    /// Anything else
    General,
}

impl CacheType {
    /// All cache types in declaration order
    pub const ALL: [CacheType; 5] = [
        CacheType::Cv,
        CacheType::Job,
        CacheType::Template,
        CacheType::Semantic,
        CacheType::General,
    ];

    /// Types whose hits and misses feed the efficiency and savings metrics
    pub const TRACKED: [CacheType; 3] = [CacheType::Cv, CacheType::Job, CacheType::Template];

    /// Lowercase name used in composite keys and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheType::Cv => "cv",
            CacheType::Job => "job",
            CacheType::Template => "template",
            CacheType::Semantic => "semantic",
            CacheType::General => "general",
        }
    }

    /// Whether this type participates in the efficiency metric
    pub fn is_tracked(&self) -> bool {
        Self::TRACKED.contains(self)
    }
}

impl fmt::Display for CacheType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CacheType {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cv" => Ok(CacheType::Cv),
            "job" => Ok(CacheType::Job),
            "template" => Ok(CacheType::Template),
            "semantic" => Ok(CacheType::Semantic),
            "general" => Ok(CacheType::General),
            _ => Err(ValidationError::unknown_cache_type(s)),
        }
    }
}

/// Retention and cost for one cache type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    /// How long an entry stays fresh after it was stored
    pub retention: TimeDelta,
    /// Simulated cost of computing the result, credited per hit
    pub unit_cost: u64,
}

impl CachePolicy {
    pub fn new(retention: TimeDelta, unit_cost: u64) -> Self {
        Self {
            retention,
            unit_cost,
        }
    }

    /// Built-in policy for a type
    pub fn default_for(cache_type: CacheType) -> Self {
        match cache_type {
            CacheType::Cv => Self::new(TimeDelta::days(30), 50),
            CacheType::Job => Self::new(TimeDelta::days(1), 5),
            CacheType::Template => Self::new(TimeDelta::days(7), 15),
            CacheType::Semantic => Self::new(TimeDelta::days(3), 5),
            CacheType::General => Self::new(TimeDelta::hours(1), 5),
        }
    }
}

/// Per-type override as it appears in configuration files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyOverride {
    pub retention_secs: Option<u64>,
    pub unit_cost: Option<u64>,
}

/// Lookup table from every [`CacheType`] to its [`CachePolicy`]
///
/// The table is total: construction fills in defaults for types without an
/// override, so lookups never fall through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyTable {
    policies: BTreeMap<CacheType, CachePolicy>,
}

impl PolicyTable {
    /// Build a table from overrides, validating every resulting policy
    pub fn from_overrides(overrides: &BTreeMap<CacheType, PolicyOverride>) -> Result<Self> {
        let mut policies = BTreeMap::new();
        for cache_type in CacheType::ALL {
            let mut policy = CachePolicy::default_for(cache_type);
            if let Some(over) = overrides.get(&cache_type) {
                if let Some(secs) = over.retention_secs {
                    let secs = i64::try_from(secs).map_err(|_| {
                        ValidationError::invalid_parameter(
                            "retention_secs",
                            &format!("{secs} is out of range for {cache_type}"),
                        )
                    })?;
                    policy.retention = TimeDelta::try_seconds(secs).ok_or_else(|| {
                        ValidationError::invalid_parameter(
                            "retention_secs",
                            &format!("{secs} is out of range for {cache_type}"),
                        )
                    })?;
                }
                if let Some(cost) = over.unit_cost {
                    policy.unit_cost = cost;
                }
            }
            if policy.retention <= TimeDelta::zero() {
                return Err(ValidationError::invalid_parameter(
                    "retention_secs",
                    &format!("retention for {cache_type} must be positive"),
                )
                .into());
            }
            policies.insert(cache_type, policy);
        }
        Ok(Self { policies })
    }

    /// Policy for a type
    pub fn policy(&self, cache_type: CacheType) -> CachePolicy {
        self.policies
            .get(&cache_type)
            .copied()
            .unwrap_or_else(|| CachePolicy::default_for(cache_type))
    }

    pub fn retention(&self, cache_type: CacheType) -> TimeDelta {
        self.policy(cache_type).retention
    }

    pub fn unit_cost(&self, cache_type: CacheType) -> u64 {
        self.policy(cache_type).unit_cost
    }
}

impl Default for PolicyTable {
    fn default() -> Self {
        let policies = CacheType::ALL
            .into_iter()
            .map(|t| (t, CachePolicy::default_for(t)))
            .collect();
        Self { policies }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_types() {
        assert_eq!("cv".parse::<CacheType>().unwrap(), CacheType::Cv);
        assert_eq!("Template".parse::<CacheType>().unwrap(), CacheType::Template);
        assert_eq!(" semantic ".parse::<CacheType>().unwrap(), CacheType::Semantic);
    }

    #[test]
    fn test_parse_unknown_type_is_rejected() {
        let err = "video".parse::<CacheType>().unwrap_err();
        assert!(matches!(err, ValidationError::UnknownCacheType { .. }));
    }

    #[test]
    fn test_display_round_trips_through_from_str() {
        for cache_type in CacheType::ALL {
            assert_eq!(cache_type.to_string().parse::<CacheType>().unwrap(), cache_type);
        }
    }

    #[test]
    fn test_tracked_types() {
        assert!(CacheType::Cv.is_tracked());
        assert!(CacheType::Job.is_tracked());
        assert!(CacheType::Template.is_tracked());
        assert!(!CacheType::Semantic.is_tracked());
        assert!(!CacheType::General.is_tracked());
    }

    #[test]
    fn test_default_table() {
        let table = PolicyTable::default();
        assert_eq!(table.retention(CacheType::Cv), TimeDelta::days(30));
        assert_eq!(table.retention(CacheType::Job), TimeDelta::days(1));
        assert_eq!(table.retention(CacheType::Template), TimeDelta::days(7));
        assert_eq!(table.retention(CacheType::Semantic), TimeDelta::days(3));
        assert_eq!(table.retention(CacheType::General), TimeDelta::hours(1));
        assert_eq!(table.unit_cost(CacheType::Cv), 50);
        assert_eq!(table.unit_cost(CacheType::Job), 5);
        assert_eq!(table.unit_cost(CacheType::Template), 15);
        assert_eq!(table.unit_cost(CacheType::General), 5);
    }

    #[test]
    fn test_overrides_apply_per_type() {
        let mut overrides = BTreeMap::new();
        overrides.insert(
            CacheType::Job,
            PolicyOverride {
                retention_secs: Some(600),
                unit_cost: None,
            },
        );
        let table = PolicyTable::from_overrides(&overrides).unwrap();

        assert_eq!(table.retention(CacheType::Job), TimeDelta::minutes(10));
        assert_eq!(table.unit_cost(CacheType::Job), 5);
        assert_eq!(table.retention(CacheType::Cv), TimeDelta::days(30));
    }

    #[test]
    fn test_zero_retention_is_rejected() {
        let mut overrides = BTreeMap::new();
        overrides.insert(
            CacheType::Template,
            PolicyOverride {
                retention_secs: Some(0),
                unit_cost: Some(1),
            },
        );
        assert!(PolicyTable::from_overrides(&overrides).is_err());
    }

    #[test]
    fn test_serde_uses_lowercase_names() {
        let json = serde_json::to_string(&CacheType::Semantic).unwrap();
        assert_eq!(json, "\"semantic\"");
        let parsed: CacheType = serde_json::from_str("\"cv\"").unwrap();
        assert_eq!(parsed, CacheType::Cv);
    }
}
