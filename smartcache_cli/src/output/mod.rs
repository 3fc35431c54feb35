mod formatters;

pub use formatters::{JsonFormatter, TextFormatter, format_bytes};

use anyhow::Result;
use serde::Serialize;
use smartcache_core::{CacheMetrics, CacheStats, CacheType, HitMiss};
use std::path::PathBuf;

/// Output format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    /// Parse output format from string
    pub fn from_string(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => anyhow::bail!("Unknown output format: {}", s),
        }
    }
}

/// Hit and miss counters of one tracked type
#[derive(Debug, Clone, Serialize)]
pub struct TypeCounters {
    pub cache_type: CacheType,
    pub hits: u64,
    pub misses: u64,
}

/// Everything the `stats` command reports
#[derive(Debug, Clone, Serialize)]
pub struct StatsReport {
    pub snapshot: PathBuf,
    #[serde(flatten)]
    pub stats: CacheStats,
    pub counters: Vec<TypeCounters>,
}

impl StatsReport {
    pub fn new(snapshot: PathBuf, stats: CacheStats, metrics: &CacheMetrics) -> Self {
        let counters = CacheType::TRACKED
            .iter()
            .map(|&cache_type| {
                let HitMiss { hits, misses } =
                    metrics.counters.get(&cache_type).copied().unwrap_or_default();
                TypeCounters {
                    cache_type,
                    hits,
                    misses,
                }
            })
            .collect();
        Self {
            snapshot,
            stats,
            counters,
        }
    }
}

/// Trait for output formatters
pub trait OutputFormatter: Send + Sync {
    /// Format a stats report
    fn format_stats(&self, report: &StatsReport) -> Result<String>;
}

/// Create a formatter based on output format
pub fn create_formatter(format: OutputFormat, use_color: bool) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter::new(use_color)),
        OutputFormat::Json => Box::new(JsonFormatter::new(true)),
    }
}
