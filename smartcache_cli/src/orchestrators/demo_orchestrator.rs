//! Demo command orchestrator
//!
//! Runs the CV, job matching and cover letter wrappers twice against
//! simulated operations so the first pass misses and the second hits.

use anyhow::{Context, Result};
use log::debug;
use smartcache_core::services::{
    CvDocument, CvProcessor, JobDetails, JobFilters, JobMatcher, SimulatedCvAnalysis,
    SimulatedJobMatching, SimulatedTemplateGeneration, TemplateSystem, UserProfile,
};
use smartcache_core::{MaintenanceScheduler, NoMemoryProbe, SmartCache};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Demo command options
#[derive(Debug, Clone)]
pub struct DemoOptions {
    /// Simulated latency of each expensive operation
    pub latency: Duration,
    /// Passes over the three operations
    pub rounds: usize,
}

impl Default for DemoOptions {
    fn default() -> Self {
        Self {
            latency: Duration::from_millis(300),
            rounds: 2,
        }
    }
}

/// One wrapper call as observed by the demo
#[derive(Debug, Clone)]
pub struct DemoStep {
    pub round: usize,
    pub operation: &'static str,
    pub from_cache: bool,
    pub elapsed: Duration,
}

/// Orchestrator for the demo command
pub struct DemoOrchestrator {
    cache: SmartCache,
    options: DemoOptions,
}

impl DemoOrchestrator {
    pub fn new(cache: SmartCache, options: DemoOptions) -> Self {
        Self { cache, options }
    }

    /// Run every round, with the maintenance tasks active for the duration
    pub async fn run(&self) -> Result<Vec<DemoStep>> {
        let scheduler = MaintenanceScheduler::start(
            self.cache.clone(),
            &self.cache.config().maintenance,
            Arc::new(NoMemoryProbe),
        );

        let result = self.run_rounds().await;
        scheduler.shutdown().await;
        result
    }

    async fn run_rounds(&self) -> Result<Vec<DemoStep>> {
        let latency = self.options.latency;
        let cv_processor = CvProcessor::new(self.cache.clone(), SimulatedCvAnalysis::new(latency));
        let job_matcher = JobMatcher::new(self.cache.clone(), SimulatedJobMatching::new(latency));
        let templates =
            TemplateSystem::new(self.cache.clone(), SimulatedTemplateGeneration::new(latency));

        let (cv, profile, filters, job) = sample_inputs();
        let mut steps = Vec::with_capacity(self.options.rounds * 3);

        for round in 1..=self.options.rounds {
            debug!("Demo round {round}");

            let start = Instant::now();
            let analysis = cv_processor
                .process_cv(&cv, &profile.id)
                .await
                .context("CV analysis failed")?;
            steps.push(DemoStep {
                round,
                operation: "cv analysis",
                from_cache: analysis.from_cache,
                elapsed: start.elapsed(),
            });

            let start = Instant::now();
            let matches = job_matcher
                .find_matches(&profile, &filters)
                .await
                .context("Job matching failed")?;
            steps.push(DemoStep {
                round,
                operation: "job matching",
                from_cache: matches.from_cache,
                elapsed: start.elapsed(),
            });

            let start = Instant::now();
            let letter = templates
                .generate_cover_letter(&job, &profile)
                .await
                .context("Cover letter generation failed")?;
            steps.push(DemoStep {
                round,
                operation: "cover letter",
                from_cache: letter.cached,
                elapsed: start.elapsed(),
            });
        }

        Ok(steps)
    }
}

fn sample_inputs() -> (CvDocument, UserProfile, JobFilters, JobDetails) {
    let cv = CvDocument {
        file_name: "demo-cv.pdf".to_string(),
        content: "Full-stack developer with React and Node.js experience".to_string(),
    };
    let profile = UserProfile {
        id: "demo-user".to_string(),
        name: Some("Demo User".to_string()),
        industry: "technology".to_string(),
        skills: vec!["React".to_string(), "Node.js".to_string()],
        experience: Some("4 years".to_string()),
    };
    let filters = JobFilters::from([
        ("location".to_string(), "Cape Town".to_string()),
        ("remote".to_string(), "true".to_string()),
    ]);
    let job = JobDetails {
        title: "Senior Software Developer".to_string(),
        company: "TechCorp SA".to_string(),
        job_type: "fulltime".to_string(),
    };
    (cv, profile, filters, job)
}

#[cfg(test)]
mod tests {
    use super::*;
    use smartcache_core::{CacheConfig, NoOpStore};

    #[tokio::test]
    async fn test_second_round_is_served_from_cache() {
        let cache = SmartCache::open(
            CacheConfig::default().with_max_size_bytes(100_000),
            Arc::new(NoOpStore),
        )
        .await
        .unwrap();
        let demo = DemoOrchestrator::new(
            cache.clone(),
            DemoOptions {
                latency: Duration::ZERO,
                rounds: 2,
            },
        );

        let steps = demo.run().await.unwrap();

        assert_eq!(steps.len(), 6);
        assert!(steps[..3].iter().all(|s| !s.from_cache));
        assert!(steps[3..].iter().all(|s| s.from_cache));
        // cv and template hits are tallied; job matching is semantic
        assert_eq!(cache.stats().await.total_savings, 65);
    }
}
