//! Stand-in operations that sleep and return canned results
//!
//! They model the latency of an inference call so the cache's effect is
//! observable. A real deployment swaps them for clients of an inference
//! service implementing [`ExpensiveOperation`].

use crate::error::Result;
use crate::services::operation::ExpensiveOperation;
use crate::services::types::{
    CoverLetterTemplate, CvAnalysis, CvDocument, JobFilters, JobMatch, TemplateRequest, UserProfile,
};
use async_trait::async_trait;
use chrono::Utc;
use std::time::Duration;

/// Placeholders every generated template carries
pub const TEMPLATE_VARIABLES: [&str; 8] = [
    "JOB_TITLE",
    "COMPANY_NAME",
    "USER_SKILLS",
    "USER_EXPERIENCE",
    "CUSTOM_PARAGRAPH",
    "COMPANY_REASON",
    "RELEVANT_SKILLS",
    "USER_NAME",
];

const COVER_LETTER_TEMPLATE: &str = "Dear Hiring Manager,

I am writing to express my strong interest in the [JOB_TITLE] position at [COMPANY_NAME]. With my background in [USER_SKILLS] and experience in [USER_EXPERIENCE], I am confident I would be a valuable addition to your team.

[CUSTOM_PARAGRAPH]

I am particularly drawn to [COMPANY_NAME] because of [COMPANY_REASON]. I believe my skills in [RELEVANT_SKILLS] align perfectly with your requirements.

Thank you for considering my application. I look forward to discussing how I can contribute to your team's success.

Best regards,
[USER_NAME]";

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Simulated CV analysis
#[derive(Debug, Clone)]
pub struct SimulatedCvAnalysis {
    latency: Duration,
}

impl SimulatedCvAnalysis {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

impl Default for SimulatedCvAnalysis {
    fn default() -> Self {
        Self::new(Duration::from_millis(1000))
    }
}

#[async_trait]
impl ExpensiveOperation for SimulatedCvAnalysis {
    type Input = CvDocument;
    type Output = CvAnalysis;

    fn name(&self) -> &'static str {
        "cv_analysis"
    }

    async fn compute(&self, _input: &CvDocument) -> Result<CvAnalysis> {
        tokio::time::sleep(self.latency).await;
        Ok(CvAnalysis {
            skills: strings(&["JavaScript", "Python", "React", "Node.js"]),
            experience: "Mid-level".to_string(),
            industries: strings(&["Technology", "Fintech"]),
            salary_range: "40k-60k".to_string(),
            location: "Cape Town".to_string(),
            analysis_date: Utc::now(),
            confidence: 95,
        })
    }
}

/// Simulated job matching
#[derive(Debug, Clone)]
pub struct SimulatedJobMatching {
    latency: Duration,
}

impl SimulatedJobMatching {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

impl Default for SimulatedJobMatching {
    fn default() -> Self {
        Self::new(Duration::from_millis(800))
    }
}

#[async_trait]
impl ExpensiveOperation for SimulatedJobMatching {
    type Input = (UserProfile, JobFilters);
    type Output = Vec<JobMatch>;

    fn name(&self) -> &'static str {
        "job_matching"
    }

    async fn compute(&self, _input: &(UserProfile, JobFilters)) -> Result<Vec<JobMatch>> {
        tokio::time::sleep(self.latency).await;
        Ok(vec![
            JobMatch {
                id: "job_1".to_string(),
                title: "Senior Software Developer".to_string(),
                company: "TechCorp SA".to_string(),
                location: "Cape Town".to_string(),
                salary: "R45,000 - R65,000".to_string(),
                match_score: 95,
            },
            JobMatch {
                id: "job_2".to_string(),
                title: "Digital Marketing Manager".to_string(),
                company: "Marketing Plus".to_string(),
                location: "Johannesburg".to_string(),
                salary: "R35,000 - R50,000".to_string(),
                match_score: 88,
            },
        ])
    }
}

/// Simulated cover letter template generation
#[derive(Debug, Clone)]
pub struct SimulatedTemplateGeneration {
    latency: Duration,
}

impl SimulatedTemplateGeneration {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

impl Default for SimulatedTemplateGeneration {
    fn default() -> Self {
        Self::new(Duration::from_millis(1200))
    }
}

#[async_trait]
impl ExpensiveOperation for SimulatedTemplateGeneration {
    type Input = TemplateRequest;
    type Output = CoverLetterTemplate;

    fn name(&self) -> &'static str {
        "template_generation"
    }

    async fn compute(&self, _input: &TemplateRequest) -> Result<CoverLetterTemplate> {
        tokio::time::sleep(self.latency).await;
        Ok(CoverLetterTemplate {
            template: COVER_LETTER_TEMPLATE.to_string(),
            variables: strings(&TEMPLATE_VARIABLES),
            generated_at: Utc::now(),
            reusable: true,
        })
    }
}
