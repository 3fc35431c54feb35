//! Inputs and results of the cached operations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Raw CV submitted for analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CvDocument {
    pub file_name: String,
    pub content: String,
}

/// Structured result of analysing a CV
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CvAnalysis {
    pub skills: Vec<String>,
    pub experience: String,
    pub industries: Vec<String>,
    pub salary_range: String,
    pub location: String,
    pub analysis_date: DateTime<Utc>,
    pub confidence: u8,
}

/// The job seeker as the matcher and template system see them
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: Option<String>,
    pub industry: String,
    #[serde(default)]
    pub skills: Vec<String>,
    pub experience: Option<String>,
}

/// Search filters; ordered so equal filters produce equal cache keys
pub type JobFilters = BTreeMap<String, String>;

/// One matched listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobMatch {
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub salary: String,
    /// Match score in percent
    #[serde(rename = "match")]
    pub match_score: u8,
}

/// Listing a cover letter is written for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDetails {
    pub title: String,
    pub company: String,
    /// Category used to share one base template across similar listings
    pub job_type: String,
}

/// Input to template generation
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateRequest {
    pub job: JobDetails,
    pub profile: UserProfile,
}

/// Reusable cover letter with `[PLACEHOLDER]` variables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverLetterTemplate {
    pub template: String,
    pub variables: Vec<String>,
    pub generated_at: DateTime<Utc>,
    pub reusable: bool,
}

/// Cover letter adapted to one listing and candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverLetter {
    pub content: String,
    pub adapted_at: DateTime<Utc>,
    pub based_on: CoverLetterTemplate,
    /// Whether the base template came from the cache
    pub cached: bool,
}
