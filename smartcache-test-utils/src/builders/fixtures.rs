//! Domain fixtures

use smartcache_core::services::{CvDocument, JobDetails, JobFilters, UserProfile};

pub fn cv_document() -> CvDocument {
    CvDocument {
        file_name: "cv.pdf".to_string(),
        content: "Software developer, Cape Town. Rust, TypeScript, PostgreSQL.".to_string(),
    }
}

pub fn user_profile(id: &str) -> UserProfile {
    UserProfile {
        id: id.to_string(),
        name: Some("Test Candidate".to_string()),
        industry: "technology".to_string(),
        skills: vec!["Rust".to_string(), "TypeScript".to_string()],
        experience: Some("6 years".to_string()),
    }
}

pub fn job(title: &str, company: &str, job_type: &str) -> JobDetails {
    JobDetails {
        title: title.to_string(),
        company: company.to_string(),
        job_type: job_type.to_string(),
    }
}

pub fn filters(pairs: &[(&str, &str)]) -> JobFilters {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
