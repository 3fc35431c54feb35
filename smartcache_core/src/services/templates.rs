//! Cached cover letter templates, adapted per listing and candidate

use crate::cache_type::CacheType;
use crate::error::Result;
use crate::services::operation::{ExpensiveOperation, cached_compute};
use crate::services::types::{
    CoverLetter, CoverLetterTemplate, JobDetails, TemplateRequest, UserProfile,
};
use crate::smart_cache::SmartCache;
use chrono::Utc;

const FALLBACK_SKILLS: &str = "relevant skills";
const FALLBACK_EXPERIENCE: &str = "professional experience";
const FALLBACK_NAME: &str = "Candidate";

/// Generates one base template per industry and job type and personalises it
pub struct TemplateSystem<O> {
    cache: SmartCache,
    operation: O,
}

impl<O> TemplateSystem<O>
where
    O: ExpensiveOperation<Input = TemplateRequest, Output = CoverLetterTemplate>,
{
    pub fn new(cache: SmartCache, operation: O) -> Self {
        Self { cache, operation }
    }

    /// Cache key shared by every listing of the same industry and job type
    pub fn cache_key(job: &JobDetails, profile: &UserProfile) -> String {
        format!("template_{}_{}", profile.industry, job.job_type)
    }

    pub async fn generate_cover_letter(
        &self,
        job: &JobDetails,
        profile: &UserProfile,
    ) -> Result<CoverLetter> {
        let key = Self::cache_key(job, profile);
        let request = TemplateRequest {
            job: job.clone(),
            profile: profile.clone(),
        };
        let result = cached_compute(
            &self.cache,
            &key,
            CacheType::Template,
            &self.operation,
            &request,
            self.cache.config().operation_timeout(),
        )
        .await?;

        if result.from_cache {
            log::info!("Cover letter template {key} reused - saved R15");
        }
        Ok(adapt_template(result.value, job, profile, result.from_cache))
    }
}

/// Fill a template's placeholders for one listing and candidate
pub fn adapt_template(
    template: CoverLetterTemplate,
    job: &JobDetails,
    profile: &UserProfile,
    cached: bool,
) -> CoverLetter {
    let skills = if profile.skills.is_empty() {
        FALLBACK_SKILLS.to_string()
    } else {
        profile.skills.join(", ")
    };
    let experience = profile.experience.as_deref().unwrap_or(FALLBACK_EXPERIENCE);
    let name = profile.name.as_deref().unwrap_or(FALLBACK_NAME);

    let content = template
        .template
        .replace("[JOB_TITLE]", &job.title)
        .replace("[COMPANY_NAME]", &job.company)
        .replace("[USER_SKILLS]", &skills)
        .replace("[USER_EXPERIENCE]", experience)
        .replace("[USER_NAME]", name);

    CoverLetter {
        content,
        adapted_at: Utc::now(),
        based_on: template,
        cached,
    }
}
