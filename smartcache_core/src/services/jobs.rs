//! Cached semantic job matching

use crate::cache_type::CacheType;
use crate::error::Result;
use crate::services::operation::{Cached, ExpensiveOperation, cached_compute};
use crate::services::types::{JobFilters, JobMatch, UserProfile};
use crate::smart_cache::SmartCache;
use serde_json::json;

/// Finds matching listings for a profile and filter set
///
/// Results are stored under [`CacheType::Semantic`] by default, which the
/// metrics do not tally. Use [`JobMatcher::with_cache_type`] to count them as
/// job lookups instead.
pub struct JobMatcher<O> {
    cache: SmartCache,
    operation: O,
    cache_type: CacheType,
}

impl<O> JobMatcher<O>
where
    O: ExpensiveOperation<Input = (UserProfile, JobFilters), Output = Vec<JobMatch>>,
{
    pub fn new(cache: SmartCache, operation: O) -> Self {
        Self {
            cache,
            operation,
            cache_type: CacheType::Semantic,
        }
    }

    pub fn with_cache_type(mut self, cache_type: CacheType) -> Self {
        self.cache_type = cache_type;
        self
    }

    pub fn cache_type(&self) -> CacheType {
        self.cache_type
    }

    /// Cache key covering the profile identity and every filter
    pub fn cache_key(profile: &UserProfile, filters: &JobFilters) -> String {
        let identity = json!({ "userProfile": profile.id, "filters": filters });
        format!("matches_{identity}")
    }

    pub async fn find_matches(
        &self,
        profile: &UserProfile,
        filters: &JobFilters,
    ) -> Result<Cached<Vec<JobMatch>>> {
        let key = Self::cache_key(profile, filters);
        let input = (profile.clone(), filters.clone());
        let result = cached_compute(
            &self.cache,
            &key,
            self.cache_type,
            &self.operation,
            &input,
            self.cache.config().operation_timeout(),
        )
        .await?;

        if result.from_cache {
            log::info!("Job matches for {} loaded from cache", profile.id);
        }
        Ok(result)
    }
}
