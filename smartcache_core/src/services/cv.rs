//! Cached CV analysis

use crate::cache_type::CacheType;
use crate::error::Result;
use crate::services::operation::{Cached, ExpensiveOperation, cached_compute};
use crate::services::types::{CvAnalysis, CvDocument};
use crate::smart_cache::SmartCache;

/// Analyses a user's CV once and serves the result from the cache afterwards
pub struct CvProcessor<O> {
    cache: SmartCache,
    operation: O,
}

impl<O> CvProcessor<O>
where
    O: ExpensiveOperation<Input = CvDocument, Output = CvAnalysis>,
{
    pub fn new(cache: SmartCache, operation: O) -> Self {
        Self { cache, operation }
    }

    /// Cache key for a user's analysis
    pub fn cache_key(user_id: &str) -> String {
        format!("cv_{user_id}")
    }

    /// Analysis for `user_id`, computed at most once per retention period
    pub async fn process_cv(&self, cv: &CvDocument, user_id: &str) -> Result<Cached<CvAnalysis>> {
        let key = Self::cache_key(user_id);
        let result = cached_compute(
            &self.cache,
            &key,
            CacheType::Cv,
            &self.operation,
            cv,
            self.cache.config().operation_timeout(),
        )
        .await?;

        if result.from_cache {
            log::info!("CV analysis for {user_id} loaded from cache - saved R50");
        }
        Ok(result)
    }
}
