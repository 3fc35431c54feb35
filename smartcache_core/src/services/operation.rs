//! Expensive operation contract and the shared get-or-compute routine

use crate::cache_type::CacheType;
use crate::error::{InternalError, Result};
use crate::smart_cache::SmartCache;
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// An operation worth caching (AI inference in a real deployment)
///
/// Implementations must not touch the cache; the wrappers own that.
#[async_trait]
pub trait ExpensiveOperation: Send + Sync {
    type Input: Send + Sync;
    type Output: Serialize + DeserializeOwned + Send;

    /// Name used in logs and timeout errors
    fn name(&self) -> &'static str;

    async fn compute(&self, input: &Self::Input) -> Result<Self::Output>;
}

/// A value together with where it came from
#[derive(Debug, Clone, PartialEq)]
pub struct Cached<T> {
    pub value: T,
    pub from_cache: bool,
}

impl<T> Cached<T> {
    pub fn hit(value: T) -> Self {
        Self {
            value,
            from_cache: true,
        }
    }

    pub fn computed(value: T) -> Self {
        Self {
            value,
            from_cache: false,
        }
    }
}

/// Return the cached value for `key`, or compute, store and return it
///
/// The computation is bounded by `timeout`; a timeout is reported as
/// [`InternalError::OperationTimeout`] and nothing is stored. Failing to
/// store the computed value is logged and otherwise ignored.
pub async fn cached_compute<O: ExpensiveOperation>(
    cache: &SmartCache,
    key: &str,
    cache_type: CacheType,
    operation: &O,
    input: &O::Input,
    timeout: Duration,
) -> Result<Cached<O::Output>> {
    if let Some(value) = cache.get_as::<O::Output>(key, cache_type).await {
        log::debug!("{} result for '{key}' served from cache", operation.name());
        return Ok(Cached::hit(value));
    }

    log::debug!("Running {} for '{key}' - this costs credits", operation.name());
    let value = tokio::time::timeout(timeout, operation.compute(input))
        .await
        .map_err(|_| InternalError::operation_timeout(operation.name(), timeout))??;

    match cache.set_value(key, &value, cache_type).await {
        Ok(outcome) if !outcome.is_stored() => {
            log::debug!("{} result for '{key}' was not cached: {outcome:?}", operation.name());
        }
        Ok(_) => {}
        Err(e) => log::warn!("Could not cache {} result for '{key}': {e}", operation.name()),
    }

    Ok(Cached::computed(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CacheConfig;
    use crate::error::Error;
    use crate::persistence::NoOpStore;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Doubler {
        calls: AtomicUsize,
        delay: Duration,
    }

    #[async_trait]
    impl ExpensiveOperation for Doubler {
        type Input = u32;
        type Output = u32;

        fn name(&self) -> &'static str {
            "doubler"
        }

        async fn compute(&self, input: &u32) -> Result<u32> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            Ok(input * 2)
        }
    }

    async fn cache() -> SmartCache {
        SmartCache::open(CacheConfig::test(), Arc::new(NoOpStore))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_second_call_is_served_from_cache() {
        let cache = cache().await;
        let op = Doubler {
            calls: AtomicUsize::new(0),
            delay: Duration::ZERO,
        };

        let first = cached_compute(&cache, "n", CacheType::Job, &op, &21, Duration::from_secs(1))
            .await
            .unwrap();
        let second = cached_compute(&cache, "n", CacheType::Job, &op, &21, Duration::from_secs(1))
            .await
            .unwrap();

        assert_eq!(first, Cached::computed(42));
        assert_eq!(second, Cached::hit(42));
        assert_eq!(op.calls.load(Ordering::SeqCst), 1);
        let metrics = cache.metrics().await;
        assert_eq!(metrics.hits(CacheType::Job), 1);
        assert_eq!(metrics.misses(CacheType::Job), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_not_cached() {
        let cache = cache().await;
        let op = Doubler {
            calls: AtomicUsize::new(0),
            delay: Duration::from_secs(10),
        };

        let err = cached_compute(&cache, "slow", CacheType::Cv, &op, &1, Duration::from_secs(2))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Internal(InternalError::OperationTimeout { .. })
        ));
        assert_eq!(cache.stats().await.total_entries, 0);
    }
}
