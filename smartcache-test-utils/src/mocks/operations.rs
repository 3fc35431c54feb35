//! Expensive operations with observable call counts

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use smartcache_core::Result;
use smartcache_core::error::InternalError;
use smartcache_core::services::ExpensiveOperation;
use std::marker::PhantomData;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Operation returning a fixed output after an optional delay
///
/// Clones share the call counter.
pub struct CountingOperation<I, O> {
    output: O,
    delay: Duration,
    calls: Arc<AtomicUsize>,
    _input: PhantomData<fn(&I)>,
}

impl<I, O: Clone> Clone for CountingOperation<I, O> {
    fn clone(&self) -> Self {
        Self {
            output: self.output.clone(),
            delay: self.delay,
            calls: Arc::clone(&self.calls),
            _input: PhantomData,
        }
    }
}

impl<I, O> CountingOperation<I, O> {
    pub fn returning(output: O) -> Self {
        Self {
            output,
            delay: Duration::ZERO,
            calls: Arc::new(AtomicUsize::new(0)),
            _input: PhantomData,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<I, O> ExpensiveOperation for CountingOperation<I, O>
where
    I: Send + Sync + 'static,
    O: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    type Input = I;
    type Output = O;

    fn name(&self) -> &'static str {
        "counting_operation"
    }

    async fn compute(&self, _input: &I) -> Result<O> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(self.output.clone())
    }
}

/// Operation that always fails, as an unreachable inference service would
pub struct FailingOperation<I, O> {
    message: String,
    calls: Arc<AtomicUsize>,
    _types: PhantomData<fn(&I) -> O>,
}

impl<I, O> FailingOperation<I, O> {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
            calls: Arc::new(AtomicUsize::new(0)),
            _types: PhantomData,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<I, O> ExpensiveOperation for FailingOperation<I, O>
where
    I: Send + Sync + 'static,
    O: Serialize + DeserializeOwned + Send + 'static,
{
    type Input = I;
    type Output = O;

    fn name(&self) -> &'static str {
        "failing_operation"
    }

    async fn compute(&self, _input: &I) -> Result<O> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(InternalError::operation_failed(self.name(), self.message.clone()).into())
    }
}
