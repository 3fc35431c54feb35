//! Periodic maintenance tasks
//!
//! Four independent repeating tasks run against a [`SmartCache`]: metrics
//! refresh, snapshot flush, expired-entry cleanup and a memory-pressure
//! check. Their relative order is unspecified. All of them stop together
//! on [`MaintenanceScheduler::shutdown`] or when the scheduler is dropped.

use crate::config::MaintenanceConfig;
use crate::smart_cache::SmartCache;
use futures::future::join_all;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};

/// Host signal reporting how much of its memory budget is in use
pub trait MemoryProbe: Send + Sync {
    /// Used fraction in `[0, 1]`, or `None` when the host cannot tell
    fn usage_ratio(&self) -> Option<f64>;
}

/// Probe for hosts without a memory signal
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMemoryProbe;

impl MemoryProbe for NoMemoryProbe {
    fn usage_ratio(&self) -> Option<f64> {
        None
    }
}

/// Owner of the running maintenance tasks
pub struct MaintenanceScheduler {
    shutdown: watch::Sender<bool>,
    handles: Vec<JoinHandle<()>>,
}

impl MaintenanceScheduler {
    /// Spawn every maintenance task on the current tokio runtime
    pub fn start(
        cache: SmartCache,
        config: &MaintenanceConfig,
        probe: Arc<dyn MemoryProbe>,
    ) -> Self {
        let (shutdown, _) = watch::channel(false);
        let mut scheduler = Self {
            shutdown,
            handles: Vec::new(),
        };

        let c = cache.clone();
        scheduler.spawn("metrics", config.metrics_refresh_interval(), move || {
            let cache = c.clone();
            async move {
                cache.refresh_metrics().await;
            }
        });

        let c = cache.clone();
        scheduler.spawn("flush", config.flush_interval(), move || {
            let cache = c.clone();
            async move {
                cache.save_to_persistence().await;
            }
        });

        let c = cache.clone();
        scheduler.spawn("cleanup", config.cleanup_interval(), move || {
            let cache = c.clone();
            async move {
                cache.cleanup_expired_entries().await;
            }
        });

        let threshold = config.memory_pressure_threshold;
        scheduler.spawn("memory", config.memory_check_interval(), move || {
            let cache = cache.clone();
            let probe = probe.clone();
            async move {
                if let Some(ratio) = probe.usage_ratio()
                    && ratio > threshold
                {
                    log::warn!(
                        "High memory usage ({:.0}%) - evicting old cache entries",
                        ratio * 100.0
                    );
                    cache.evict_old_entries().await;
                }
            }
        });

        log::debug!("Started {} maintenance tasks", scheduler.handles.len());
        scheduler
    }

    fn spawn<F, Fut>(&mut self, name: &'static str, period: Duration, mut tick: F)
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let mut shutdown = self.shutdown.subscribe();
        let handle = tokio::spawn(async move {
            // first run one full period after start
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = ticker.tick() => tick().await,
                    _ = shutdown.changed() => break,
                }
            }
            log::debug!("Maintenance task '{name}' stopped");
        });
        self.handles.push(handle);
    }

    /// Number of tasks still running
    pub fn active_tasks(&self) -> usize {
        self.handles.iter().filter(|h| !h.is_finished()).count()
    }

    /// Stop every task and wait for them to finish
    pub async fn shutdown(mut self) {
        // Err only means every task already exited
        let _ = self.shutdown.send(true);
        let handles = std::mem::take(&mut self.handles);
        for result in join_all(handles).await {
            if let Err(e) = result {
                log::warn!("Maintenance task ended abnormally: {e}");
            }
        }
    }
}

impl Drop for MaintenanceScheduler {
    fn drop(&mut self) {
        // Signal tasks to shutdown
        let _ = self.shutdown.send(true);
    }
}
