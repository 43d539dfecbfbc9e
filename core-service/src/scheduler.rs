//! # Sync Scheduler
//!
//! Periodically runs scheduled syncs, one task per configured provider.
//!
//! Each tick runs `sync_scheduled(kind)`; a failing run is logged and the
//! next tick proceeds as normal. The first run happens one full interval
//! after start.

use async_trait::async_trait;
use core_sync::{ProviderKind, SyncCoordinator, SyncSummary};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

/// Something that can run a scheduled sync for a provider.
#[async_trait]
pub trait ScheduledSync: Send + Sync {
    async fn run_scheduled(&self, kind: ProviderKind) -> core_sync::Result<SyncSummary>;
}

#[async_trait]
impl ScheduledSync for SyncCoordinator {
    async fn run_scheduled(&self, kind: ProviderKind) -> core_sync::Result<SyncSummary> {
        self.sync_scheduled(kind).await
    }
}

pub struct SyncScheduler {
    target: Arc<dyn ScheduledSync>,
    schedules: Vec<(ProviderKind, Duration)>,
}

impl SyncScheduler {
    pub fn new(target: Arc<dyn ScheduledSync>) -> Self {
        Self {
            target,
            schedules: Vec::new(),
        }
    }

    /// Run `kind` every `interval`; `None` or a zero interval leaves it off.
    pub fn every(mut self, kind: ProviderKind, interval: Option<Duration>) -> Self {
        if let Some(interval) = interval.filter(|i| !i.is_zero()) {
            self.schedules.retain(|(k, _)| *k != kind);
            self.schedules.push((kind, interval));
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.schedules.is_empty()
    }

    /// Spawn one task per schedule on the current runtime.
    pub fn start(self) -> SchedulerHandle {
        let tasks = self
            .schedules
            .into_iter()
            .map(|(kind, interval)| {
                info!(kind = %kind, interval_secs = interval.as_secs(), "Scheduling sync");
                let target = Arc::clone(&self.target);
                tokio::spawn(run_schedule(target, kind, interval))
            })
            .collect();

        SchedulerHandle { tasks }
    }
}

async fn run_schedule(target: Arc<dyn ScheduledSync>, kind: ProviderKind, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The first tick completes immediately.
    ticker.tick().await;

    loop {
        ticker.tick().await;
        match target.run_scheduled(kind).await {
            Ok(summary) => info!(
                kind = %kind,
                items_synced = summary.items_synced,
                total_fetched = summary.total_fetched,
                "Scheduled sync completed"
            ),
            Err(e) => error!(kind = %kind, error = %e, "Scheduled sync failed"),
        }
    }
}

/// Running schedules; dropping the handle leaves them running.
pub struct SchedulerHandle {
    tasks: Vec<JoinHandle<()>>,
}

impl SchedulerHandle {
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Stop every schedule.
    pub fn shutdown(self) {
        for task in self.tasks {
            task.abort();
        }
    }
}
