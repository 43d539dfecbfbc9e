//! # Sync Log
//!
//! Side-channel record of each run's lifecycle.
//!
//! Persistence failures here are logged and swallowed: a run whose `begin`
//! could not be written proceeds without a log handle, and a failed terminal
//! write never changes the outcome reported to the caller.

use crate::{ProviderKind, SyncRun, SyncRunRepository, SyncTrigger};
use bridge_traits::time::Clock;
use std::sync::Arc;
use tracing::{debug, warn};

/// Handle to the run being recorded, if `begin` succeeded
pub type RunHandle = Option<SyncRun>;

pub struct SyncLog {
    repository: Arc<dyn SyncRunRepository>,
    clock: Arc<dyn Clock>,
}

impl SyncLog {
    pub fn new(repository: Arc<dyn SyncRunRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// Record a new `in_progress` run.
    pub async fn begin(&self, kind: ProviderKind, trigger: SyncTrigger) -> RunHandle {
        let run = SyncRun::begin(kind, trigger, self.clock.unix_timestamp());

        match self.repository.insert(&run).await {
            Ok(()) => {
                debug!(run_id = %run.id, kind = %kind, trigger = trigger.as_str(), "Sync run started");
                Some(run)
            }
            Err(e) => {
                warn!(kind = %kind, error = %e, "Failed to record sync run start");
                None
            }
        }
    }

    /// Move the run to `completed`.
    pub async fn complete(&self, handle: RunHandle, items_synced: u64, total_fetched: u64) -> RunHandle {
        let run = handle?;
        let run_id = run.id;

        match run.complete(items_synced, total_fetched, self.clock.unix_timestamp()) {
            Ok(run) => self.persist(run).await,
            Err(e) => {
                warn!(run_id = %run_id, error = %e, "Rejected sync run completion");
                None
            }
        }
    }

    /// Move the run to `failed`.
    pub async fn fail(&self, handle: RunHandle, error_message: &str) -> RunHandle {
        let run = handle?;
        let run_id = run.id;

        match run.fail(error_message, self.clock.unix_timestamp()) {
            Ok(run) => self.persist(run).await,
            Err(e) => {
                warn!(run_id = %run_id, error = %e, "Rejected sync run failure");
                None
            }
        }
    }

    async fn persist(&self, run: SyncRun) -> RunHandle {
        match self.repository.update(&run).await {
            Ok(()) => {
                debug!(run_id = %run.id, status = %run.status, "Sync run finished");
                Some(run)
            }
            Err(e) => {
                warn!(run_id = %run.id, error = %e, "Failed to record sync run outcome");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Result, SyncError, SyncRunId, SyncRunStatus};
    use async_trait::async_trait;
    use bridge_traits::time::FixedClock;
    use mockall::mock;

    mock! {
        RunRepo {}

        #[async_trait]
        impl SyncRunRepository for RunRepo {
            async fn insert(&self, run: &SyncRun) -> Result<()>;
            async fn update(&self, run: &SyncRun) -> Result<()>;
            async fn find_by_id(&self, id: &SyncRunId) -> Result<Option<SyncRun>>;
            async fn history(&self, kind: Option<ProviderKind>, limit: u32) -> Result<Vec<SyncRun>>;
        }
    }

    fn log(repo: MockRunRepo) -> SyncLog {
        SyncLog::new(Arc::new(repo), Arc::new(FixedClock::at_timestamp(500)))
    }

    #[tokio::test]
    async fn test_begin_and_complete() {
        let mut repo = MockRunRepo::new();
        repo.expect_insert()
            .times(1)
            .withf(|run| run.status == SyncRunStatus::InProgress && run.started_at == 500)
            .returning(|_| Ok(()));
        repo.expect_update()
            .times(1)
            .withf(|run| run.status == SyncRunStatus::Completed && run.items_synced == 3)
            .returning(|_| Ok(()));

        let log = log(repo);
        let handle = log.begin(ProviderKind::GoogleDrive, SyncTrigger::Manual).await;
        assert!(handle.is_some());

        let finished = log.complete(handle, 3, 4).await.unwrap();
        assert_eq!(finished.total_fetched, 4);
        assert_eq!(finished.completed_at, Some(500));
    }

    #[tokio::test]
    async fn test_begin_failure_yields_no_handle() {
        let mut repo = MockRunRepo::new();
        repo.expect_insert()
            .times(1)
            .returning(|_| Err(SyncError::Database("disk full".to_string())));
        repo.expect_update().times(0);

        let log = log(repo);
        let handle = log.begin(ProviderKind::YouTube, SyncTrigger::Scheduled).await;
        assert!(handle.is_none());

        assert!(log.complete(handle, 1, 1).await.is_none());
    }

    #[tokio::test]
    async fn test_fail_update_error_is_swallowed() {
        let mut repo = MockRunRepo::new();
        repo.expect_insert().returning(|_| Ok(()));
        repo.expect_update()
            .times(1)
            .withf(|run| run.error_message.as_deref() == Some("HTTP 500"))
            .returning(|_| Err(SyncError::Database("locked".to_string())));

        let log = log(repo);
        let handle = log.begin(ProviderKind::YouTube, SyncTrigger::Manual).await;
        assert!(log.fail(handle, "HTTP 500").await.is_none());
    }
}
