//! # Sync Run Repository
//!
//! Provides database persistence for sync runs in `content_sync_log`.
//!
//! ## Overview
//!
//! This repository handles:
//! - Recording a new run when a pipeline starts
//! - Persisting the terminal state of a run
//! - Run history retrieval, newest first

use crate::{ProviderKind, Result, SyncError, SyncRun, SyncRunId, SyncRunStatus, SyncTrigger};
use async_trait::async_trait;
use sqlx::{FromRow, SqlitePool};

// ============================================================================
// Repository Trait
// ============================================================================

/// Repository trait for sync run persistence
#[async_trait]
pub trait SyncRunRepository: Send + Sync {
    /// Insert a new sync run
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    async fn insert(&self, run: &SyncRun) -> Result<()>;

    /// Persist the terminal state of an `in_progress` run
    ///
    /// # Errors
    ///
    /// Returns an error if the run doesn't exist, if `run` is not terminal or
    /// the stored row has already finished, or if the database operation fails
    async fn update(&self, run: &SyncRun) -> Result<()>;

    /// Find a sync run by ID
    async fn find_by_id(&self, id: &SyncRunId) -> Result<Option<SyncRun>>;

    /// Most recent runs first, optionally restricted to one provider
    ///
    /// # Arguments
    ///
    /// * `kind` - Provider filter, `None` for all providers
    /// * `limit` - Maximum number of runs to return
    async fn history(&self, kind: Option<ProviderKind>, limit: u32) -> Result<Vec<SyncRun>>;
}

// ============================================================================
// SQLite Implementation
// ============================================================================

/// SQLite implementation of SyncRunRepository
pub struct SqliteSyncRunRepository {
    pool: SqlitePool,
}

impl SqliteSyncRunRepository {
    /// Create a new SQLite sync run repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a sync run
#[derive(Debug, FromRow)]
struct SyncRunRow {
    id: String,
    sync_type: String,
    triggered_by: String,
    status: String,
    items_synced: i64,
    total_fetched: i64,
    error_message: Option<String>,
    started_at: i64,
    completed_at: Option<i64>,
}

impl TryFrom<SyncRunRow> for SyncRun {
    type Error = SyncError;

    fn try_from(row: SyncRunRow) -> Result<Self> {
        let kind: ProviderKind = row
            .sync_type
            .parse()
            .map_err(|_| SyncError::Database(format!("Invalid sync_type: {}", row.sync_type)))?;

        let trigger: SyncTrigger = row.triggered_by.parse()?;
        let status: SyncRunStatus = row.status.parse()?;

        Ok(SyncRun {
            id: SyncRunId::from_string(&row.id)?,
            kind,
            trigger,
            status,
            items_synced: row.items_synced.max(0) as u64,
            total_fetched: row.total_fetched.max(0) as u64,
            error_message: row.error_message,
            started_at: row.started_at,
            completed_at: row.completed_at,
        })
    }
}

const SELECT_COLUMNS: &str = r#"
    SELECT id, sync_type, triggered_by, status, items_synced, total_fetched,
           error_message, started_at, completed_at
    FROM content_sync_log
"#;

#[async_trait]
impl SyncRunRepository for SqliteSyncRunRepository {
    async fn insert(&self, run: &SyncRun) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO content_sync_log (
                id, sync_type, triggered_by, status, items_synced, total_fetched,
                error_message, started_at, completed_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(run.id.as_str())
        .bind(run.kind.as_str())
        .bind(run.trigger.as_str())
        .bind(run.status.as_str())
        .bind(run.items_synced as i64)
        .bind(run.total_fetched as i64)
        .bind(&run.error_message)
        .bind(run.started_at)
        .bind(run.completed_at)
        .execute(&self.pool)
        .await
        .map_err(|e| SyncError::Database(e.to_string()))?;

        Ok(())
    }

    async fn update(&self, run: &SyncRun) -> Result<()> {
        if !run.status.is_terminal() {
            return Err(SyncError::InvalidStateTransition {
                from: SyncRunStatus::InProgress.to_string(),
                to: run.status.to_string(),
                reason: "only a terminal state can be persisted".to_string(),
            });
        }

        let result = sqlx::query(
            r#"
            UPDATE content_sync_log SET
                status = ?,
                items_synced = ?,
                total_fetched = ?,
                error_message = ?,
                completed_at = ?
            WHERE id = ? AND status = 'in_progress'
            "#,
        )
        .bind(run.status.as_str())
        .bind(run.items_synced as i64)
        .bind(run.total_fetched as i64)
        .bind(&run.error_message)
        .bind(run.completed_at)
        .bind(run.id.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| SyncError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return match self.find_by_id(&run.id).await? {
                Some(stored) => Err(SyncError::InvalidStateTransition {
                    from: stored.status.to_string(),
                    to: run.status.to_string(),
                    reason: "run already finished".to_string(),
                }),
                None => Err(SyncError::RunNotFound {
                    run_id: run.id.to_string(),
                }),
            };
        }

        Ok(())
    }

    async fn find_by_id(&self, id: &SyncRunId) -> Result<Option<SyncRun>> {
        let sql = format!("{} WHERE id = ?", SELECT_COLUMNS);
        let row = sqlx::query_as::<_, SyncRunRow>(&sql)
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| SyncError::Database(e.to_string()))?;

        row.map(SyncRun::try_from).transpose()
    }

    async fn history(&self, kind: Option<ProviderKind>, limit: u32) -> Result<Vec<SyncRun>> {
        let sql = format!(
            "{} WHERE (? IS NULL OR sync_type = ?) ORDER BY started_at DESC, rowid DESC LIMIT ?",
            SELECT_COLUMNS
        );
        let kind = kind.map(|k| k.as_str());

        let rows = sqlx::query_as::<_, SyncRunRow>(&sql)
            .bind(kind)
            .bind(kind)
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| SyncError::Database(e.to_string()))?;

        rows.into_iter().map(SyncRun::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_library::db::create_test_pool;

    async fn repo() -> SqliteSyncRunRepository {
        SqliteSyncRunRepository::new(create_test_pool().await.unwrap())
    }

    #[tokio::test]
    async fn test_insert_and_find_by_id() {
        let repo = repo().await;
        let run = SyncRun::begin(ProviderKind::GoogleDrive, SyncTrigger::Manual, 1_000);

        repo.insert(&run).await.unwrap();

        let found = repo.find_by_id(&run.id).await.unwrap().unwrap();
        assert_eq!(found, run);
    }

    #[tokio::test]
    async fn test_update_to_terminal_state() {
        let repo = repo().await;
        let run = SyncRun::begin(ProviderKind::YouTube, SyncTrigger::Scheduled, 1_000);
        repo.insert(&run).await.unwrap();

        let run = run.complete(7, 8, 1_010).unwrap();
        repo.update(&run).await.unwrap();

        let found = repo.find_by_id(&run.id).await.unwrap().unwrap();
        assert_eq!(found.status, SyncRunStatus::Completed);
        assert_eq!(found.items_synced, 7);
        assert_eq!(found.total_fetched, 8);
        assert_eq!(found.completed_at, Some(1_010));
        assert_eq!(found.trigger, SyncTrigger::Scheduled);
    }

    #[tokio::test]
    async fn test_update_missing_run() {
        let repo = repo().await;
        let run = SyncRun::begin(ProviderKind::YouTube, SyncTrigger::Manual, 1)
            .complete(0, 0, 2)
            .unwrap();

        let err = repo.update(&run).await.unwrap_err();
        assert!(matches!(err, SyncError::RunNotFound { .. }));
    }

    #[tokio::test]
    async fn test_history_newest_first_with_filter() {
        let repo = repo().await;
        for (kind, started_at) in [
            (ProviderKind::GoogleDrive, 10),
            (ProviderKind::YouTube, 20),
            (ProviderKind::GoogleDrive, 30),
        ] {
            repo.insert(&SyncRun::begin(kind, SyncTrigger::Manual, started_at))
                .await
                .unwrap();
        }

        let all = repo.history(None, 10).await.unwrap();
        let starts: Vec<_> = all.iter().map(|r| r.started_at).collect();
        assert_eq!(starts, vec![30, 20, 10]);

        let drive = repo
            .history(Some(ProviderKind::GoogleDrive), 1)
            .await
            .unwrap();
        assert_eq!(drive.len(), 1);
        assert_eq!(drive[0].started_at, 30);
    }

    #[tokio::test]
    async fn test_failed_run_persists_error_message() {
        let repo = repo().await;
        let run = SyncRun::begin(ProviderKind::YouTube, SyncTrigger::Manual, 5);
        repo.insert(&run).await.unwrap();

        let run = run.fail("quota exceeded", 6).unwrap();
        repo.update(&run).await.unwrap();

        let found = repo.find_by_id(&run.id).await.unwrap().unwrap();
        assert_eq!(found.status, SyncRunStatus::Failed);
        assert_eq!(found.error_message.as_deref(), Some("quota exceeded"));
    }

    #[tokio::test]
    async fn test_finished_run_is_never_reopened() {
        let repo = repo().await;
        let started = SyncRun::begin(ProviderKind::GoogleDrive, SyncTrigger::Manual, 1);
        repo.insert(&started).await.unwrap();

        let completed = started.clone().complete(2, 2, 5).unwrap();
        repo.update(&completed).await.unwrap();

        let err = repo.update(&started).await.unwrap_err();
        assert!(matches!(err, SyncError::InvalidStateTransition { .. }));

        let err = repo
            .update(&started.fail("late failure", 9).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::InvalidStateTransition { .. }));

        let found = repo.find_by_id(&completed.id).await.unwrap().unwrap();
        assert_eq!(found.status, SyncRunStatus::Completed);
        assert_eq!(found.items_synced, 2);
        assert_eq!(found.completed_at, Some(5));
    }
}
