//! # Content Sync Module
//!
//! Mirrors provider listings into the local media tables.
//!
//! ## Overview
//!
//! Control flow for one invocation:
//!
//! ```text
//! trigger → credentials → SyncLog::begin → provider fetch
//!         → Reconciler (diff + upserts) → SyncLog::complete/fail → SyncSummary
//! ```
//!
//! ## Components
//!
//! - **Sync Run State Machine** (`run`): `in_progress → completed | failed`
//! - **Repository** (`repository`): persistence for `content_sync_log`
//! - **Sync Log** (`sync_log`): best-effort lifecycle recording around a run
//! - **Normalization** (`normalize`): provider records to media drafts
//! - **Reconciler** (`reconciler`): insert vs. update by external id
//! - **Sync Coordinator** (`coordinator`): validation, fetch, reconcile

pub mod coordinator;
pub mod error;
pub mod normalize;
pub mod reconciler;
pub mod repository;
pub mod run;
pub mod sync_log;

pub use coordinator::{SyncCoordinator, SyncRequest};
pub use error::{Result, SyncError};
pub use normalize::ProviderRawItem;
pub use reconciler::{Reconciler, SyncSummary};
pub use repository::{SqliteSyncRunRepository, SyncRunRepository};
pub use run::{ProviderKind, SyncRun, SyncRunId, SyncRunStatus, SyncTrigger};
pub use sync_log::{RunHandle, SyncLog};
