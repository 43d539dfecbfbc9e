//! # Sync Run State Machine
//!
//! Lifecycle of one pipeline invocation, with validated state transitions.
//!
//! ## State Machine
//!
//! ```text
//! InProgress → Completed
//!     ↓
//!   Failed
//! ```
//!
//! A run is created `in_progress`, moves to a terminal state exactly once and
//! is never re-opened.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use core_sync::{ProviderKind, SyncRun, SyncTrigger};
//!
//! let run = SyncRun::begin(ProviderKind::YouTube, SyncTrigger::Manual, now);
//! let run = run.complete(12, 12, later)?;
//! ```

use crate::{Result, SyncError};
use core_library::MediaKind;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// ID Types
// ============================================================================

/// Unique identifier for a sync run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SyncRunId(Uuid);

impl SyncRunId {
    /// Create a new random sync run ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a sync run ID from a string
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self> {
        Ok(Self(
            Uuid::parse_str(s).map_err(|e| SyncError::InvalidRunId(e.to_string()))?,
        ))
    }

    /// Get the string representation of this ID
    pub fn as_str(&self) -> String {
        self.0.to_string()
    }
}

impl Default for SyncRunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SyncRunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for SyncRunId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

// ============================================================================
// Kinds and Triggers
// ============================================================================

/// The external provider a run pulls from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    GoogleDrive,
    #[serde(rename = "youtube")]
    YouTube,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::GoogleDrive => "google_drive",
            ProviderKind::YouTube => "youtube",
        }
    }

    /// The kind of media this provider yields
    pub fn media_kind(&self) -> MediaKind {
        match self {
            ProviderKind::GoogleDrive => MediaKind::Photo,
            ProviderKind::YouTube => MediaKind::Video,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderKind::GoogleDrive => "Google Drive",
            ProviderKind::YouTube => "YouTube",
        }
    }
}

impl FromStr for ProviderKind {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "google_drive" | "google-drive" | "googledrive" => Ok(ProviderKind::GoogleDrive),
            "youtube" => Ok(ProviderKind::YouTube),
            _ => Err(SyncError::InvalidKind(s.to_string())),
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What started a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncTrigger {
    /// Request carrying credentials in its body
    Manual,
    /// Timer or cron call using stored credentials
    Scheduled,
}

impl SyncTrigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncTrigger::Manual => "manual",
            SyncTrigger::Scheduled => "scheduled",
        }
    }
}

impl FromStr for SyncTrigger {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "manual" => Ok(SyncTrigger::Manual),
            "scheduled" => Ok(SyncTrigger::Scheduled),
            _ => Err(SyncError::InvalidTrigger(s.to_string())),
        }
    }
}

// ============================================================================
// Status Types
// ============================================================================

/// The current status of a sync run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncRunStatus {
    InProgress,
    Completed,
    Failed,
}

impl SyncRunStatus {
    /// Check if this status represents a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, SyncRunStatus::Completed | SyncRunStatus::Failed)
    }

    /// Get the string representation for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncRunStatus::InProgress => "in_progress",
            SyncRunStatus::Completed => "completed",
            SyncRunStatus::Failed => "failed",
        }
    }
}

impl FromStr for SyncRunStatus {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "in_progress" => Ok(SyncRunStatus::InProgress),
            "completed" => Ok(SyncRunStatus::Completed),
            "failed" => Ok(SyncRunStatus::Failed),
            _ => Err(SyncError::InvalidStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for SyncRunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Sync Run Entity
// ============================================================================

/// One pipeline invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncRun {
    pub id: SyncRunId,
    pub kind: ProviderKind,
    pub trigger: SyncTrigger,
    pub status: SyncRunStatus,
    /// Items written successfully
    pub items_synced: u64,
    /// Items the provider returned
    pub total_fetched: u64,
    pub error_message: Option<String>,
    pub started_at: i64,
    pub completed_at: Option<i64>,
}

impl SyncRun {
    /// Create a run in the `in_progress` state
    pub fn begin(kind: ProviderKind, trigger: SyncTrigger, started_at: i64) -> Self {
        Self {
            id: SyncRunId::new(),
            kind,
            trigger,
            status: SyncRunStatus::InProgress,
            items_synced: 0,
            total_fetched: 0,
            error_message: None,
            started_at,
            completed_at: None,
        }
    }

    /// Mark the run as completed
    ///
    /// # Errors
    ///
    /// Returns an error if the run is already terminal
    pub fn complete(mut self, items_synced: u64, total_fetched: u64, now: i64) -> Result<Self> {
        self.validate_transition(SyncRunStatus::Completed)?;
        self.status = SyncRunStatus::Completed;
        self.items_synced = items_synced;
        self.total_fetched = total_fetched;
        self.completed_at = Some(now);
        Ok(self)
    }

    /// Mark the run as failed
    ///
    /// # Errors
    ///
    /// Returns an error if the run is already terminal
    pub fn fail(mut self, error_message: impl Into<String>, now: i64) -> Result<Self> {
        self.validate_transition(SyncRunStatus::Failed)?;
        self.status = SyncRunStatus::Failed;
        self.items_synced = 0;
        self.error_message = Some(error_message.into());
        self.completed_at = Some(now);
        Ok(self)
    }

    fn validate_transition(&self, to: SyncRunStatus) -> Result<()> {
        let valid = matches!(
            (self.status, to),
            (SyncRunStatus::InProgress, SyncRunStatus::Completed)
                | (SyncRunStatus::InProgress, SyncRunStatus::Failed)
        );

        if !valid {
            return Err(SyncError::InvalidStateTransition {
                from: self.status.as_str().to_string(),
                to: to.as_str().to_string(),
                reason: format!(
                    "Cannot transition from {} to {}",
                    self.status.as_str(),
                    to.as_str()
                ),
            });
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
