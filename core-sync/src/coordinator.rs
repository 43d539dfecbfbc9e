//! # Sync Coordinator
//!
//! Runs one pipeline invocation end to end.
//!
//! ## Workflow
//!
//! 1. Validate the request (rejected before any network call)
//! 2. Record the run start in the [`SyncLog`]
//! 3. Fetch the provider listing
//! 4. Reconcile the listing into the media tables
//! 5. Record the terminal state and return the [`SyncSummary`]
//!
//! A fetch failure marks the run `failed` and reaches the caller. Once the
//! listing is in hand, per-item write failures are swallowed and the run
//! always completes.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use core_sync::{SyncCoordinator, SyncRequest, SyncTrigger};
//!
//! let request = SyncRequest::google_drive("api-key", "folder-id");
//! let summary = coordinator.sync(request, SyncTrigger::Manual).await?;
//! println!("{} of {} items synced", summary.items_synced, summary.total_fetched);
//! ```

use crate::normalize::ProviderRawItem;
use crate::reconciler::{Reconciler, SyncSummary};
use crate::repository::SyncRunRepository;
use crate::sync_log::SyncLog;
use crate::{ProviderKind, Result, SyncError, SyncRun, SyncTrigger};
use bridge_traits::storage::{CredentialKey, CredentialStore};
use bridge_traits::time::Clock;
use bridge_traits::{ImageSource, VideoScope, VideoSource};
use core_library::MediaRepository;
use std::sync::Arc;
use tracing::{error, info, instrument};

/// Credentials and scope for one run.
#[derive(Clone, PartialEq, Eq)]
pub enum SyncRequest {
    GoogleDrive {
        api_key: String,
        folder_id: String,
    },
    YouTube {
        api_key: String,
        channel_id: Option<String>,
        playlist_id: Option<String>,
    },
}

impl std::fmt::Debug for SyncRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncRequest::GoogleDrive { folder_id, .. } => f
                .debug_struct("GoogleDrive")
                .field("api_key", &"<redacted>")
                .field("folder_id", folder_id)
                .finish(),
            SyncRequest::YouTube {
                channel_id,
                playlist_id,
                ..
            } => f
                .debug_struct("YouTube")
                .field("api_key", &"<redacted>")
                .field("channel_id", channel_id)
                .field("playlist_id", playlist_id)
                .finish(),
        }
    }
}

/// A request that passed validation.
enum ValidatedRequest<'a> {
    GoogleDrive { api_key: &'a str, folder_id: &'a str },
    YouTube { api_key: &'a str, scope: VideoScope },
}

impl SyncRequest {
    pub fn google_drive(api_key: impl Into<String>, folder_id: impl Into<String>) -> Self {
        SyncRequest::GoogleDrive {
            api_key: api_key.into(),
            folder_id: folder_id.into(),
        }
    }

    pub fn youtube(
        api_key: impl Into<String>,
        channel_id: Option<String>,
        playlist_id: Option<String>,
    ) -> Self {
        SyncRequest::YouTube {
            api_key: api_key.into(),
            channel_id,
            playlist_id,
        }
    }

    pub fn kind(&self) -> ProviderKind {
        match self {
            SyncRequest::GoogleDrive { .. } => ProviderKind::GoogleDrive,
            SyncRequest::YouTube { .. } => ProviderKind::YouTube,
        }
    }

    /// Check required fields.
    ///
    /// # Errors
    ///
    /// `InvalidInput` naming the first missing field (`apiKey`, `folderId`
    /// or `channelId`).
    pub fn validate(&self) -> Result<()> {
        self.validated().map(|_| ())
    }

    fn validated(&self) -> Result<ValidatedRequest<'_>> {
        match self {
            SyncRequest::GoogleDrive { api_key, folder_id } => {
                let api_key = required(api_key, "apiKey", "Google Drive API key is required")?;
                let folder_id =
                    required(folder_id, "folderId", "Google Drive folder ID is required")?;
                Ok(ValidatedRequest::GoogleDrive { api_key, folder_id })
            }
            SyncRequest::YouTube {
                api_key,
                channel_id,
                playlist_id,
            } => {
                let api_key = required(api_key, "apiKey", "YouTube API key is required")?;
                let scope = VideoScope::from_ids(channel_id.as_deref(), playlist_id.as_deref())
                    .ok_or_else(|| {
                        SyncError::invalid_input(
                            "channelId",
                            "Either channel ID or playlist ID is required",
                        )
                    })?;
                Ok(ValidatedRequest::YouTube { api_key, scope })
            }
        }
    }
}

fn required<'a>(value: &'a str, field: &str, message: &str) -> Result<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        Err(SyncError::invalid_input(field, message))
    } else {
        Ok(value)
    }
}

/// Sync coordinator for both providers
pub struct SyncCoordinator {
    images: Arc<dyn ImageSource>,
    videos: Arc<dyn VideoSource>,
    credentials: Arc<dyn CredentialStore>,
    runs: Arc<dyn SyncRunRepository>,
    reconciler: Reconciler,
    sync_log: SyncLog,
}

impl SyncCoordinator {
    pub fn new(
        images: Arc<dyn ImageSource>,
        videos: Arc<dyn VideoSource>,
        credentials: Arc<dyn CredentialStore>,
        media: Arc<dyn MediaRepository>,
        runs: Arc<dyn SyncRunRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            images,
            videos,
            credentials,
            reconciler: Reconciler::new(media, clock.clone()),
            sync_log: SyncLog::new(runs.clone(), clock),
            runs,
        }
    }

    /// Run the pipeline with explicit credentials.
    #[instrument(skip_all, fields(kind = %request.kind(), trigger = trigger.as_str()))]
    pub async fn sync(&self, request: SyncRequest, trigger: SyncTrigger) -> Result<SyncSummary> {
        let kind = request.kind();
        let validated = request.validated()?;

        let handle = self.sync_log.begin(kind, trigger).await;

        let fetched = match self.fetch(&validated).await {
            Ok(items) => items,
            Err(e) => {
                let message = e.to_string();
                error!(kind = %kind, error = %message, "{} fetch failed", kind.display_name());
                self.sync_log.fail(handle, &message).await;
                return Err(e);
            }
        };

        let summary = self.reconciler.reconcile(kind.media_kind(), fetched).await;

        self.sync_log
            .complete(handle, summary.items_synced, summary.total_fetched)
            .await;

        info!(
            kind = %kind,
            items_synced = summary.items_synced,
            total_fetched = summary.total_fetched,
            "{} sync completed",
            kind.display_name()
        );

        Ok(summary)
    }

    /// Run the pipeline with credentials from the credential store.
    ///
    /// # Errors
    ///
    /// `Configuration` when a required credential was never saved.
    #[instrument(skip_all, fields(kind = %kind))]
    pub async fn sync_scheduled(&self, kind: ProviderKind) -> Result<SyncSummary> {
        let request = self.load_request(kind).await?;
        self.sync(request, SyncTrigger::Scheduled).await
    }

    /// Most recent runs, newest first.
    pub async fn history(&self, kind: Option<ProviderKind>, limit: u32) -> Result<Vec<SyncRun>> {
        self.runs.history(kind, limit).await
    }

    async fn fetch(&self, request: &ValidatedRequest<'_>) -> Result<Vec<ProviderRawItem>> {
        let items = match request {
            ValidatedRequest::GoogleDrive { api_key, folder_id } => self
                .images
                .list_images(api_key, folder_id)
                .await
                .map_err(provider_error)?
                .into_iter()
                .map(ProviderRawItem::Photo)
                .collect(),
            ValidatedRequest::YouTube { api_key, scope } => self
                .videos
                .list_videos(api_key, scope)
                .await
                .map_err(provider_error)?
                .into_iter()
                .map(ProviderRawItem::Video)
                .collect(),
        };

        Ok(items)
    }

    async fn load_request(&self, kind: ProviderKind) -> Result<SyncRequest> {
        match kind {
            ProviderKind::GoogleDrive => {
                let api_key = self
                    .credential(CredentialKey::GoogleDriveApiKey)
                    .await?
                    .ok_or_else(|| {
                        SyncError::Configuration("Google Drive API key not configured".to_string())
                    })?;
                let folder_id = self
                    .credential(CredentialKey::GoogleDriveFolderId)
                    .await?
                    .ok_or_else(|| {
                        SyncError::Configuration(
                            "Google Drive folder ID not configured".to_string(),
                        )
                    })?;
                Ok(SyncRequest::google_drive(api_key, folder_id))
            }
            ProviderKind::YouTube => {
                let api_key = self
                    .credential(CredentialKey::YoutubeApiKey)
                    .await?
                    .ok_or_else(|| {
                        SyncError::Configuration("YouTube API key not configured".to_string())
                    })?;
                let channel_id = self.credential(CredentialKey::YoutubeChannelId).await?;
                let playlist_id = self.credential(CredentialKey::YoutubePlaylistId).await?;
                if channel_id.is_none() && playlist_id.is_none() {
                    return Err(SyncError::Configuration(
                        "YouTube channel ID or playlist ID not configured".to_string(),
                    ));
                }
                Ok(SyncRequest::youtube(api_key, channel_id, playlist_id))
            }
        }
    }

    /// A stored credential, with blank values treated as absent.
    async fn credential(&self, key: CredentialKey) -> Result<Option<String>> {
        let value = self.credentials.get_credential(key).await?;
        Ok(value.filter(|v| !v.trim().is_empty()))
    }
}

/// Fetch failures always surface as provider errors, whatever the bridge
/// classified them as.
fn provider_error(err: bridge_traits::BridgeError) -> SyncError {
    match SyncError::from(err) {
        e @ SyncError::Provider(_) => e,
        other => SyncError::Provider(other.to_string()),
    }
}
