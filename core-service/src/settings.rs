//! # Settings Save
//!
//! Persists provider credentials submitted by the admin form.
//!
//! Empty or whitespace-only fields are skipped; each remaining field is
//! upserted by key through the [`CredentialStore`].

use crate::{CoreError, Result};
use bridge_traits::storage::{CredentialKey, CredentialStore};
use core_runtime::logging::redact_if_sensitive;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Credential fields as submitted; every field is optional.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPayload {
    #[serde(default)]
    pub google_drive_api_key: Option<String>,
    #[serde(default)]
    pub google_drive_folder_id: Option<String>,
    #[serde(default)]
    pub youtube_api_key: Option<String>,
    #[serde(default)]
    pub youtube_channel_id: Option<String>,
    #[serde(default)]
    pub youtube_playlist_id: Option<String>,
}

impl std::fmt::Debug for SettingsPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let keys: Vec<&str> = self.entries().iter().map(|(k, _)| k.as_str()).collect();
        f.debug_struct("SettingsPayload").field("keys", &keys).finish()
    }
}

impl SettingsPayload {
    /// Non-empty fields paired with their storage key, trimmed.
    pub fn entries(&self) -> Vec<(CredentialKey, &str)> {
        [
            (CredentialKey::GoogleDriveApiKey, &self.google_drive_api_key),
            (CredentialKey::GoogleDriveFolderId, &self.google_drive_folder_id),
            (CredentialKey::YoutubeApiKey, &self.youtube_api_key),
            (CredentialKey::YoutubeChannelId, &self.youtube_channel_id),
            (CredentialKey::YoutubePlaylistId, &self.youtube_playlist_id),
        ]
        .into_iter()
        .filter_map(|(key, value)| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(|v| (key, v))
        })
        .collect()
    }
}

/// Result of a settings save
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsSaved {
    pub settings_count: usize,
}

pub struct SettingsService {
    store: Arc<dyn CredentialStore>,
}

impl SettingsService {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// Upsert every non-empty field.
    ///
    /// # Errors
    ///
    /// `InvalidInput` when no field carries a value; `Credential` when the
    /// store rejects a write. Writes before the failing one are kept.
    #[instrument(skip_all)]
    pub async fn save(&self, payload: &SettingsPayload) -> Result<SettingsSaved> {
        let entries = payload.entries();
        if entries.is_empty() {
            return Err(CoreError::InvalidInput {
                field: "settings".to_string(),
                message: "No settings provided".to_string(),
            });
        }

        for (key, value) in &entries {
            self.store.set_credential(*key, value).await.map_err(|e| {
                warn!(key = key.as_str(), error = %e, "Failed to save setting");
                CoreError::Credential(e.to_string())
            })?;
            info!(
                key = key.as_str(),
                value = %redact_if_sensitive(key.as_str(), value),
                "Saved setting"
            );
        }

        Ok(SettingsSaved {
            settings_count: entries.len(),
        })
    }
}
