//! Credential Storage Abstraction
//!
//! Provides a key-value contract for provider credentials and the fixed set
//! of keys the sync pipeline understands.

use async_trait::async_trait;
use std::fmt;
use std::str::FromStr;

use crate::error::{BridgeError, Result};

/// Well-known credential keys.
///
/// The string form is the persisted key and must stay stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CredentialKey {
    GoogleDriveApiKey,
    GoogleDriveFolderId,
    YoutubeApiKey,
    YoutubeChannelId,
    YoutubePlaylistId,
}

impl CredentialKey {
    pub const ALL: [CredentialKey; 5] = [
        CredentialKey::GoogleDriveApiKey,
        CredentialKey::GoogleDriveFolderId,
        CredentialKey::YoutubeApiKey,
        CredentialKey::YoutubeChannelId,
        CredentialKey::YoutubePlaylistId,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CredentialKey::GoogleDriveApiKey => "google_drive_api_key",
            CredentialKey::GoogleDriveFolderId => "google_drive_folder_id",
            CredentialKey::YoutubeApiKey => "youtube_api_key",
            CredentialKey::YoutubeChannelId => "youtube_channel_id",
            CredentialKey::YoutubePlaylistId => "youtube_playlist_id",
        }
    }
}

impl fmt::Display for CredentialKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CredentialKey {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self> {
        CredentialKey::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| BridgeError::InvalidInput(format!("Unknown credential key: {}", s)))
    }
}

/// Credential store trait
///
/// Implementations must:
/// - Protect values at rest (encryption or equivalent)
/// - Replace the previous value on write
/// - Never log or expose plaintext values
///
/// # Example
///
/// ```ignore
/// use bridge_traits::storage::{CredentialKey, CredentialStore};
///
/// async fn drive_key(store: &dyn CredentialStore) -> Result<Option<String>> {
///     store.get_credential(CredentialKey::GoogleDriveApiKey).await
/// }
/// ```
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Store a credential, replacing any previous value.
    async fn set_credential(&self, key: CredentialKey, value: &str) -> Result<()>;

    /// Retrieve a credential in plaintext.
    ///
    /// Returns `Ok(None)` if the key has never been stored.
    async fn get_credential(&self, key: CredentialKey) -> Result<Option<String>>;

    /// Keys that currently have a stored value.
    async fn list_keys(&self) -> Result<Vec<CredentialKey>>;

    /// Check whether a non-empty value is stored for `key`.
    async fn has_credential(&self, key: CredentialKey) -> Result<bool> {
        Ok(self
            .get_credential(key)
            .await?
            .map(|v| !v.is_empty())
            .unwrap_or(false))
    }
}
