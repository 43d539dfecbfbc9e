//! Content Provider Abstractions
//!
//! Contracts for the remote sources the sync pipeline pulls from. Connectors
//! return provider records with field names already mapped to Rust; turning
//! them into stored media items is the core's job.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// An image file as listed by a cloud folder provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawFile {
    pub id: String,
    pub name: Option<String>,
    pub mime_type: Option<String>,
    pub thumbnail_link: Option<String>,
    pub web_view_link: Option<String>,
    /// RFC 3339 creation time as reported by the provider.
    pub created_time: Option<String>,
    /// Size in bytes, kept as the provider's string form.
    pub size: Option<String>,
}

impl RawFile {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            mime_type: None,
            thumbnail_link: None,
            web_view_link: None,
            created_time: None,
            size: None,
        }
    }
}

/// A video joined from playlist listing and details lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawVideo {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    /// Best available thumbnail URL.
    pub thumbnail_url: Option<String>,
    /// RFC 3339 publication time.
    pub published_at: Option<String>,
    /// ISO 8601 duration, e.g. `PT4M13S`.
    pub duration: Option<String>,
    pub view_count: u64,
}

impl RawVideo {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: None,
            description: None,
            thumbnail_url: None,
            published_at: None,
            duration: None,
            view_count: 0,
        }
    }
}

/// Which set of videos to list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoScope {
    /// An explicit playlist.
    Playlist(String),
    /// The uploads playlist of a channel, resolved by the connector.
    Channel(String),
}

impl VideoScope {
    /// Pick a scope from optional identifiers. Blank values count as absent
    /// and a playlist wins when both are present.
    pub fn from_ids(channel_id: Option<&str>, playlist_id: Option<&str>) -> Option<Self> {
        fn non_blank(v: Option<&str>) -> Option<&str> {
            v.map(str::trim).filter(|v| !v.is_empty())
        }

        match (non_blank(channel_id), non_blank(playlist_id)) {
            (_, Some(playlist)) => Some(VideoScope::Playlist(playlist.to_string())),
            (Some(channel), None) => Some(VideoScope::Channel(channel.to_string())),
            (None, None) => None,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            VideoScope::Playlist(id) | VideoScope::Channel(id) => id,
        }
    }
}

/// Source of image files living in a remote folder.
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// List every image file directly inside `folder_id`.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure or a non-success provider status.
    async fn list_images(&self, api_key: &str, folder_id: &str) -> Result<Vec<RawFile>>;
}

/// Source of published videos.
#[async_trait]
pub trait VideoSource: Send + Sync {
    /// List the videos in `scope`, in playlist order.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure, a non-success provider status, or
    /// when a channel has no uploads playlist.
    async fn list_videos(&self, api_key: &str, scope: &VideoScope) -> Result<Vec<RawVideo>>;
}
