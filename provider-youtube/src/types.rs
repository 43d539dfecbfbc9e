//! YouTube Data API v3 response types
//!
//! Only the fields the connector reads are modelled; everything else is
//! ignored by serde.

use bridge_traits::RawVideo;
use serde::Deserialize;

/// `channels.list` response
#[derive(Debug, Deserialize)]
pub struct ChannelListResponse {
    #[serde(default)]
    pub items: Vec<Channel>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    #[serde(default)]
    pub content_details: Option<ChannelContentDetails>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelContentDetails {
    #[serde(default)]
    pub related_playlists: Option<RelatedPlaylists>,
}

#[derive(Debug, Deserialize)]
pub struct RelatedPlaylists {
    #[serde(default)]
    pub uploads: Option<String>,
}

impl ChannelListResponse {
    /// Uploads playlist of the first channel, if any
    pub fn uploads_playlist(&self) -> Option<&str> {
        self.items
            .first()?
            .content_details
            .as_ref()?
            .related_playlists
            .as_ref()?
            .uploads
            .as_deref()
            .filter(|id| !id.is_empty())
    }
}

/// `playlistItems.list` response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemListResponse {
    #[serde(default)]
    pub items: Vec<PlaylistItem>,

    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItem {
    #[serde(default)]
    pub content_details: Option<PlaylistItemContentDetails>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemContentDetails {
    #[serde(default)]
    pub video_id: Option<String>,
}

impl PlaylistItem {
    pub fn video_id(&self) -> Option<&str> {
        self.content_details
            .as_ref()?
            .video_id
            .as_deref()
            .filter(|id| !id.is_empty())
    }
}

/// `videos.list` response
#[derive(Debug, Deserialize)]
pub struct VideoListResponse {
    #[serde(default)]
    pub items: Vec<Video>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: String,

    #[serde(default)]
    pub snippet: Option<VideoSnippet>,

    #[serde(default)]
    pub content_details: Option<VideoContentDetails>,

    #[serde(default)]
    pub statistics: Option<VideoStatistics>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSnippet {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub thumbnails: Thumbnails,
}

/// Thumbnail tiers, highest resolution first
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Thumbnails {
    #[serde(default)]
    pub maxres: Option<Thumbnail>,
    #[serde(default)]
    pub standard: Option<Thumbnail>,
    #[serde(default)]
    pub high: Option<Thumbnail>,
    #[serde(default)]
    pub medium: Option<Thumbnail>,
    #[serde(default)]
    pub default: Option<Thumbnail>,
}

impl Thumbnails {
    pub fn best(&self) -> Option<&str> {
        [
            &self.maxres,
            &self.standard,
            &self.high,
            &self.medium,
            &self.default,
        ]
        .into_iter()
        .flatten()
        .filter_map(|t| t.url.as_deref())
        .find(|url| !url.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Thumbnail {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VideoContentDetails {
    /// ISO 8601 duration
    #[serde(default)]
    pub duration: Option<String>,
}

/// Counters arrive as decimal strings
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoStatistics {
    #[serde(default)]
    pub view_count: Option<String>,
}

impl From<Video> for RawVideo {
    fn from(video: Video) -> Self {
        let snippet = video.snippet;
        RawVideo {
            thumbnail_url: snippet
                .as_ref()
                .and_then(|s| s.thumbnails.best())
                .map(str::to_string),
            title: snippet.as_ref().and_then(|s| s.title.clone()),
            description: snippet.as_ref().and_then(|s| s.description.clone()),
            published_at: snippet.and_then(|s| s.published_at),
            duration: video.content_details.and_then(|d| d.duration),
            view_count: video
                .statistics
                .and_then(|s| s.view_count)
                .and_then(|c| c.parse().ok())
                .unwrap_or(0),
            id: video.id,
        }
    }
}
