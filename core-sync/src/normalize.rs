//! # Provider Record Normalization
//!
//! Maps raw provider records onto [`MediaItemDraft`]s. Missing optional
//! fields are defaulted; only a blank identifier is rejected.

use crate::{Result, SyncError};
use bridge_traits::{RawFile, RawVideo};
use chrono::DateTime;
use core_library::models::UNTITLED;
use core_library::{MediaItemDraft, MediaKind};
use serde_json::{Map, Value};

const YOUTUBE_WATCH_URL: &str = "https://www.youtube.com/watch?v=";

/// A record fetched from one of the providers.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderRawItem {
    Photo(RawFile),
    Video(RawVideo),
}

impl ProviderRawItem {
    pub fn external_id(&self) -> &str {
        match self {
            ProviderRawItem::Photo(file) => file.id.trim(),
            ProviderRawItem::Video(video) => video.id.trim(),
        }
    }

    pub fn media_kind(&self) -> MediaKind {
        match self {
            ProviderRawItem::Photo(_) => MediaKind::Photo,
            ProviderRawItem::Video(_) => MediaKind::Video,
        }
    }

    /// Normalize into a draft ready for reconciliation.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when the record has no usable identifier.
    pub fn normalize(&self) -> Result<MediaItemDraft> {
        let external_id = self.external_id();
        if external_id.is_empty() {
            return Err(SyncError::invalid_input(
                "external_id",
                format!("{} record has no identifier", self.media_kind()),
            ));
        }

        Ok(match self {
            ProviderRawItem::Photo(file) => normalize_photo(external_id, file),
            ProviderRawItem::Video(video) => normalize_video(external_id, video),
        })
    }
}

impl From<RawFile> for ProviderRawItem {
    fn from(file: RawFile) -> Self {
        ProviderRawItem::Photo(file)
    }
}

impl From<RawVideo> for ProviderRawItem {
    fn from(video: RawVideo) -> Self {
        ProviderRawItem::Video(video)
    }
}

fn normalize_photo(external_id: &str, file: &RawFile) -> MediaItemDraft {
    let mut metadata = Map::new();
    insert_opt(&mut metadata, "mimeType", file.mime_type.as_deref());
    insert_opt(&mut metadata, "size", file.size.as_deref());
    insert_opt(&mut metadata, "createdTime", file.created_time.as_deref());

    MediaItemDraft {
        kind: MediaKind::Photo,
        external_id: external_id.to_string(),
        title: title_or_default(file.name.as_deref()),
        description: None,
        thumbnail_url: non_blank(file.thumbnail_link.as_deref()),
        source_url: non_blank(file.web_view_link.as_deref()),
        published_at: file.created_time.as_deref().and_then(parse_timestamp),
        metadata,
    }
}

fn normalize_video(external_id: &str, video: &RawVideo) -> MediaItemDraft {
    let mut metadata = Map::new();
    insert_opt(&mut metadata, "duration", video.duration.as_deref());
    metadata.insert("viewCount".to_string(), Value::from(video.view_count));

    MediaItemDraft {
        kind: MediaKind::Video,
        external_id: external_id.to_string(),
        title: title_or_default(video.title.as_deref()),
        description: non_blank(video.description.as_deref()),
        thumbnail_url: non_blank(video.thumbnail_url.as_deref()),
        source_url: Some(format!("{YOUTUBE_WATCH_URL}{external_id}")),
        published_at: video.published_at.as_deref().and_then(parse_timestamp),
        metadata,
    }
}

fn title_or_default(title: Option<&str>) -> String {
    non_blank(title).unwrap_or_else(|| UNTITLED.to_string())
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn insert_opt(metadata: &mut Map<String, Value>, key: &str, value: Option<&str>) {
    if let Some(value) = value {
        metadata.insert(key.to_string(), Value::String(value.to_string()));
    }
}

/// RFC 3339 to Unix seconds; unparseable values are dropped.
fn parse_timestamp(value: &str) -> Option<i64> {
    DateTime::parse_from_rfc3339(value.trim())
        .ok()
        .map(|dt| dt.timestamp())
}
