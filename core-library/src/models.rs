//! Domain models for the media library
//!
//! This module contains the persisted media records and their database
//! mapping.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{LibraryError, Result};

pub const DEFAULT_CATEGORY: &str = "general";
pub const UNTITLED: &str = "Untitled";

// =============================================================================
// ID Types
// =============================================================================

/// Unique identifier for a persisted media item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MediaItemId(pub Uuid);

impl MediaItemId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_string(s: &str) -> std::result::Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for MediaItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MediaItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Media Kind
// =============================================================================

/// The two kinds of mirrored media. Each kind has its own table and its own
/// `external_id` namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Photo,
    Video,
}

impl MediaKind {
    pub const ALL: [MediaKind; 2] = [MediaKind::Photo, MediaKind::Video];

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Photo => "photo",
            MediaKind::Video => "video",
        }
    }

    /// Backing table, also the key used in content responses.
    pub fn table_name(&self) -> &'static str {
        match self {
            MediaKind::Photo => "photography",
            MediaKind::Video => "videography",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaKind {
    type Err = LibraryError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "photo" | "photography" => Ok(MediaKind::Photo),
            "video" | "videography" => Ok(MediaKind::Video),
            other => Err(LibraryError::InvalidInput {
                field: "kind".to_string(),
                message: format!("Unknown media kind: {}", other),
            }),
        }
    }
}

// =============================================================================
// Domain Models
// =============================================================================

/// Display fields for one media item as derived from a provider record.
///
/// Produced by normalization; carries no local identity or timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItemDraft {
    pub kind: MediaKind,
    pub external_id: String,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    pub source_url: Option<String>,
    /// Provider-supplied ordering timestamp (Unix seconds)
    pub published_at: Option<i64>,
    pub metadata: Map<String, Value>,
}

/// A persisted photo or video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: MediaItemId,
    pub kind: MediaKind,
    /// Provider identifier, unique within `kind`
    pub external_id: String,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    pub source_url: Option<String>,
    pub category: String,
    pub is_featured: bool,
    pub published_at: Option<i64>,
    pub metadata: Map<String, Value>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl MediaItem {
    /// Build a new record from a draft, assigning identity and timestamps.
    pub fn from_draft(draft: MediaItemDraft, now: i64) -> Self {
        Self {
            id: MediaItemId::new(),
            kind: draft.kind,
            external_id: draft.external_id,
            title: draft.title,
            description: draft.description,
            thumbnail_url: draft.thumbnail_url,
            source_url: draft.source_url,
            category: DEFAULT_CATEGORY.to_string(),
            is_featured: false,
            published_at: draft.published_at,
            metadata: draft.metadata,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite the provider-owned fields from `draft`.
    ///
    /// `id`, `external_id`, `created_at`, `category` and `is_featured` are
    /// left untouched.
    pub fn apply_draft(&mut self, draft: MediaItemDraft, now: i64) {
        self.title = draft.title;
        self.description = draft.description;
        self.thumbnail_url = draft.thumbnail_url;
        self.source_url = draft.source_url;
        self.published_at = draft.published_at;
        self.metadata = draft.metadata;
        self.updated_at = now;
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.external_id.trim().is_empty() {
            return Err("External id cannot be empty".to_string());
        }

        if self.title.trim().is_empty() {
            return Err("Title cannot be empty".to_string());
        }

        if self.updated_at < self.created_at {
            return Err("updated_at cannot precede created_at".to_string());
        }

        Ok(())
    }
}

/// Row shape shared by the `photography` and `videography` tables
#[derive(Debug, Clone, FromRow)]
pub(crate) struct MediaItemRow {
    pub id: String,
    pub external_id: String,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    pub source_url: Option<String>,
    pub category: String,
    pub is_featured: bool,
    pub published_at: Option<i64>,
    pub metadata: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl MediaItemRow {
    pub(crate) fn into_item(self, kind: MediaKind) -> Result<MediaItem> {
        let id = MediaItemId::from_string(&self.id).map_err(|e| LibraryError::InvalidInput {
            field: "id".to_string(),
            message: format!("Invalid media item id {}: {}", self.id, e),
        })?;

        let metadata = match serde_json::from_str::<Value>(&self.metadata) {
            Ok(Value::Object(map)) => map,
            Ok(_) => Map::new(),
            Err(e) => return Err(LibraryError::Serialization(e.to_string())),
        };

        Ok(MediaItem {
            id,
            kind,
            external_id: self.external_id,
            title: self.title,
            description: self.description,
            thumbnail_url: self.thumbnail_url,
            source_url: self.source_url,
            category: self.category,
            is_featured: self.is_featured,
            published_at: self.published_at,
            metadata,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
