//! # Content Reader
//!
//! Read path serving the mirrored media to the presentation layer.
//!
//! Reads never fail because a kind is empty: empty lists and zero counts are
//! a normal answer.

use crate::error::{LibraryError, Result};
use crate::models::{MediaItem, MediaKind};
use crate::repositories::MediaRepository;
use serde::Serialize;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, instrument};

pub const DEFAULT_CONTENT_LIMIT: u32 = 50;
/// Ceiling shared with `core_runtime::config::MAX_CONTENT_LIMIT`, which
/// rejects any configured maximum above it.
pub const MAX_CONTENT_LIMIT: u32 = 500;

/// Which kinds a content read returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentFilter {
    #[default]
    All,
    Only(MediaKind),
}

impl ContentFilter {
    pub fn includes(&self, kind: MediaKind) -> bool {
        match self {
            ContentFilter::All => true,
            ContentFilter::Only(only) => *only == kind,
        }
    }
}

impl FromStr for ContentFilter {
    type Err = LibraryError;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(ContentFilter::All);
        }

        s.parse::<MediaKind>()
            .map(ContentFilter::Only)
            .map_err(|_| LibraryError::InvalidInput {
                field: "type".to_string(),
                message: format!(
                    "Unknown content type '{}'. Expected photography, videography or all",
                    s
                ),
            })
    }
}

/// Parameters of a content read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentQuery {
    pub filter: ContentFilter,
    /// Restricts photography and videography alike. A kind with nothing
    /// featured comes back empty.
    pub featured_only: bool,
    /// Applied per kind
    pub limit: u32,
}

impl Default for ContentQuery {
    fn default() -> Self {
        Self {
            filter: ContentFilter::All,
            featured_only: false,
            limit: DEFAULT_CONTENT_LIMIT,
        }
    }
}

impl ContentQuery {
    pub fn with_filter(mut self, filter: ContentFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn featured_only(mut self, featured_only: bool) -> Self {
        self.featured_only = featured_only;
        self
    }

    /// Set the per-kind limit, clamped to `1..=MAX_CONTENT_LIMIT`.
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit.clamp(1, MAX_CONTENT_LIMIT);
        self
    }
}

/// Number of items returned per kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ContentCounts {
    pub photography: usize,
    pub videography: usize,
    pub total: usize,
}

/// Result of a content read, grouped by kind
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ContentSnapshot {
    pub photography: Vec<MediaItem>,
    pub videography: Vec<MediaItem>,
    pub counts: ContentCounts,
}

/// Read-only view over the media tables
pub struct ContentReader {
    repository: Arc<dyn MediaRepository>,
}

impl ContentReader {
    pub fn new(repository: Arc<dyn MediaRepository>) -> Self {
        Self { repository }
    }

    /// Newest-first items per requested kind.
    ///
    /// # Errors
    ///
    /// Only database failures are errors.
    #[instrument(skip(self), fields(filter = ?query.filter, limit = query.limit))]
    pub async fn get_content(&self, query: &ContentQuery) -> Result<ContentSnapshot> {
        let limit = query.limit.clamp(1, MAX_CONTENT_LIMIT);
        let mut snapshot = ContentSnapshot::default();

        for kind in MediaKind::ALL {
            if !query.filter.includes(kind) {
                continue;
            }

            let items = self
                .repository
                .list_recent(kind, query.featured_only, limit)
                .await?;

            match kind {
                MediaKind::Photo => snapshot.photography = items,
                MediaKind::Video => snapshot.videography = items,
            }
        }

        snapshot.counts = ContentCounts {
            photography: snapshot.photography.len(),
            videography: snapshot.videography.len(),
            total: snapshot.photography.len() + snapshot.videography.len(),
        };

        debug!(
            photography = snapshot.counts.photography,
            videography = snapshot.counts.videography,
            "Content read"
        );

        Ok(snapshot)
    }
}
