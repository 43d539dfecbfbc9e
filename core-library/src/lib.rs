//! # Library Management Module
//!
//! Owns the media database and provides repository patterns for data access.
//!
//! ## Overview
//!
//! This module manages:
//! - SQLite database schema and migrations
//! - The `MediaItem` model shared by photos and videos
//! - `MediaRepository` for reconciliation writes
//! - `ContentReader` for the newest-first read path

pub mod content;
pub mod db;
pub mod error;
pub mod models;
pub mod repositories;

pub use content::{ContentCounts, ContentFilter, ContentQuery, ContentReader, ContentSnapshot};
pub use error::{LibraryError, Result};
pub use models::{MediaItem, MediaItemDraft, MediaItemId, MediaKind};
pub use repositories::{MediaRepository, SqliteMediaRepository};
