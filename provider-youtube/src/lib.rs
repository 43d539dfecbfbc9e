//! # YouTube Provider
//!
//! Implements `VideoSource` for YouTube Data API v3.
//!
//! ## Overview
//!
//! This module provides:
//! - Channel to uploads-playlist resolution
//! - Playlist paging with a page cap
//! - Batched video details lookup (duration, views, best thumbnail)

pub mod connector;
pub mod error;
pub mod types;

pub use connector::YouTubeConnector;
pub use error::{Result, YouTubeError};
