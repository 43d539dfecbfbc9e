//! # Google Drive Provider
//!
//! Implements `ImageSource` for Google Drive API v3.
//!
//! ## Overview
//!
//! This module provides:
//! - Folder-scoped image listing with an API key
//! - `nextPageToken` pagination with a page cap
//! - Client-side image MIME filtering
//! - Non-success responses surfaced with their raw body

pub mod connector;
pub mod error;
pub mod types;

pub use connector::GoogleDriveConnector;
pub use error::{GoogleDriveError, Result};
