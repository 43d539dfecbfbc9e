//! # Repository Pattern Implementation
//!
//! Repository traits and SQLite implementations for data access.
//!
//! ## Architecture
//!
//! - Traits define the interface for each repository
//! - SQLite implementations use sqlx for async database access
//! - All operations return `Result<T>` for error handling
//!
//! ## Available Repositories
//!
//! - `MediaRepository` - Mirrored photos and videos keyed by provider id

pub mod media;

pub use media::{MediaRepository, SqliteMediaRepository};
