//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the sync service:
//! - Logging and tracing infrastructure
//! - Configuration management
//!
//! ## Overview
//!
//! This crate contains the runtime utilities that other modules depend on. It
//! establishes the logging conventions and the validated configuration every
//! other crate is built from.

pub mod config;
pub mod error;
pub mod logging;

pub use config::{AppConfig, AppConfigBuilder};
pub use error::{Error, Result};
pub use logging::{init_logging, LogFormat, LogLevel, LoggingConfig};
