//! # Core Configuration Module
//!
//! Provides configuration management for the sync service.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct an
//! [`AppConfig`]. `build()` enforces fail-fast validation so a misconfigured
//! process stops at startup with an actionable message instead of failing on
//! the first sync.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::AppConfig;
//! use std::time::Duration;
//!
//! let config = AppConfig::builder()
//!     .database_path("/var/lib/folio/folio.db")
//!     .credential_key_hex(key_hex)
//!     .photo_sync_interval(Some(Duration::from_secs(3600)))
//!     .build()?;
//! ```

use crate::error::{Error, Result};
use crate::logging::LoggingConfig;
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8787";
pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_CONTENT_LIMIT: u32 = 50;
/// Hard ceiling on the per-kind content limit. The read path clamps to it.
pub const MAX_CONTENT_LIMIT: u32 = 500;

/// Validated service configuration.
///
/// Use [`AppConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct AppConfig {
    /// Path to the SQLite database file
    pub database_path: PathBuf,

    /// Address the HTTP server listens on
    pub bind_address: SocketAddr,

    /// Hex-encoded 32-byte key sealing stored credentials
    pub credential_key_hex: String,

    /// Upper bound for a single provider round trip
    pub provider_timeout: Duration,

    /// Interval for scheduled photo syncs (`None` disables)
    pub photo_sync_interval: Option<Duration>,

    /// Interval for scheduled video syncs (`None` disables)
    pub video_sync_interval: Option<Duration>,

    /// Content limit applied when a read does not ask for one
    pub default_content_limit: u32,

    /// Largest per-kind limit a read may request
    pub max_content_limit: u32,

    pub logging: LoggingConfig,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("database_path", &self.database_path)
            .field("bind_address", &self.bind_address)
            .field("credential_key_hex", &"[REDACTED]")
            .field("provider_timeout", &self.provider_timeout)
            .field("photo_sync_interval", &self.photo_sync_interval)
            .field("video_sync_interval", &self.video_sync_interval)
            .field("default_content_limit", &self.default_content_limit)
            .field("max_content_limit", &self.max_content_limit)
            .field("logging", &self.logging)
            .finish()
    }
}

impl AppConfig {
    /// Creates a new builder for constructing an `AppConfig`.
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - Database path is not empty
    /// - Credential key is 64 hex characters
    /// - Provider timeout and sync intervals are non-zero
    /// - Content limits are ordered, non-zero and at most [`MAX_CONTENT_LIMIT`]
    pub fn validate(&self) -> Result<()> {
        if self.database_path.as_os_str().is_empty() {
            return Err(Error::Config(
                "Database path cannot be empty. Set FOLIO_DATABASE_PATH.".to_string(),
            ));
        }

        validate_credential_key(&self.credential_key_hex)?;

        if self.provider_timeout.is_zero() {
            return Err(Error::Config(
                "Provider timeout must be greater than zero".to_string(),
            ));
        }

        for (name, interval) in [
            ("Photo", self.photo_sync_interval),
            ("Video", self.video_sync_interval),
        ] {
            if interval.is_some_and(|d| d.is_zero()) {
                return Err(Error::Config(format!(
                    "{} sync interval must be greater than zero. Omit it to disable scheduling.",
                    name
                )));
            }
        }

        if self.default_content_limit == 0 {
            return Err(Error::Config(
                "Default content limit must be greater than zero".to_string(),
            ));
        }

        if self.max_content_limit > MAX_CONTENT_LIMIT {
            return Err(Error::Config(format!(
                "Maximum content limit {} exceeds the ceiling of {}",
                self.max_content_limit, MAX_CONTENT_LIMIT
            )));
        }

        if self.default_content_limit > self.max_content_limit {
            return Err(Error::Config(format!(
                "Default content limit {} exceeds maximum {}",
                self.default_content_limit, self.max_content_limit
            )));
        }

        Ok(())
    }

    /// Clamp a requested per-kind limit into `1..=max_content_limit`.
    pub fn effective_content_limit(&self, requested: Option<u32>) -> u32 {
        requested
            .filter(|&limit| limit > 0)
            .unwrap_or(self.default_content_limit)
            .min(self.max_content_limit)
    }
}

fn validate_credential_key(key_hex: &str) -> Result<()> {
    if key_hex.is_empty() {
        return Err(Error::Config(
            "Credential key is required. Set FOLIO_CREDENTIAL_KEY to 64 hex characters (32 bytes)."
                .to_string(),
        ));
    }

    let bytes = hex::decode(key_hex)
        .map_err(|e| Error::Config(format!("Credential key is not valid hex: {}", e)))?;

    if bytes.len() != 32 {
        return Err(Error::Config(format!(
            "Credential key must decode to 32 bytes, got {}",
            bytes.len()
        )));
    }

    Ok(())
}

/// Builder for [`AppConfig`].
#[derive(Default)]
pub struct AppConfigBuilder {
    database_path: Option<PathBuf>,
    bind_address: Option<String>,
    credential_key_hex: Option<String>,
    provider_timeout: Option<Duration>,
    photo_sync_interval: Option<Duration>,
    video_sync_interval: Option<Duration>,
    default_content_limit: Option<u32>,
    max_content_limit: Option<u32>,
    logging: Option<LoggingConfig>,
}

impl AppConfigBuilder {
    /// Sets the database path.
    pub fn database_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.database_path = Some(path.into());
        self
    }

    /// Sets the listen address, e.g. `0.0.0.0:8787`.
    ///
    /// Default: `127.0.0.1:8787`
    pub fn bind_address(mut self, address: impl Into<String>) -> Self {
        self.bind_address = Some(address.into());
        self
    }

    /// Sets the hex-encoded credential key (required).
    pub fn credential_key_hex(mut self, key_hex: impl Into<String>) -> Self {
        self.credential_key_hex = Some(key_hex.into());
        self
    }

    /// Default: 30 seconds
    pub fn provider_timeout(mut self, timeout: Duration) -> Self {
        self.provider_timeout = Some(timeout);
        self
    }

    pub fn photo_sync_interval(mut self, interval: Option<Duration>) -> Self {
        self.photo_sync_interval = interval;
        self
    }

    pub fn video_sync_interval(mut self, interval: Option<Duration>) -> Self {
        self.video_sync_interval = interval;
        self
    }

    /// Default: 50
    pub fn default_content_limit(mut self, limit: u32) -> Self {
        self.default_content_limit = Some(limit);
        self
    }

    /// Default: 500
    pub fn max_content_limit(mut self, limit: u32) -> Self {
        self.max_content_limit = Some(limit);
        self
    }

    pub fn logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = Some(logging);
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` when a required value is missing or invalid.
    pub fn build(self) -> Result<AppConfig> {
        let database_path = self.database_path.ok_or_else(|| {
            Error::Config(
                "Database path is required. Set FOLIO_DATABASE_PATH or call database_path()."
                    .to_string(),
            )
        })?;

        let bind_address = self
            .bind_address
            .as_deref()
            .unwrap_or(DEFAULT_BIND_ADDRESS)
            .parse::<SocketAddr>()
            .map_err(|e| Error::Config(format!("Invalid bind address: {}", e)))?;

        let config = AppConfig {
            database_path,
            bind_address,
            credential_key_hex: self.credential_key_hex.unwrap_or_default(),
            provider_timeout: self.provider_timeout.unwrap_or(DEFAULT_PROVIDER_TIMEOUT),
            photo_sync_interval: self.photo_sync_interval,
            video_sync_interval: self.video_sync_interval,
            default_content_limit: self.default_content_limit.unwrap_or(DEFAULT_CONTENT_LIMIT),
            max_content_limit: self.max_content_limit.unwrap_or(MAX_CONTENT_LIMIT),
            logging: self.logging.unwrap_or_default(),
        };

        config.validate()?;
        Ok(config)
    }
}
