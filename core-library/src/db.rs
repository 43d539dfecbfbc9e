//! # Database Connection Pool
//!
//! SQLite pool creation, migrations and health checks.
//!
//! ## Overview
//!
//! `create_pool` opens (or creates) the database file, applies the embedded
//! migrations from `migrations/` and verifies the connection before handing
//! the pool out. Every table the service uses (`photography`, `videography`,
//! `content_sync_log`, `sync_settings`) is owned by these migrations.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use core_library::db::{create_pool, DatabaseConfig};
//!
//! let pool = create_pool(DatabaseConfig::new("/var/lib/folio/folio.db")).await?;
//! ```
//!
//! For tests, use in-memory databases:
//!
//! ```rust,ignore
//! let pool = create_test_pool().await?;
//! ```

use crate::{LibraryError, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Pool, Sqlite};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Database configuration for SQLite connection pool
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database URL, `sqlite:<path>` or `sqlite::memory:`
    pub database_url: String,

    /// Minimum number of connections in the pool
    pub min_connections: u32,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Maximum time to wait for a connection from the pool
    pub acquire_timeout: Duration,

    /// Maximum idle time for a connection before being closed
    pub idle_timeout: Option<Duration>,
}

impl DatabaseConfig {
    /// Create a new database configuration with the given file path
    pub fn new(database_path: impl Into<PathBuf>) -> Self {
        let path = database_path.into();
        let database_url = format!("sqlite:{}", path.display());

        Self {
            database_url,
            min_connections: 1,
            max_connections: 5,
            acquire_timeout: Duration::from_secs(30),
            idle_timeout: Some(Duration::from_secs(600)),
        }
    }

    /// Create a configuration for an in-memory database (useful for testing)
    ///
    /// Every connection to `sqlite::memory:` sees its own database, so the
    /// pool is pinned to a single connection that never expires.
    pub fn in_memory() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            min_connections: 1,
            max_connections: 1,
            acquire_timeout: Duration::from_secs(30),
            idle_timeout: None,
        }
    }

    /// Set the maximum number of connections
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Set the connection acquire timeout
    pub fn acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    fn is_in_memory(&self) -> bool {
        self.database_url.contains(":memory:")
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::in_memory()
    }
}

/// Create a configured SQLite connection pool
///
/// This function:
/// 1. Configures SQLite connection options (WAL mode, foreign keys, etc.)
/// 2. Creates a connection pool with the specified configuration
/// 3. Runs database migrations
/// 4. Performs a health check
///
/// # Errors
///
/// Returns an error if:
/// - The database file cannot be accessed
/// - Connection pool creation fails
/// - Migrations fail
/// - Health check fails
pub async fn create_pool(config: DatabaseConfig) -> Result<Pool<Sqlite>> {
    info!(
        database_url = %config.database_url,
        max_connections = config.max_connections,
        "Creating database connection pool"
    );

    let mut connect_options =
        SqliteConnectOptions::from_str(&config.database_url).map_err(LibraryError::Database)?;

    connect_options = connect_options
        .synchronous(SqliteSynchronous::Normal)
        .foreign_keys(true)
        .create_if_missing(true)
        .busy_timeout(Duration::from_secs(5));

    if !config.is_in_memory() {
        connect_options = connect_options.journal_mode(SqliteJournalMode::Wal);
    }

    let mut pool_options = SqlitePoolOptions::new()
        .min_connections(config.min_connections)
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .idle_timeout(config.idle_timeout);

    if config.is_in_memory() {
        pool_options = pool_options.max_lifetime(None);
    }

    let pool = pool_options
        .connect_with(connect_options)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to create connection pool");
            LibraryError::Database(e)
        })?;

    debug!(connections = pool.size(), "Database connection pool created");

    run_migrations(&pool).await?;
    health_check(&pool).await?;

    Ok(pool)
}

/// Create a connection pool for testing with in-memory database
///
/// Migrations are already applied.
pub async fn create_test_pool() -> Result<Pool<Sqlite>> {
    create_pool(DatabaseConfig::in_memory()).await
}

/// Apply all pending migrations embedded from `migrations/`.
async fn run_migrations(pool: &Pool<Sqlite>) -> Result<()> {
    debug!("Running database migrations");

    sqlx::migrate!("./migrations").run(pool).await.map_err(|e| {
        warn!(error = %e, "Migration failed");
        LibraryError::Migration(e.to_string())
    })?;

    info!("Database migrations completed");
    Ok(())
}

/// Execute a trivial query to verify the pool is usable.
pub async fn health_check(pool: &Pool<Sqlite>) -> Result<()> {
    sqlx::query("SELECT 1").fetch_one(pool).await.map_err(|e| {
        warn!(error = %e, "Database health check failed");
        LibraryError::Database(e)
    })?;

    Ok(())
}
