//! Credential storage using SQLite

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    storage::{CredentialKey, CredentialStore},
    time::{Clock, SystemClock},
};
use sqlx::{
    sqlite::{SqlitePool, SqlitePoolOptions},
    Row,
};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::cipher::CredentialCipher;

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS sync_settings (
        setting_key TEXT PRIMARY KEY,
        setting_value TEXT NOT NULL,
        is_encrypted INTEGER NOT NULL DEFAULT 1,
        created_at INTEGER NOT NULL,
        updated_at INTEGER NOT NULL
    )
"#;

/// SQLite-backed credential store
///
/// Values are sealed with [`CredentialCipher`] before they reach the
/// `sync_settings` table and opened on read. Rows written with
/// `is_encrypted = 0` are returned verbatim.
pub struct SqliteCredentialStore {
    pool: SqlitePool,
    cipher: CredentialCipher,
    clock: Arc<dyn Clock>,
}

impl SqliteCredentialStore {
    /// Create a store over an existing pool. The `sync_settings` table must
    /// already exist (it is part of the library migrations).
    pub fn new(pool: SqlitePool, cipher: CredentialCipher) -> Self {
        Self {
            pool,
            cipher,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the time source used for `created_at`/`updated_at`.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Create an in-memory store with its own table (for testing)
    pub async fn in_memory(cipher: CredentialCipher) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| BridgeError::DatabaseError(format!("Failed to connect to DB: {}", e)))?;

        sqlx::query(CREATE_TABLE)
            .execute(&pool)
            .await
            .map_err(|e| BridgeError::DatabaseError(format!("Failed to create table: {}", e)))?;

        Ok(Self::new(pool, cipher))
    }

    /// Raw stored value, without decryption.
    pub async fn stored_value(&self, key: CredentialKey) -> Result<Option<String>> {
        let row = sqlx::query("SELECT setting_value FROM sync_settings WHERE setting_key = ?")
            .bind(key.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| BridgeError::DatabaseError(format!("Failed to read setting: {}", e)))?;

        Ok(row.map(|r| r.get::<String, _>(0)))
    }
}

#[async_trait]
impl CredentialStore for SqliteCredentialStore {
    async fn set_credential(&self, key: CredentialKey, value: &str) -> Result<()> {
        let sealed = self.cipher.encrypt(value)?;
        let now = self.clock.unix_timestamp();

        sqlx::query(
            r#"
            INSERT INTO sync_settings (setting_key, setting_value, is_encrypted, created_at, updated_at)
            VALUES (?, ?, 1, ?, ?)
            ON CONFLICT(setting_key) DO UPDATE SET
                setting_value = excluded.setting_value,
                is_encrypted = excluded.is_encrypted,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key.as_str())
        .bind(&sealed)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| BridgeError::DatabaseError(format!("Failed to store credential: {}", e)))?;

        debug!(key = %key, "Stored credential");
        Ok(())
    }

    async fn get_credential(&self, key: CredentialKey) -> Result<Option<String>> {
        let row = sqlx::query(
            "SELECT setting_value, is_encrypted FROM sync_settings WHERE setting_key = ?",
        )
        .bind(key.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| BridgeError::DatabaseError(format!("Failed to read credential: {}", e)))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let value: String = row.get(0);
        let is_encrypted: i64 = row.get(1);

        if is_encrypted == 0 {
            return Ok(Some(value));
        }

        self.cipher.decrypt(&value).map(Some).map_err(|e| {
            warn!(key = %key, "Stored credential could not be decrypted");
            e
        })
    }

    async fn list_keys(&self) -> Result<Vec<CredentialKey>> {
        let rows = sqlx::query("SELECT setting_key FROM sync_settings ORDER BY setting_key")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| BridgeError::DatabaseError(format!("Failed to list keys: {}", e)))?;

        Ok(rows
            .iter()
            .filter_map(|row| row.get::<String, _>(0).parse().ok())
            .collect())
    }
}
