//! # Desktop Bridge Implementations
//!
//! Server-side implementations of the bridge traits.
//!
//! ## Overview
//!
//! - `HttpClient` using `reqwest` with retry and backoff
//! - `CredentialStore` backed by the SQLite `sync_settings` table, with values
//!   sealed by AES-256-GCM
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{CredentialCipher, ReqwestHttpClient, SqliteCredentialStore};
//!
//! let http_client = ReqwestHttpClient::with_timeout(Duration::from_secs(30))?;
//! let cipher = CredentialCipher::from_hex(&key_hex)?;
//! let credentials = SqliteCredentialStore::new(pool, cipher);
//! ```

mod cipher;
mod credential_store;
mod http;

pub use cipher::CredentialCipher;
pub use credential_store::SqliteCredentialStore;
pub use http::ReqwestHttpClient;
