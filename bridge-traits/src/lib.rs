//! # Host Bridge Traits
//!
//! Abstraction traits between the sync core and the outside world.
//!
//! ## Overview
//!
//! The core never talks to the network, the credential table or the system
//! clock directly. Each capability is a trait here, with concrete adapters
//! living in `bridge-desktop` (HTTP, credentials) and the provider crates
//! (`provider-google-drive`, `provider-youtube`).
//!
//! ## Traits
//!
//! ### Networking
//! - [`HttpClient`](http::HttpClient) - Async HTTP operations with retry and timeouts
//!
//! ### Content Providers
//! - [`ImageSource`](provider::ImageSource) - Image files in a remote folder
//! - [`VideoSource`](provider::VideoSource) - Videos of a playlist or channel
//!
//! ### Storage
//! - [`CredentialStore`](storage::CredentialStore) - Protected provider credentials
//!
//! ### Utilities
//! - [`Clock`](time::Clock) - Time source for deterministic testing
//!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type. Adapters
//! should convert their own errors to `BridgeError` and keep the provider's
//! response body when a remote call fails.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` bounds so they can be shared as
//! `Arc<dyn Trait>` across async tasks.

pub mod error;
pub mod http;
pub mod provider;
pub mod storage;
pub mod time;

pub use error::BridgeError;

// Re-export commonly used types
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, RetryPolicy};
pub use provider::{ImageSource, RawFile, RawVideo, VideoScope, VideoSource};
pub use storage::{CredentialKey, CredentialStore};
pub use time::{Clock, FixedClock, SystemClock};
