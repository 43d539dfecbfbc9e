//! Error types for YouTube provider

use bridge_traits::error::BridgeError;
use thiserror::Error;

const PROVIDER: &str = "youtube";

/// YouTube provider errors
#[derive(Error, Debug)]
pub enum YouTubeError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// API request returned a non-success status
    #[error("YouTube API error (status {status_code}): {message}")]
    ApiError { status_code: u16, message: String },

    /// The channel exposes no uploads playlist
    #[error("Could not find uploads playlist for channel {channel_id}")]
    UploadsPlaylistNotFound { channel_id: String },

    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    #[error(transparent)]
    BridgeError(#[from] BridgeError),
}

pub type Result<T> = std::result::Result<T, YouTubeError>;

impl From<YouTubeError> for BridgeError {
    fn from(error: YouTubeError) -> Self {
        match error {
            YouTubeError::InvalidInput(msg) => BridgeError::InvalidInput(msg),
            YouTubeError::ApiError {
                status_code,
                message,
            } => BridgeError::ProviderStatus {
                provider: PROVIDER.to_string(),
                status: status_code,
                body: message,
            },
            e @ YouTubeError::UploadsPlaylistNotFound { .. } => {
                BridgeError::OperationFailed(e.to_string())
            }
            YouTubeError::ParseError(msg) => {
                BridgeError::OperationFailed(format!("YouTube parse error: {}", msg))
            }
            YouTubeError::BridgeError(e) => e,
        }
    }
}
