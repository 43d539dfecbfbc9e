//! Error types for Google Drive provider

use bridge_traits::error::BridgeError;
use thiserror::Error;

const PROVIDER: &str = "google_drive";

/// Google Drive provider errors
#[derive(Error, Debug)]
pub enum GoogleDriveError {
    /// A required argument was blank
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// API request returned a non-success status
    #[error("Google Drive API error (status {status_code}): {message}")]
    ApiError { status_code: u16, message: String },

    /// Failed to parse API response
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Bridge error
    #[error(transparent)]
    BridgeError(#[from] BridgeError),
}

/// Result type for Google Drive operations
pub type Result<T> = std::result::Result<T, GoogleDriveError>;

impl From<GoogleDriveError> for BridgeError {
    fn from(error: GoogleDriveError) -> Self {
        match error {
            GoogleDriveError::InvalidInput(msg) => BridgeError::InvalidInput(msg),
            GoogleDriveError::ApiError {
                status_code,
                message,
            } => BridgeError::ProviderStatus {
                provider: PROVIDER.to_string(),
                status: status_code,
                body: message,
            },
            GoogleDriveError::ParseError(msg) => {
                BridgeError::OperationFailed(format!("Google Drive parse error: {}", msg))
            }
            GoogleDriveError::BridgeError(e) => e,
        }
    }
}
