use bridge_traits::BridgeError;
use core_library::LibraryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Sync run {run_id} not found")]
    RunNotFound { run_id: String },

    /// Missing or unusable server-side configuration, e.g. credentials that
    /// were never saved.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid input: {field} - {message}")]
    InvalidInput { field: String, message: String },

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Invalid run ID: {0}")]
    InvalidRunId(String),

    #[error("Invalid sync status: {0}")]
    InvalidStatus(String),

    #[error("Invalid sync kind: {0}")]
    InvalidKind(String),

    #[error("Invalid sync trigger: {0}")]
    InvalidTrigger(String),

    #[error("Invalid state transition from {from} to {to}: {reason}")]
    InvalidStateTransition {
        from: String,
        to: String,
        reason: String,
    },

    #[error("Database error: {0}")]
    Database(String),
}

impl SyncError {
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        SyncError::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Caller-supplied input was rejected before any network call.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            SyncError::InvalidInput { .. } | SyncError::InvalidKind(_) | SyncError::InvalidRunId(_)
        )
    }

    pub fn is_configuration_error(&self) -> bool {
        matches!(self, SyncError::Configuration(_))
    }

    pub fn is_provider_error(&self) -> bool {
        matches!(self, SyncError::Provider(_))
    }
}

impl From<LibraryError> for SyncError {
    fn from(err: LibraryError) -> Self {
        match err {
            LibraryError::InvalidInput { field, message } => {
                SyncError::InvalidInput { field, message }
            }
            other => SyncError::Database(other.to_string()),
        }
    }
}

impl From<BridgeError> for SyncError {
    fn from(err: BridgeError) -> Self {
        match err {
            BridgeError::InvalidInput(message) => SyncError::invalid_input("request", message),
            BridgeError::Credential(message) => SyncError::Configuration(message),
            BridgeError::DatabaseError(message) => SyncError::Database(message),
            other => SyncError::Provider(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
