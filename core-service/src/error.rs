use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Core initialization failed: {0}")]
    InitializationFailed(String),

    #[error("Invalid input: {field} - {message}")]
    InvalidInput { field: String, message: String },

    #[error("Credential store error: {0}")]
    Credential(String),

    #[error("Configuration error: {0}")]
    Config(#[from] core_runtime::Error),

    #[error("Sync error: {0}")]
    Sync(#[from] core_sync::SyncError),

    #[error("Library error: {0}")]
    Library(#[from] core_library::LibraryError),
}

impl CoreError {
    /// Whether the caller sent something unusable.
    pub fn is_input_error(&self) -> bool {
        match self {
            CoreError::InvalidInput { .. } => true,
            CoreError::Sync(e) => e.is_input_error(),
            CoreError::Library(e) => e.is_input_error(),
            _ => false,
        }
    }

    /// Whether the provider rejected or failed the request.
    pub fn is_provider_error(&self) -> bool {
        matches!(self, CoreError::Sync(e) if e.is_provider_error())
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;
    use core_sync::SyncError;

    #[test]
    fn test_classification() {
        let err = CoreError::from(SyncError::invalid_input("apiKey", "required"));
        assert!(err.is_input_error());
        assert!(!err.is_provider_error());

        let err = CoreError::from(SyncError::Provider("HTTP 500".to_string()));
        assert!(err.is_provider_error());

        let err = CoreError::Credential("locked".to_string());
        assert!(!err.is_input_error());
    }
}
