use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Bridge capability not available: {0}")]
    NotAvailable(String),

    #[error("Bridge operation failed: {0}")]
    OperationFailed(String),

    /// The remote provider answered with a non-success status.
    ///
    /// `body` carries the raw response body for diagnostics.
    #[error("Provider {provider} responded with status {status}: {body}")]
    ProviderStatus {
        provider: String,
        status: u16,
        body: String,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Credential error: {0}")]
    Credential(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BridgeError {
    /// Whether this error was caused by caller-supplied input rather than
    /// the environment or a remote service.
    pub fn is_input_error(&self) -> bool {
        matches!(self, BridgeError::InvalidInput(_))
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
