use thiserror::Error;

/// Message shown inline on the login form when the credentials do not match.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid username or password";

#[derive(Debug, Error)]
pub enum ClaimWiseError {
    #[error("{}", INVALID_CREDENTIALS_MESSAGE)]
    InvalidCredentials,

    #[error("A prediction is already being generated")]
    SubmissionInProgress,

    #[error("Prediction failed: {0}")]
    PredictionFailed(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Dataset error: {0}")]
    DatasetError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ClaimWiseError>;
