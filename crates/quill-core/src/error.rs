use thiserror::Error;

/// Canonical error type for credential store operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The backing store could not be reached or answered with a failure.
    #[error("store unavailable: {message}")]
    StoreUnavailable {
        /// Human-readable details for debugging purposes.
        message: String,
    },

    /// Seed or persisted data could not be decoded.
    #[error("deserialization error: {0}")]
    DeserializationError(String),

    /// I/O error occurred while reading store data.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl CoreError {
    /// Creates a `StoreUnavailable` variant.
    #[must_use]
    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::StoreUnavailable {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::DeserializationError(err.to_string())
    }
}

/// Convenient result alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
