use quill_core::CoreError;
use thiserror::Error;

/// Rejection produced by the credential resolver.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No bearer credential was supplied.
    #[error("missing bearer credential")]
    MissingCredential,

    /// A credential was supplied but no scheme could resolve it.
    #[error("invalid bearer credential")]
    InvalidCredential,

    /// The credential store failed; not an authentication decision.
    #[error("credential store unavailable: {0}")]
    StoreUnavailable(String),
}

impl AuthError {
    /// Stable machine-readable code for this rejection kind.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MissingCredential => "MISSING_CREDENTIAL",
            Self::InvalidCredential => "INVALID_CREDENTIAL",
            Self::StoreUnavailable(_) => "STORE_UNAVAILABLE",
        }
    }

    /// True for the two outcomes that map to an unauthorized response.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::MissingCredential | Self::InvalidCredential)
    }
}

impl From<CoreError> for AuthError {
    fn from(err: CoreError) -> Self {
        Self::StoreUnavailable(err.to_string())
    }
}

/// Result type for credential resolution.
pub type AuthResult<T> = Result<T, AuthError>;
