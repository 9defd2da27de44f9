//! Bearer credential resolution for the Quill gateway.
//!
//! Two credential schemes are accepted: permanent tokens (64 hex characters,
//! bound to a registered client) and session tokens (`<id>|<secret>`). The
//! [`CredentialResolver`] classifies the presented credential by shape and
//! probes the schemes in fixed precedence.

mod credential;
mod error;
mod memory;
mod resolver;

pub use credential::{
    extract_bearer, is_permanent_token_shaped, is_session_token_shaped, CredentialShape,
    PERMANENT_TOKEN_LEN, SESSION_TOKEN_DELIMITER,
};
pub use error::{AuthError, AuthResult};
pub use memory::{hash_session_secret, CredentialSeed, MemoryCredentialStore};
pub use resolver::CredentialResolver;
