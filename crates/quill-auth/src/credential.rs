//! Bearer extraction and credential shape classification.

/// Exact length of a permanent token (hex-encoded 32-byte digest).
pub const PERMANENT_TOKEN_LEN: usize = 64;

/// Separator between the identifier and secret parts of a session token.
pub const SESSION_TOKEN_DELIMITER: char = '|';

/// Extracts the bearer credential from an `Authorization` header value.
///
/// The scheme name is matched case-insensitively and may be separated from
/// the credential by any whitespace. Returns `None` when the
/// header is absent, uses another scheme, or carries an empty credential.
#[must_use]
pub fn extract_bearer(header: Option<&str>) -> Option<&str> {
    let (scheme, credential) = header?.trim().split_once(char::is_whitespace)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let credential = credential.trim();
    (!credential.is_empty()).then_some(credential)
}

/// Exactly 64 ASCII hex digits.
#[must_use]
pub fn is_permanent_token_shaped(credential: &str) -> bool {
    credential.len() == PERMANENT_TOKEN_LEN && credential.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Contains the session delimiter.
#[must_use]
pub fn is_session_token_shaped(credential: &str) -> bool {
    credential.contains(SESSION_TOKEN_DELIMITER)
}

/// Which resolution path a credential is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialShape {
    PermanentToken,
    SessionToken,
    Unrecognized,
}

impl CredentialShape {
    /// Classifies a credential.
    ///
    /// Both shape predicates are evaluated independently and the precedence
    /// is decided here, not by the formats happening to be disjoint: a
    /// credential matching both routes to the permanent-token path only.
    #[must_use]
    pub fn classify(credential: &str) -> Self {
        match (
            is_permanent_token_shaped(credential),
            is_session_token_shaped(credential),
        ) {
            (true, _) => Self::PermanentToken,
            (false, true) => Self::SessionToken,
            (false, false) => Self::Unrecognized,
        }
    }
}
