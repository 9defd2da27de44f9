//! Stored state backing short-lived session tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{SessionTokenId, UserId};

/// Server-side record for a session token of the form `<id>|<secret>`.
///
/// Only the SHA-256 hex digest of the secret part is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTokenRecord {
    /// Identifier part of the token.
    pub id: SessionTokenId,

    /// User the session was issued to.
    pub user_id: UserId,

    /// Hex-encoded SHA-256 digest of the secret part.
    pub secret_hash: String,

    /// When the session stops being valid (None = no expiry).
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl SessionTokenRecord {
    /// Checks whether the session has expired at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| now >= expires_at)
    }
}
