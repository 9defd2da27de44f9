//! Authenticated identities produced by the credential resolver.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::client::ClientRecord;
use crate::ids::{ClientId, UserId};

/// The user behind a credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: UserId,
}

impl Principal {
    #[must_use]
    pub const fn new(user_id: UserId) -> Self {
        Self { user_id }
    }
}

/// Which credential scheme produced an identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthScheme {
    /// Long-lived 64-hex partner token bound to a client record.
    PermanentToken,
    /// Short-lived `<id>|<secret>` login token.
    SessionToken,
}

impl AuthScheme {
    /// Returns the canonical tag used in logs, metrics and responses.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PermanentToken => "permanent-token",
            Self::SessionToken => "session-token",
        }
    }
}

impl fmt::Display for AuthScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a successful credential resolution.
///
/// Carries exactly one scheme tag. Built only through the two scheme-specific
/// constructors so the tag always matches the path that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedIdentity {
    principal: Principal,
    scheme: AuthScheme,
    client_id: Option<ClientId>,
}

impl AuthenticatedIdentity {
    /// Identity resolved from an active client's permanent token.
    #[must_use]
    pub fn from_permanent_token(client: &ClientRecord, principal: Principal) -> Self {
        Self {
            principal,
            scheme: AuthScheme::PermanentToken,
            client_id: Some(client.client_id),
        }
    }

    /// Identity resolved from a verified session token.
    #[must_use]
    pub fn from_session_token(principal: Principal) -> Self {
        Self {
            principal,
            scheme: AuthScheme::SessionToken,
            client_id: None,
        }
    }

    #[must_use]
    pub const fn principal(&self) -> &Principal {
        &self.principal
    }

    #[must_use]
    pub const fn scheme(&self) -> AuthScheme {
        self.scheme
    }

    /// Client behind a permanent-token identity; always None for sessions.
    #[must_use]
    pub const fn client_id(&self) -> Option<ClientId> {
        self.client_id
    }
}

/// Immutable per-request context populated once by the authentication layer.
///
/// The request id is assigned by the transport layer (the `x-request-id`
/// header) so that it matches the id on every log line of the request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: String,
    identity: AuthenticatedIdentity,
}

impl RequestContext {
    #[must_use]
    pub fn new(request_id: impl Into<String>, identity: AuthenticatedIdentity) -> Self {
        Self {
            request_id: request_id.into(),
            identity,
        }
    }

    #[must_use]
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    #[must_use]
    pub const fn identity(&self) -> &AuthenticatedIdentity {
        &self.identity
    }
}
