use async_trait::async_trait;

use crate::client::ClientRecord;
use crate::error::CoreResult;
use crate::identity::Principal;

/// Read-only lookup of registered clients.
#[async_trait]
pub trait ClientRepository: Send + Sync {
    /// Returns the client whose permanent token equals `token` and whose
    /// status is active, if any.
    async fn find_active_client_by_permanent_token(
        &self,
        token: &str,
    ) -> CoreResult<Option<ClientRecord>>;
}

/// Verification contract for session tokens.
#[async_trait]
pub trait SessionVerifier: Send + Sync {
    /// Verifies a full `<id>|<secret>` token against stored session state.
    ///
    /// Returns the owning principal when the token is valid and unexpired,
    /// `None` otherwise. Malformed tokens are simply invalid.
    async fn verify_session_token(&self, token: &str) -> CoreResult<Option<Principal>>;
}
