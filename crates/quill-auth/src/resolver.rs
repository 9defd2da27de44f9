use std::sync::Arc;

use quill_core::{AuthenticatedIdentity, ClientRepository, Principal, SessionVerifier};
use subtle::ConstantTimeEq;
use tracing::{debug, warn};

use crate::credential::{extract_bearer, CredentialShape};
use crate::error::{AuthError, AuthResult};

/// Resolves bearer credentials into an [`AuthenticatedIdentity`].
///
/// Resolution order:
/// 1. Extract the bearer credential (`MissingCredential` when absent).
/// 2. Classify its shape.
/// 3. Permanent-token shape: active client lookup. Such a credential is never
///    handed to session verification, whatever the lookup outcome.
/// 4. Session-token shape: a single call to the session verifier.
/// 5. Anything else: `InvalidCredential`.
///
/// Every failed decision collapses into `InvalidCredential` so callers cannot
/// learn which scheme was attempted.
#[derive(Clone)]
pub struct CredentialResolver {
    clients: Arc<dyn ClientRepository>,
    sessions: Arc<dyn SessionVerifier>,
}

impl CredentialResolver {
    pub fn new(clients: Arc<dyn ClientRepository>, sessions: Arc<dyn SessionVerifier>) -> Self {
        Self { clients, sessions }
    }

    /// Resolves the raw `Authorization` header value of a request.
    ///
    /// # Errors
    ///
    /// - `MissingCredential` if no bearer credential is present
    /// - `InvalidCredential` if neither scheme resolves it
    /// - `StoreUnavailable` if a store lookup itself fails
    pub async fn resolve(&self, authorization: Option<&str>) -> AuthResult<AuthenticatedIdentity> {
        let Some(credential) = extract_bearer(authorization) else {
            debug!("No bearer credential on request");
            return Err(AuthError::MissingCredential);
        };

        let identity = match CredentialShape::classify(credential) {
            CredentialShape::PermanentToken => self.resolve_permanent_token(credential).await?,
            CredentialShape::SessionToken => self.resolve_session_token(credential).await?,
            CredentialShape::Unrecognized => {
                debug!("Credential matches no known shape");
                None
            }
        };

        match identity {
            Some(identity) => {
                debug!(scheme = %identity.scheme(), user_id = %identity.principal().user_id, "Credential resolved");
                Ok(identity)
            }
            None => {
                warn!("Rejected bearer credential");
                Err(AuthError::InvalidCredential)
            }
        }
    }

    async fn resolve_permanent_token(
        &self,
        token: &str,
    ) -> AuthResult<Option<AuthenticatedIdentity>> {
        let Some(client) = self
            .clients
            .find_active_client_by_permanent_token(token)
            .await?
        else {
            return Ok(None);
        };

        // Status and exact token match are enforced here as well as in the store.
        if !client.is_active() {
            warn!(client_id = %client.client_id, status = client.status.as_str(), "Store returned inactive client");
            return Ok(None);
        }

        let token_matches: bool = client.permanent_token.len() == token.len()
            && bool::from(client.permanent_token.as_bytes().ct_eq(token.as_bytes()));
        if !token_matches {
            warn!(client_id = %client.client_id, "Store returned client with non-matching token");
            return Ok(None);
        }

        let Some(owner) = client.owner else {
            warn!(client_id = %client.client_id, "Active client has no owning user");
            return Ok(None);
        };

        Ok(Some(AuthenticatedIdentity::from_permanent_token(
            &client,
            Principal::new(owner),
        )))
    }

    async fn resolve_session_token(
        &self,
        token: &str,
    ) -> AuthResult<Option<AuthenticatedIdentity>> {
        let principal = self.sessions.verify_session_token(token).await?;
        Ok(principal.map(AuthenticatedIdentity::from_session_token))
    }
}

impl std::fmt::Debug for CredentialResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialResolver").finish_non_exhaustive()
    }
}
