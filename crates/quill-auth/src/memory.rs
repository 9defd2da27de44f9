//! In-memory credential store for development and testing.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use quill_core::{
    ClientRecord, ClientRepository, CoreResult, Principal, SessionTokenId, SessionTokenRecord,
    SessionVerifier,
};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use subtle::ConstantTimeEq;
use tracing::{debug, info};

use crate::credential::SESSION_TOKEN_DELIMITER;

/// Hashes the secret part of a session token using SHA-256.
/// Returns the hex-encoded digest, the only form the store keeps.
#[must_use]
pub fn hash_session_secret(secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

/// Serialized seed data for [`MemoryCredentialStore`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CredentialSeed {
    #[serde(default)]
    pub clients: Vec<ClientRecord>,
    #[serde(default)]
    pub sessions: Vec<SessionTokenRecord>,
}

/// Client and session store held entirely in memory.
///
/// Implements both [`ClientRepository`] and [`SessionVerifier`]. Clients are
/// indexed by permanent token, sessions by their numeric identifier.
#[derive(Clone, Default)]
pub struct MemoryCredentialStore {
    clients: Arc<RwLock<HashMap<String, ClientRecord>>>,
    sessions: Arc<RwLock<HashMap<SessionTokenId, SessionTokenRecord>>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from seed data.
    pub fn from_seed(seed: CredentialSeed) -> Self {
        let store = Self::new();
        for client in seed.clients {
            store.insert_client(client);
        }
        for session in seed.sessions {
            store.insert_session(session);
        }
        store
    }

    /// Loads seed data from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid seed JSON.
    pub fn from_seed_file(path: impl AsRef<Path>) -> CoreResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let seed: CredentialSeed = serde_json::from_str(&contents)?;
        info!(
            path = %path.display(),
            clients = seed.clients.len(),
            sessions = seed.sessions.len(),
            "Loaded credential seed"
        );
        Ok(Self::from_seed(seed))
    }

    /// Adds or replaces a client record (for seeding and tests).
    pub fn insert_client(&self, client: ClientRecord) {
        self.clients
            .write()
            .insert(client.permanent_token.clone(), client);
    }

    /// Adds or replaces a session record (for seeding and tests).
    pub fn insert_session(&self, session: SessionTokenRecord) {
        self.sessions.write().insert(session.id, session);
    }

    pub fn client_count(&self) -> usize {
        self.clients.read().len()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.read().len()
    }
}

#[async_trait]
impl ClientRepository for MemoryCredentialStore {
    async fn find_active_client_by_permanent_token(
        &self,
        token: &str,
    ) -> CoreResult<Option<ClientRecord>> {
        let clients = self.clients.read();
        Ok(clients
            .get(token)
            .filter(|client| client.is_active())
            .cloned())
    }
}

#[async_trait]
impl SessionVerifier for MemoryCredentialStore {
    async fn verify_session_token(&self, token: &str) -> CoreResult<Option<Principal>> {
        let Some((id, secret)) = token.split_once(SESSION_TOKEN_DELIMITER) else {
            return Ok(None);
        };
        let Ok(id) = id.parse::<SessionTokenId>() else {
            debug!("Session token identifier is not numeric");
            return Ok(None);
        };

        let sessions = self.sessions.read();
        let Some(session) = sessions.get(&id) else {
            return Ok(None);
        };

        if session.is_expired_at(Utc::now()) {
            debug!(session_id = %id, "Session token expired");
            return Ok(None);
        }

        let presented = hash_session_secret(secret);
        let matches: bool = presented.len() == session.secret_hash.len()
            && bool::from(presented.as_bytes().ct_eq(session.secret_hash.as_bytes()));

        Ok(matches.then(|| Principal::new(session.user_id)))
    }
}

impl std::fmt::Debug for MemoryCredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCredentialStore")
            .field("clients", &self.client_count())
            .field("sessions", &self.session_count())
            .finish()
    }
}
