//! Registered API clients and their permanent tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::ids::{ClientId, UserId};

/// Administrative state of a registered client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientStatus {
    /// Client may authenticate with its permanent token.
    Active,
    /// Client is temporarily blocked and can be reactivated.
    Suspended,
    /// Client has been permanently retired.
    Revoked,
}

impl ClientStatus {
    /// Returns the canonical lowercase string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Suspended => "suspended",
            Self::Revoked => "revoked",
        }
    }
}

impl FromStr for ClientStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "suspended" => Ok(Self::Suspended),
            "revoked" => Ok(Self::Revoked),
            _ => Err(()),
        }
    }
}

/// A registered API consumer holding a long-lived permanent token.
///
/// Records are created and mutated by an administrative process; the gateway
/// only ever reads them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRecord {
    /// Unique identifier for this client.
    pub client_id: ClientId,

    /// Human-readable name of the partner integration.
    pub name: String,

    /// Permanent token value: a 64-character hexadecimal digest.
    pub permanent_token: String,

    /// Current administrative status.
    pub status: ClientStatus,

    /// User principal that owns this client (None = orphaned record).
    #[serde(default)]
    pub owner: Option<UserId>,

    /// When this client was registered.
    pub created_at: DateTime<Utc>,
}

impl ClientRecord {
    /// Creates a new active client record.
    #[must_use]
    pub fn new(name: impl Into<String>, permanent_token: impl Into<String>, owner: Option<UserId>) -> Self {
        Self {
            client_id: ClientId::new(),
            name: name.into(),
            permanent_token: permanent_token.into(),
            status: ClientStatus::Active,
            owner,
            created_at: Utc::now(),
        }
    }

    /// Returns a copy of this record with a different status.
    #[must_use]
    pub fn with_status(mut self, status: ClientStatus) -> Self {
        self.status = status;
        self
    }

    /// Only active clients may authenticate.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == ClientStatus::Active
    }
}
