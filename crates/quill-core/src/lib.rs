//! Core domain types and store traits for the Quill gateway.

pub mod client;
pub mod error;
pub mod identity;
pub mod ids;
pub mod session;
pub mod traits;

pub use client::{ClientRecord, ClientStatus};
pub use error::{CoreError, CoreResult};
pub use identity::{AuthScheme, AuthenticatedIdentity, Principal, RequestContext};
pub use ids::{ClientId, SessionTokenId, UserId};
pub use session::SessionTokenRecord;
pub use traits::{ClientRepository, SessionVerifier};
