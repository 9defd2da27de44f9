//! Shared state for the API server.

use quill_auth::CredentialResolver;
use quill_service::GenerationService;
use std::sync::Arc;

/// Shared application state for the API server
#[derive(Clone, Debug)]
pub struct AppState {
    /// Resolves `Authorization` headers into identities
    pub resolver: Arc<CredentialResolver>,
    /// Instrumented generation entry point
    pub generation: Arc<GenerationService>,
}

impl AppState {
    pub fn new(resolver: CredentialResolver, generation: GenerationService) -> Self {
        Self {
            resolver: Arc::new(resolver),
            generation: Arc::new(generation),
        }
    }
}
