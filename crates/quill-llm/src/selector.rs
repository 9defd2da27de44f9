use std::sync::Arc;
use tracing::debug;

use crate::backend::{Backend, BackendKind, GenerationBackend};
use crate::transport::Transport;
use crate::types::{GenerationResult, GenerationSettings};

/// Chooses a backend adapter by name.
///
/// Holds resolved settings for every backend and a shared transport. Adapters
/// are built per selection and carry only their own settings slice.
#[derive(Clone)]
pub struct BackendSelector {
    settings: GenerationSettings,
    transport: Arc<dyn Transport>,
}

impl BackendSelector {
    pub fn new(settings: GenerationSettings, transport: Arc<dyn Transport>) -> Self {
        Self {
            settings,
            transport,
        }
    }

    /// Resolves a backend by name, or the configured default when `name` is
    /// `None`.
    ///
    /// # Errors
    ///
    /// Returns `UnknownBackend` when the name (or the configured default) is
    /// not a known backend. An unknown explicit name never falls back to the
    /// default.
    pub fn select(&self, name: Option<&str>) -> GenerationResult<Backend> {
        let name = name.unwrap_or(&self.settings.default_backend);
        let kind: BackendKind = name.parse()?;
        debug!(backend = kind.as_str(), "Selected generation backend");

        Ok(Backend::build(
            kind,
            self.settings.config_for(kind).clone(),
            Arc::clone(&self.transport),
        ))
    }

    /// Selects a backend and generates text for `prompt`.
    ///
    /// # Errors
    ///
    /// Any selection or generation error, unchanged.
    pub async fn generate(&self, backend: Option<&str>, prompt: &str) -> GenerationResult<String> {
        self.select(backend)?.generate(prompt).await
    }

    /// Name of the default backend as configured.
    #[must_use]
    pub fn default_backend(&self) -> &str {
        &self.settings.default_backend
    }

    /// Availability of every known backend.
    #[must_use]
    pub fn availability(&self) -> Vec<(BackendKind, bool)> {
        BackendKind::ALL
            .into_iter()
            .map(|kind| (kind, self.settings.config_for(kind).is_available()))
            .collect()
    }
}

impl std::fmt::Debug for BackendSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendSelector")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
