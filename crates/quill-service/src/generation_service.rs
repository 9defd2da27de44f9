//! Instrumented entry point for text generation.

use quill_llm::{BackendSelector, GenerationBackend, GenerationResult};
use std::time::Instant;
use tracing::{info, warn};

use crate::metrics::{GENERATION_DURATION_SECONDS, GENERATION_REQUESTS_TOTAL};

/// Text produced by a named backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    pub backend: &'static str,
    pub text: String,
}

/// Wraps a [`BackendSelector`] with logging and metrics.
#[derive(Debug, Clone)]
pub struct GenerationService {
    selector: BackendSelector,
}

impl GenerationService {
    pub fn new(selector: BackendSelector) -> Self {
        Self { selector }
    }

    /// Generates text with the named backend, or the default when `None`.
    ///
    /// Errors pass through unchanged; an unknown backend name is counted
    /// under the `unknown` label rather than the name the caller sent.
    pub async fn generate(&self, backend: Option<&str>, prompt: &str) -> GenerationResult<Generated> {
        let selected = match self.selector.select(backend) {
            Ok(selected) => selected,
            Err(err) => {
                warn!(error = %err, "Generation backend selection failed");
                GENERATION_REQUESTS_TOTAL
                    .with_label_values(&["unknown", err.code()])
                    .inc();
                return Err(err);
            }
        };

        let name = selected.name();
        let start = Instant::now();
        let result = selected.generate(prompt).await;
        let elapsed = start.elapsed();

        GENERATION_DURATION_SECONDS
            .with_label_values(&[name])
            .observe(elapsed.as_secs_f64());

        match result {
            Ok(text) => {
                info!(
                    backend = name,
                    duration_ms = elapsed.as_millis() as u64,
                    bytes = text.len(),
                    "Generation completed"
                );
                GENERATION_REQUESTS_TOTAL.with_label_values(&[name, "ok"]).inc();
                Ok(Generated {
                    backend: name,
                    text,
                })
            }
            Err(err) => {
                warn!(backend = name, code = err.code(), error = %err, "Generation failed");
                GENERATION_REQUESTS_TOTAL
                    .with_label_values(&[name, err.code()])
                    .inc();
                Err(err)
            }
        }
    }

    /// Name of the configured default backend.
    pub fn default_backend(&self) -> &str {
        self.selector.default_backend()
    }

    /// Underlying selector.
    pub fn selector(&self) -> &BackendSelector {
        &self.selector
    }
}
