use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::anthropic::AnthropicBackend;
use crate::gemini::GeminiBackend;
use crate::openai::OpenAiBackend;
use crate::transport::{Transport, TransportRequest};
use crate::types::{BackendConfig, GenerationError, GenerationResult};

/// Trait for text generation backends.
///
/// Implementations translate a prompt into their own wire format and back,
/// while callers see only "prompt in, text out".
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Generate text for a prompt.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The backend is not configured (no network call is made)
    /// - The transport fails or the backend answers with a non-2xx status
    /// - The response does not carry text at the backend's known path
    async fn generate(&self, prompt: &str) -> GenerationResult<String>;

    /// Whether credential, model and endpoint are all configured.
    fn is_available(&self) -> bool;

    /// Backend name as used for selection.
    fn name(&self) -> &'static str;
}

/// Closed set of known backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    OpenAi,
    Anthropic,
    Gemini,
}

impl BackendKind {
    /// Every known backend, in listing order.
    pub const ALL: [Self; 3] = [Self::OpenAi, Self::Anthropic, Self::Gemini];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
            Self::Gemini => "gemini",
        }
    }

    /// Names of every known backend.
    #[must_use]
    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(Self::as_str).collect()
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = GenerationError;

    /// Exact, case-sensitive match against the known names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| GenerationError::UnknownBackend {
                name: s.to_string(),
                valid: Self::names(),
            })
    }
}

/// A constructed backend adapter, one variant per [`BackendKind`].
#[derive(Clone)]
pub enum Backend {
    OpenAi(OpenAiBackend),
    Anthropic(AnthropicBackend),
    Gemini(GeminiBackend),
}

impl Backend {
    /// Builds the adapter for `kind` from its own settings slice.
    pub fn build(kind: BackendKind, config: BackendConfig, transport: Arc<dyn Transport>) -> Self {
        match kind {
            BackendKind::OpenAi => Self::OpenAi(OpenAiBackend::new(config, transport)),
            BackendKind::Anthropic => Self::Anthropic(AnthropicBackend::new(config, transport)),
            BackendKind::Gemini => Self::Gemini(GeminiBackend::new(config, transport)),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> BackendKind {
        match self {
            Self::OpenAi(_) => BackendKind::OpenAi,
            Self::Anthropic(_) => BackendKind::Anthropic,
            Self::Gemini(_) => BackendKind::Gemini,
        }
    }

    fn inner(&self) -> &dyn GenerationBackend {
        match self {
            Self::OpenAi(backend) => backend as &dyn GenerationBackend,
            Self::Anthropic(backend) => backend as &dyn GenerationBackend,
            Self::Gemini(backend) => backend as &dyn GenerationBackend,
        }
    }
}

#[async_trait]
impl GenerationBackend for Backend {
    async fn generate(&self, prompt: &str) -> GenerationResult<String> {
        self.inner().generate(prompt).await
    }

    fn is_available(&self) -> bool {
        self.inner().is_available()
    }

    fn name(&self) -> &'static str {
        self.inner().name()
    }
}

impl fmt::Debug for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Backend")
            .field("kind", &self.kind())
            .field("available", &self.is_available())
            .finish()
    }
}

/// Sends one request and extracts the text at `text_pointer` (JSON pointer).
pub(crate) async fn dispatch(
    backend: &'static str,
    transport: &dyn Transport,
    request: TransportRequest,
    text_pointer: &str,
) -> GenerationResult<String> {
    debug!(backend, url = %request.url, "Sending generation request");

    let response = transport.post(request).await.map_err(|err| {
        warn!(backend, error = %err, "Generation transport failed");
        GenerationError::Transport {
            backend,
            message: err.message,
        }
    })?;

    if !response.is_success() {
        warn!(backend, status = response.status, "Generation backend returned error status");
        return Err(GenerationError::RequestFailed {
            backend,
            status: response.status,
            body: response.body,
        });
    }

    extract_text(backend, &response.body, text_pointer)
}

/// Reads the string at `pointer`; no alternate paths are tried.
pub(crate) fn extract_text(
    backend: &'static str,
    body: &str,
    pointer: &str,
) -> GenerationResult<String> {
    let value: Value = serde_json::from_str(body).map_err(|err| {
        warn!(backend, error = %err, "Generation response is not JSON");
        GenerationError::unexpected(backend, format!("response is not valid JSON: {err}"))
    })?;

    match value.pointer(pointer) {
        Some(Value::String(text)) => Ok(text.clone()),
        Some(_) => {
            warn!(backend, pointer, "Generation response text is not a string");
            Err(GenerationError::unexpected(
                backend,
                format!("`{pointer}` is not a string"),
            ))
        }
        None => {
            warn!(backend, pointer, "Generation response is missing text");
            Err(GenerationError::unexpected(backend, format!("missing `{pointer}`")))
        }
    }
}
