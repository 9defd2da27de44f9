use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::backend::BackendKind;

/// Error type for generation operations.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Backend name is not one of the known backends.
    #[error("unknown backend `{name}`; expected one of: {}", .valid.join(", "))]
    UnknownBackend {
        name: String,
        valid: Vec<&'static str>,
    },

    /// A required setting for the backend is empty.
    #[error("backend `{backend}` is not configured: `{setting}` is empty")]
    BackendUnconfigured {
        backend: &'static str,
        setting: &'static str,
    },

    /// The backend answered with a non-success status.
    #[error("backend `{backend}` request failed with status {status}: {body}")]
    RequestFailed {
        backend: &'static str,
        status: u16,
        body: String,
    },

    /// The backend answered successfully but the text was not where expected.
    #[error("backend `{backend}` returned an unexpected response: {detail}")]
    UnexpectedResponse {
        backend: &'static str,
        detail: String,
    },

    /// The transport could not complete the round-trip.
    #[error("transport error calling backend `{backend}`: {message}")]
    Transport {
        backend: &'static str,
        message: String,
    },
}

impl GenerationError {
    /// Stable machine-readable code for this failure kind.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::UnknownBackend { .. } => "UNKNOWN_BACKEND",
            Self::BackendUnconfigured { .. } => "BACKEND_UNCONFIGURED",
            Self::RequestFailed { .. } => "BACKEND_REQUEST_FAILED",
            Self::UnexpectedResponse { .. } => "BACKEND_UNEXPECTED_RESPONSE",
            Self::Transport { .. } => "BACKEND_TRANSPORT",
        }
    }

    pub(crate) fn unexpected(backend: &'static str, detail: impl Into<String>) -> Self {
        Self::UnexpectedResponse {
            backend,
            detail: detail.into(),
        }
    }
}

/// Result type for generation operations.
pub type GenerationResult<T> = Result<T, GenerationError>;

/// Settings for a single backend.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Credential sent to the backend.
    #[serde(default, skip_serializing)]
    pub api_key: String,

    /// Model identifier (e.g., "gpt-4o-mini").
    #[serde(default)]
    pub model: String,

    /// Endpoint URL.
    #[serde(default)]
    pub endpoint: String,

    /// Maximum number of output tokens requested.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Protocol version tag (only the Anthropic backend sends one).
    #[serde(default)]
    pub version: Option<String>,
}

fn default_max_tokens() -> u32 {
    1024
}

impl BackendConfig {
    /// Creates a config with the given endpoint and model and no credential.
    #[must_use]
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: String::new(),
            model: model.into(),
            endpoint: endpoint.into(),
            max_tokens: default_max_tokens(),
            version: None,
        }
    }

    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Defaults for the OpenAI chat completions API.
    #[must_use]
    pub fn openai_defaults() -> Self {
        Self::new("https://api.openai.com/v1/chat/completions", "gpt-4o-mini")
    }

    /// Defaults for the Anthropic messages API.
    #[must_use]
    pub fn anthropic_defaults() -> Self {
        Self::new("https://api.anthropic.com/v1/messages", "claude-3-5-haiku-latest")
            .with_version("2023-06-01")
    }

    /// Defaults for the Gemini API (model path is appended by the adapter).
    #[must_use]
    pub fn gemini_defaults() -> Self {
        Self::new(
            "https://generativelanguage.googleapis.com/v1beta",
            "gemini-1.5-flash",
        )
    }

    /// First required setting that is empty, if any.
    #[must_use]
    pub fn missing_setting(&self) -> Option<&'static str> {
        [
            ("api_key", &self.api_key),
            ("model", &self.model),
            ("endpoint", &self.endpoint),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
    }

    /// A backend is available only when credential, model and endpoint are set.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.missing_setting().is_none()
    }

    /// Fails with `BackendUnconfigured` naming the first empty setting.
    pub(crate) fn ensure_available(&self, backend: &'static str) -> GenerationResult<()> {
        match self.missing_setting() {
            Some(setting) => Err(GenerationError::BackendUnconfigured { backend, setting }),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let api_key = if self.api_key.is_empty() { "" } else { "<redacted>" };
        f.debug_struct("BackendConfig")
            .field("api_key", &api_key)
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("max_tokens", &self.max_tokens)
            .field("version", &self.version)
            .finish()
    }
}

/// Settings for every backend plus the default backend name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationSettings {
    /// Backend used when a caller does not name one (default: "openai").
    #[serde(default = "default_backend_name")]
    pub default_backend: String,

    #[serde(default = "BackendConfig::openai_defaults")]
    pub openai: BackendConfig,

    #[serde(default = "BackendConfig::anthropic_defaults")]
    pub anthropic: BackendConfig,

    #[serde(default = "BackendConfig::gemini_defaults")]
    pub gemini: BackendConfig,
}

fn default_backend_name() -> String {
    BackendKind::OpenAi.as_str().to_string()
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            default_backend: default_backend_name(),
            openai: BackendConfig::openai_defaults(),
            anthropic: BackendConfig::anthropic_defaults(),
            gemini: BackendConfig::gemini_defaults(),
        }
    }
}

impl GenerationSettings {
    /// Returns the settings slice for one backend.
    #[must_use]
    pub fn config_for(&self, kind: BackendKind) -> &BackendConfig {
        match kind {
            BackendKind::OpenAi => &self.openai,
            BackendKind::Anthropic => &self.anthropic,
            BackendKind::Gemini => &self.gemini,
        }
    }

    /// Mutable access to one backend's settings.
    pub fn config_for_mut(&mut self, kind: BackendKind) -> &mut BackendConfig {
        match kind {
            BackendKind::OpenAi => &mut self.openai,
            BackendKind::Anthropic => &mut self.anthropic,
            BackendKind::Gemini => &mut self.gemini,
        }
    }
}
