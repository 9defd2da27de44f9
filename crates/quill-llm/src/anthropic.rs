//! Anthropic messages adapter.

use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

use crate::backend::{dispatch, GenerationBackend};
use crate::transport::{Transport, TransportRequest};
use crate::types::{BackendConfig, GenerationResult};

/// Backend speaking the Anthropic messages wire format.
///
/// Sends the configured protocol version in the `anthropic-version` header,
/// falling back to [`AnthropicBackend::DEFAULT_VERSION`] when none is set.
#[derive(Clone)]
pub struct AnthropicBackend {
    config: BackendConfig,
    transport: Arc<dyn Transport>,
}

impl AnthropicBackend {
    pub const NAME: &'static str = "anthropic";
    /// Protocol version sent when the config does not name one.
    pub const DEFAULT_VERSION: &'static str = "2023-06-01";
    const TEXT_POINTER: &'static str = "/content/0/text";

    pub fn new(config: BackendConfig, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    fn build_request(&self, prompt: &str) -> TransportRequest {
        let version = self
            .config
            .version
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(Self::DEFAULT_VERSION);

        let body = json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "messages": [
                { "role": "user", "content": prompt }
            ],
        });

        TransportRequest::new(self.config.endpoint.clone(), body)
            .header("x-api-key", self.config.api_key.clone())
            .header("anthropic-version", version)
    }
}

#[async_trait]
impl GenerationBackend for AnthropicBackend {
    async fn generate(&self, prompt: &str) -> GenerationResult<String> {
        self.config.ensure_available(Self::NAME)?;
        dispatch(
            Self::NAME,
            self.transport.as_ref(),
            self.build_request(prompt),
            Self::TEXT_POINTER,
        )
        .await
    }

    fn is_available(&self) -> bool {
        self.config.is_available()
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }
}
