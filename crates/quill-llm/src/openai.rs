//! OpenAI chat completions adapter.

use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

use crate::backend::{dispatch, GenerationBackend};
use crate::transport::{Transport, TransportRequest};
use crate::types::{BackendConfig, GenerationResult};

/// Backend speaking the OpenAI chat completions wire format.
#[derive(Clone)]
pub struct OpenAiBackend {
    config: BackendConfig,
    transport: Arc<dyn Transport>,
}

impl OpenAiBackend {
    pub const NAME: &'static str = "openai";
    const TEXT_POINTER: &'static str = "/choices/0/message/content";

    pub fn new(config: BackendConfig, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    fn build_request(&self, prompt: &str) -> TransportRequest {
        let body = json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "messages": [
                { "role": "user", "content": prompt }
            ],
        });

        TransportRequest::new(self.config.endpoint.clone(), body)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
    }
}

#[async_trait]
impl GenerationBackend for OpenAiBackend {
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
