use async_trait::async_trait;
use reqwest::Url;
use serde_json::json;
use std::sync::Arc;

use crate::backend::{dispatch, GenerationBackend};
use crate::transport::{Transport, TransportRequest};
use crate::types::{BackendConfig, GenerationResult};

/// Backend speaking the Gemini `generateContent` wire format.
///
/// The configured endpoint is the API base; the model path is appended.
#[derive(Clone)]
pub struct GeminiBackend {
    config: BackendConfig,
    transport: Arc<dyn Transport>,
}

impl GeminiBackend {
    pub const NAME: &'static str = "gemini";
    const TEXT_POINTER: &'static str = "/candidates/0/content/parts/0/text";

    pub fn new(config: BackendConfig, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    /// `{endpoint}/models/{model}:generateContent`, with the model id encoded
    /// as a single path segment.
    fn url(&self) -> String {
        let endpoint = self.config.endpoint.trim_end_matches('/');
        let method = format!("{}:generateContent", self.config.model);

        let Ok(mut url) = Url::parse(endpoint) else {
            // Left for the transport to reject.
            return format!("{endpoint}/models/{method}");
        };
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("models").push(&method);
        }
        url.into()
    }

    fn build_request(&self, prompt: &str) -> TransportRequest {
        let body = json!({
            "contents": [
                { "role": "user", "parts": [ { "text": prompt } ] }
            ],
            "generationConfig": {
                "maxOutputTokens": self.config.max_tokens,
            },
        });

        TransportRequest::new(self.url(), body).header("x-goog-api-key", self.config.api_key.clone())
    }
}

#[async_trait]
impl GenerationBackend for GeminiBackend {
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
