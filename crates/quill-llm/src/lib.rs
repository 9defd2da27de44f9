//! Text generation backends for Quill.
//!
//! This crate provides a provider-agnostic "prompt in, text out" contract.
//! The concrete backend (OpenAI, Anthropic, Gemini) is chosen by name through
//! [`BackendSelector`]; each adapter owns its wire format and reaches the
//! network only through the [`Transport`] trait.

mod anthropic;
mod backend;
mod gemini;
mod mock;
mod openai;
mod selector;
mod transport;
mod types;

pub use anthropic::AnthropicBackend;
pub use backend::{Backend, BackendKind, GenerationBackend};
pub use gemini::GeminiBackend;
pub use mock::MockTransport;
pub use openai::OpenAiBackend;
pub use selector::BackendSelector;
pub use transport::{HttpTransport, Transport, TransportError, TransportRequest, TransportResponse};
pub use types::{BackendConfig, GenerationError, GenerationResult, GenerationSettings};
