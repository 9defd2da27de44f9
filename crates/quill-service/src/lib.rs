//! Service layer for Quill: configuration, metrics and the instrumented
//! generation entry point shared by every front end.

pub mod config;
pub mod generation_service;
pub mod metrics;

pub use config::{AuthSettings, Config, ConfigError, LoggingConfig, ServerConfig};
pub use generation_service::{Generated, GenerationService};
