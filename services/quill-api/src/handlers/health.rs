//! Public health endpoint.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::state::AppState;

/// Health response: service status, default backend and which backends are
/// configured. Never includes credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub default_backend: String,
    pub backends: BTreeMap<String, bool>,
}

pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    debug!("Health check requested");

    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        default_backend: state.generation.default_backend().to_string(),
        backends: state
            .generation
            .selector()
            .availability()
            .into_iter()
            .map(|(kind, available)| (kind.to_string(), available))
            .collect(),
    })
}
