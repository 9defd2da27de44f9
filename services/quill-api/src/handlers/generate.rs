//! Text generation endpoint.

use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use quill_core::RequestContext;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{error::ApiError, state::AppState};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub prompt: String,
    /// Backend name; the configured default is used when absent.
    #[serde(default)]
    pub backend: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub backend: String,
    pub text: String,
}

pub async fn generate_handler(
    State(state): State<AppState>,
    Extension(context): Extension<RequestContext>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let Json(request) = payload?;

    info!(
        request_id = context.request_id(),
        user_id = %context.identity().principal().user_id,
        backend = request.backend.as_deref().unwrap_or(state.generation.default_backend()),
        "Generation requested"
    );

    let generated = state
        .generation
        .generate(request.backend.as_deref(), &request.prompt)
        .await?;

    Ok(Json(GenerateResponse {
        backend: generated.backend.to_string(),
        text: generated.text,
    }))
}
