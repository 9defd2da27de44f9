//! Error responses for the REST API.
//!
//! Every failure leaves the server as `{"status": .., "message": .., "code": ..}`.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use quill_auth::AuthError;
use quill_llm::GenerationError;
use serde::Serialize;
use tracing::warn;

/// JSON error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub status: u16,
    pub message: String,
    pub code: &'static str,
}

/// An error ready to be rendered as an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    code: &'static str,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>, code: &'static str) -> Self {
        Self {
            status,
            message: message.into(),
            code,
        }
    }

    /// The single rejection used for both missing and invalid credentials.
    pub fn unauthenticated() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Unauthenticated.", "UNAUTHORIZED")
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn code(&self) -> &'static str {
        self.code
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingCredential | AuthError::InvalidCredential => Self::unauthenticated(),
            AuthError::StoreUnavailable(_) => Self::new(
                StatusCode::SERVICE_UNAVAILABLE,
                "Credential store unavailable.",
                err.code(),
            ),
        }
    }
}

impl From<GenerationError> for ApiError {
    fn from(err: GenerationError) -> Self {
        let status = match err {
            GenerationError::UnknownBackend { .. } => StatusCode::BAD_REQUEST,
            GenerationError::BackendUnconfigured { .. } => StatusCode::SERVICE_UNAVAILABLE,
            GenerationError::RequestFailed { .. }
            | GenerationError::UnexpectedResponse { .. }
            | GenerationError::Transport { .. } => StatusCode::BAD_GATEWAY,
        };
        Self::new(status, err.to_string(), err.code())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text(), "INVALID_REQUEST_BODY")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            warn!(status = %self.status, code = self.code, "Request failed");
        }

        let body = ErrorBody {
            status: self.status.as_u16(),
            message: self.message,
            code: self.code,
        };
        (self.status, Json(body)).into_response()
    }
}
