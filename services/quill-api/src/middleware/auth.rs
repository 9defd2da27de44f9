//! Bearer credential authentication middleware

use axum::{
    extract::Request,
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use quill_auth::CredentialResolver;
use quill_core::RequestContext;
use quill_service::metrics::record_auth_attempt;
use std::sync::Arc;
use tower_http::request_id::RequestId;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::ApiError;

/// Resolves the `Authorization` header and attaches a [`RequestContext`].
///
/// Requests without a resolvable credential never reach the handler.
pub async fn auth_middleware(
    resolver: Arc<CredentialResolver>,
    mut request: Request,
    next: Next,
) -> Response {
    // A header that is not valid visible ASCII is treated like no credential.
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    match resolver.resolve(header).await {
        Ok(identity) => {
            record_auth_attempt(identity.scheme().as_str(), "success");
            let context = RequestContext::new(request_id(&request), identity);
            debug!(
                request_id = %context.request_id(),
                scheme = context.identity().scheme().as_str(),
                path = request.uri().path(),
                "Request authenticated"
            );
            request.extensions_mut().insert(context);
            next.run(request).await
        }
        Err(err) => {
            record_auth_attempt("none", err.code());
            warn!(
                code = err.code(),
                path = request.uri().path(),
                "Rejected request credential"
            );
            ApiError::from(err).into_response()
        }
    }
}

/// The id assigned by `SetRequestIdLayer`, or a fresh one when the
/// middleware runs without it.
fn request_id(request: &Request) -> String {
    request
        .extensions()
        .get::<RequestId>()
        .and_then(|id| id.header_value().to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}
