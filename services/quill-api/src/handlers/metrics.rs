//! Prometheus metrics endpoint handler

use axum::{http::header::CONTENT_TYPE, response::IntoResponse};
use quill_service::metrics::export_prometheus;

/// Returns all registered metrics in Prometheus text format.
pub async fn metrics_handler() -> impl IntoResponse {
    (
        [(CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        export_prometheus(),
    )
}
