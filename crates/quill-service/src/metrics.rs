//! Prometheus metrics for Quill.
//!
//! Counters and histograms are registered in the default registry on first
//! use and exported in text format by [`export_prometheus`].

use lazy_static::lazy_static;
use prometheus::{register_counter_vec, register_histogram_vec, CounterVec, Encoder, HistogramVec, TextEncoder};

lazy_static! {
    /// Credential resolution attempts by scheme and outcome
    pub static ref AUTH_ATTEMPTS_TOTAL: CounterVec = register_counter_vec!(
        "quill_auth_attempts_total",
        "Credential resolution attempts",
        &["scheme", "outcome"]
    )
    .unwrap();

    /// Generation requests by backend and outcome (`ok` or an error code)
    pub static ref GENERATION_REQUESTS_TOTAL: CounterVec = register_counter_vec!(
        "quill_generation_requests_total",
        "Generation requests",
        &["backend", "outcome"]
    )
    .unwrap();

    /// Generation latency distribution (seconds), including backend round-trip
    pub static ref GENERATION_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "quill_generation_duration_seconds",
        "Generation latency in seconds",
        &["backend"],
        vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]
    )
    .unwrap();
}

/// Records one credential resolution attempt.
pub fn record_auth_attempt(scheme: &str, outcome: &str) {
    AUTH_ATTEMPTS_TOTAL
        .with_label_values(&[scheme, outcome])
        .inc();
}

/// Export all metrics in Prometheus text format.
pub fn export_prometheus() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .unwrap_or_else(|e| {
            tracing::error!("Failed to encode metrics: {}", e);
        });

    String::from_utf8(buffer).unwrap_or_else(|e| {
        tracing::error!("Failed to convert metrics to UTF-8: {}", e);
        String::from("# Error encoding metrics\n")
    })
}
