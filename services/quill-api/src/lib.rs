pub mod error;
pub mod handlers;
pub mod middleware;
pub mod rest;
pub mod state;
pub mod telemetry;

pub use error::{ApiError, ErrorBody};
pub use rest::build_router;
pub use state::AppState;

use quill_auth::{CredentialResolver, MemoryCredentialStore};
use quill_core::CoreError;
use quill_llm::{BackendSelector, HttpTransport, TransportError};
use quill_service::{Config, GenerationService};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

/// Errors that stop the server from starting or running.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("failed to load credential seed: {0}")]
    Seed(#[from] CoreError),

    #[error("failed to build HTTP transport: {0}")]
    Transport(#[from] TransportError),

    #[error("invalid bind address `{address}`: {source}")]
    Address {
        address: String,
        source: std::net::AddrParseError,
    },

    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Builds application state from configuration.
///
/// The credential store is seeded from `auth.seed_file` when set, and is
/// empty otherwise.
pub fn build_state(config: &Config) -> Result<AppState, ServerError> {
    let store = match &config.auth.seed_file {
        Some(path) => MemoryCredentialStore::from_seed_file(path)?,
        None => {
            warn!("No credential seed configured; every protected request will be rejected");
            MemoryCredentialStore::new()
        }
    };
    let store = Arc::new(store);
    let resolver = CredentialResolver::new(store.clone(), store);

    let transport = HttpTransport::new(Duration::from_secs(config.server.request_timeout_seconds))?;
    let selector = BackendSelector::new(config.generation.clone(), Arc::new(transport));

    for (kind, available) in selector.availability() {
        info!(backend = kind.as_str(), available, "Generation backend configured");
    }

    Ok(AppState::new(resolver, GenerationService::new(selector)))
}

/// Boots the Quill REST API and serves until shutdown.
pub async fn run_server(config: Config) -> Result<(), ServerError> {
    let state = build_state(&config)?;
    let app = rest::build_router(state);

    let address = format!("{}:{}", config.server.host, config.server.port);
    let addr: SocketAddr = address
        .parse()
        .map_err(|source| ServerError::Address { address, source })?;

    info!("Starting Quill API server on {}", addr);
    let listener = TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Quill API server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "Failed to install CTRL+C signal handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(error = %err, "Failed to install SIGTERM signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received CTRL+C signal, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM signal, initiating graceful shutdown");
        }
    }
}
