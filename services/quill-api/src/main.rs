use clap::Parser;
use quill_api::{run_server, telemetry};
use quill_service::Config;
use std::path::PathBuf;

/// Authenticated text generation API.
#[derive(Debug, Parser)]
#[command(name = "quill-api", version, about)]
struct Cli {
    /// Path to a TOML configuration file (default: ./config.toml if present)
    #[arg(short, long, env = "QUILL_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = telemetry::init_logging(&config.logging) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    if let Err(err) = run_server(config).await {
        tracing::error!(error = %err, "Server terminated with error");
        std::process::exit(1);
    }
}
