//! AgriSync Server - agricultural prediction API
//!
//! Serves soil and plant disease classification, crop price forecasts and
//! weather outlooks over HTTP.
//!
//! # Usage
//! ```sh
//! MODELS_DIR=models PORT=8000 cargo run --bin server
//! ```
//!
//! # Environment Variables
//! - `PORT` / `HOST` - Bind address (default: 0.0.0.0:8000)
//! - `MODELS_DIR` - Model artifacts (default: models)
//! - `PRELOAD_MODELS` - Load every model before accepting requests (default: true)

use agrisync::application::ModelRegistry;
use agrisync::config::Config;
use agrisync::interfaces::http::{AppState, ROUTES, build_router};
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{Level, info, warn};
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Port to listen on (overrides PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Interface to bind (overrides HOST)
    #[arg(long)]
    host: Option<String>,

    /// Directory holding model artifacts (overrides MODELS_DIR)
    #[arg(short, long)]
    models_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .init();

    let cli = Cli::parse();

    info!("AgriSync Server {} starting...", env!("CARGO_PKG_VERSION"));

    let mut config = Config::from_env()?;
    if let Some(port) = cli.port {
        config.port = port;
        if std::env::var("PUBLIC_BASE_URL").is_err() {
            config.public_base_url = format!("http://localhost:{}", port);
        }
    }
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(models_dir) = cli.models_dir {
        config.models_dir = models_dir;
    }
    info!(
        "Configuration loaded: models={:?}, data={:?}, graphs={:?}",
        config.models_dir, config.data_dir, config.graph_dir
    );

    for dir in [&config.models_dir, &config.graph_dir] {
        std::fs::create_dir_all(dir).with_context(|| format!("Failed to create {:?}", dir))?;
    }

    let bind_address = config.bind_address();
    let preload = config.preload_models;
    let registry = Arc::new(ModelRegistry::new(config));

    if preload {
        let registry = Arc::clone(&registry);
        if let Err(e) = tokio::task::spawn_blocking(move || registry.preload()).await {
            warn!("Model pre-loading failed: {}", e);
        }
    } else {
        info!("Model pre-loading disabled, models load on first use.");
    }

    let app = build_router(AppState::new(registry));

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;
    info!("Listening on http://{}", bind_address);
    for route in ROUTES {
        info!("  {}", route);
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Shutdown complete.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received. Exiting...");
}
