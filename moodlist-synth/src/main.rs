//! Moodlist Synth (moodlist-synth) - Main entry point
//!
//! HTTP service that turns a mood or theme into a catalog playlist.

use std::fs::OpenOptions;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use moodlist_common::config::{load_config, TomlConfig};
use moodlist_synth::config::resolve_model_api_key;
use moodlist_synth::services::{OpenRouterClient, SpotifyClient};
use moodlist_synth::types::{CatalogClient, ModelClient};
use moodlist_synth::{build_router, AppState, Synthesizer};

/// Command-line arguments for moodlist-synth
#[derive(Parser, Debug)]
#[command(name = "moodlist-synth")]
#[command(about = "Mood and theme playlist synthesis service")]
#[command(version)]
struct Args {
    /// Port to listen on (overrides the config file)
    #[arg(short, long, env = "MOODLIST_PORT")]
    port: Option<u16>,

    /// Path to the TOML config file
    #[arg(short, long, env = "MOODLIST_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_config(args.config.as_deref()).context("Failed to load configuration")?;
    init_tracing(&config)?;

    info!(
        "Starting Moodlist Synth (moodlist-synth) v{}",
        env!("CARGO_PKG_VERSION")
    );

    let api_key = resolve_model_api_key(&config)?;

    let model: Arc<dyn ModelClient> = Arc::new(
        OpenRouterClient::new(&config.model, api_key)
            .context("Failed to initialize model client")?,
    );
    info!(model = %config.model.model, "Model client initialized");

    let catalog: Arc<dyn CatalogClient> = Arc::new(
        SpotifyClient::new(&config.catalog).context("Failed to initialize catalog client")?,
    );

    let synthesizer = Arc::new(Synthesizer::new(
        model.clone(),
        catalog,
        &config.synthesis,
    ));
    let state = AppState::new(synthesizer, model, config.synthesis.default_target_size);
    let app = build_router(state);

    let port = args.port.unwrap_or(config.port);
    let addr = SocketAddr::from(([127, 0, 0, 1], port));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("moodlist-synth listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Initialize tracing
///
/// `RUST_LOG` wins over the configured level. When a log file is configured,
/// output goes to both stdout and the file.
fn init_tracing(config: &TomlConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    let file_layer = match &config.logging.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .boxed(),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .init();

    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
