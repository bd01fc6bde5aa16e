//! nfx-ai - NeuroFleetX AI Microservice
//!
//! Route optimization, predictive maintenance and vehicle recommendation
//! for the NeuroFleetX fleet-management product.
//!
//! Default port: 5000

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use nfx_common::config::{load_toml_config, resolve_config_path, ConfigOverrides, ServiceConfig};
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use nfx_ai::{build_router, AppState};

const MODULE_NAME: &str = "nfx-ai";

/// Command-line arguments for nfx-ai
#[derive(Parser, Debug)]
#[command(name = "nfx-ai")]
#[command(about = "NeuroFleetX AI microservice")]
#[command(version)]
struct Args {
    /// Interface to bind
    #[arg(long, env = "NFX_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "NFX_PORT")]
    port: Option<u16>,

    /// Log level when RUST_LOG is unset (trace, debug, info, warn, error)
    #[arg(long, env = "NFX_LOG_LEVEL")]
    log_level: Option<String>,

    /// TOML configuration file (default: <config dir>/neurofleetx/nfx-ai.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = resolve_config_path(args.config.as_deref(), MODULE_NAME);
    let toml = match &config_path {
        Some(path) => load_toml_config(path).context("Failed to load configuration file")?,
        None => None,
    };

    let config = ServiceConfig::resolve(
        ConfigOverrides {
            host: args.host,
            port: args.port,
            log_level: args.log_level,
        },
        toml,
    )
    .context("Invalid configuration")?;

    // RUST_LOG wins over the configured level
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "nfx_ai={level},nfx_common={level},tower_http={level}",
                level = config.log_level
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting NeuroFleetX AI Microservice (nfx-ai) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    match &config_path {
        Some(path) => info!("Config file: {}", path.display()),
        None => info!("No config directory available, using defaults"),
    }

    let app = build_router(AppState::new());

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("nfx-ai listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
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
