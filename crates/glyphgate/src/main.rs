//! # Glyphgate - Image Recognition Gateway
//!
//! Accepts an image by URL, inline Base64, or pre-uploaded file id, hands it
//! to an upstream multimodal chat-completion model, and returns a classified
//! result (captcha code or formatted text/math).
//!
//! ## Architecture
//! ```text
//! Caller → Glyphgate → Upstream file store (upload)
//!                   ↘ Upstream chat completion (recognize)
//! ```
//!
//! Stateless: nothing survives a request.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod config;
mod credential;
mod pipeline;
mod routes;
mod state;
mod upstream;

use config::AppConfig;
use state::AppState;

/// Glyphgate - image recognition gateway
#[derive(Parser, Debug)]
#[command(name = "glyphgate")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config/glyphgate.toml")]
    config: String,

    /// Listen address (overrides config)
    #[arg(short, long, env = "LISTEN_ADDR")]
    listen: Option<String>,

    /// Upstream base URL (overrides config)
    #[arg(long, env = "UPSTREAM_URL")]
    upstream_url: Option<String>,

    /// Upstream model identifier (overrides config)
    #[arg(long, env = "UPSTREAM_MODEL")]
    model: Option<String>,

    /// Upstream call timeout in seconds (overrides config)
    #[arg(long, env = "UPSTREAM_TIMEOUT_SECS")]
    upstream_timeout: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "LOG_LEVEL")]
    log_level: String,

    /// Enable JSON logging output
    #[arg(long, default_value = "false")]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(&args.log_level, args.json_logs)?;

    info!("Starting Glyphgate v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = AppConfig::load(&args.config, &args)?;
    info!(
        upstream = %config.upstream.base_url,
        model = %config.upstream.model,
        "Configuration loaded from {}",
        args.config
    );

    // Initialize application state
    let state = AppState::new(config.clone())?;

    // Build router
    let app = routes::create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.listen_addr))?;
    info!("Glyphgate listening on {}", config.listen_addr);

    // Handle graceful shutdown
    let shutdown_signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
        info!("Shutdown signal received");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await
        .context("Server error")?;

    info!("Glyphgate shutdown complete");
    Ok(())
}

/// Initialize structured logging with tracing
fn init_logging(level: &str, json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .try_init()
            .context("Failed to initialize logging")?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_thread_ids(true))
            .try_init()
            .context("Failed to initialize logging")?;
    }

    Ok(())
}
