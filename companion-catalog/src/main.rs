//! companion-catalog - course catalog aggregation service
//!
//! Serves the joined course catalog of a Companion back end over HTTP.
//! Settings resolve CLI → environment → TOML → defaults.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use companion_common::config::{
    default_config_path, load_toml_config, resolve_base_url, resolve_token, TomlConfig,
    DEFAULT_PORT,
};
use companion_catalog::fetch::HttpRecordFetcher;
use companion_catalog::{build_router, AppState};
use tower_http::trace::TraceLayer;
use tracing::info;

const MODULE_NAME: &str = "companion-catalog";

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "companion-catalog")]
#[command(about = "Course catalog aggregation service")]
#[command(version)]
struct Args {
    /// Base address of the REST back end
    #[arg(short, long)]
    base_url: Option<String>,

    /// Bearer credential forwarded to the back end
    #[arg(long)]
    token: Option<String>,

    /// HTTP port to listen on
    #[arg(short, long, env = "COMPANION_CATALOG_PORT")]
    port: Option<u16>,

    /// Path to the TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config is read before tracing so the log level can come from TOML
    let config_path = args.config.clone().or_else(|| default_config_path(MODULE_NAME));
    let toml_config = match &config_path {
        Some(path) => load_toml_config(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => TomlConfig::default(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&toml_config.logging.level)),
        )
        .init();

    info!(
        "Starting Companion Catalog (companion-catalog) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let base_url = resolve_base_url(args.base_url.as_deref(), &toml_config);
    let credential = resolve_token(args.token.as_deref(), &toml_config);
    let port = args.port.or(toml_config.port).unwrap_or(DEFAULT_PORT);

    info!("Back end: {}", base_url);
    if credential.is_some() {
        info!("Bearer credential configured");
    }

    let fetcher = HttpRecordFetcher::new().context("Failed to create HTTP client")?;
    let state = AppState::new(Arc::new(fetcher), base_url, credential);
    let app = build_router(state).layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("companion-catalog listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("companion-catalog stopped");
    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    info!("Shutdown signal received");
}
