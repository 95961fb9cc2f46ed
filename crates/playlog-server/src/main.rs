//! playlog-server - endpoint receiving relayed playback events

use anyhow::{Context, Result};
use clap::Parser;
use playlog_core::PlaylogConfig;
use playlog_server::{build_router, AppState};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Playlog endpoint server
#[derive(Parser)]
#[command(name = "playlog-server")]
#[command(version)]
#[command(about = "Receives relayed playback events and writes audit records", long_about = None)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long, env = "PLAYLOG_CONFIG")]
    config: Option<PathBuf>,

    /// Listen address, overrides the configuration
    #[arg(short, long)]
    bind: Option<String>,

    /// Enable debug output
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    if cli.json_logs {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    info!(version = env!("CARGO_PKG_VERSION"), "Starting playlog-server");

    let mut config = match cli.config {
        Some(ref path) => PlaylogConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => PlaylogConfig::default(),
    };
    config.apply_env();
    if let Some(bind) = cli.bind {
        config.server.bind = bind;
    }
    config.validate()?;

    info!(
        contexts = config.contexts.len(),
        users = config.users.len(),
        "Configuration ready"
    );

    let app = build_router(AppState::from_config(&config));

    let listener = tokio::net::TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("binding {}", config.server.bind))?;
    info!("playlog-server listening on http://{}", config.server.bind);

    axum::serve(listener, app).await?;

    Ok(())
}
