//! roster-server: employee roster service
//!
//! Opens (or creates) the SQLite database, wires the configured feed into the
//! import pipeline and serves the HTTP API until Ctrl-C.

use anyhow::{Context, Result};
use clap::Parser;
use roster_common::config::{RosterConfig, TomlConfig};
use roster_common::db::init_database;
use roster_server::cli::Args;
use roster_server::db::SqliteEmployeeStore;
use roster_server::import::feed_for;
use roster_server::{build_router, AppState};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // A broken config file should fail before anything else starts
    let toml = TomlConfig::load_optional(args.config.as_deref())?;
    let config = RosterConfig::resolve(&args.overrides(), toml.as_ref());

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.as_str().into()),
        )
        .init();

    // Build identification first, before any database delay
    info!(
        "Starting roster-server v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    info!("Root folder: {}", config.root_folder.display());
    info!("Database path: {}", config.database_path.display());
    info!("Employee feed: {}", config.feed);

    let pool = init_database(&config.database_path)
        .await
        .with_context(|| format!("opening {}", config.database_path.display()))?;
    info!("✓ Database ready");

    let store = Arc::new(SqliteEmployeeStore::new(pool));
    let state = AppState::new(store, feed_for(&config.feed));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("binding {}", config.bind))?;
    info!("roster-server listening on http://{}", config.bind);
    info!("Health check: http://{}/health", config.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("roster-server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}
