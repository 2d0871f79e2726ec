//! Job Listings Server - Main Entry Point

mod config;
mod logging;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use joblist_api_http::{HttpServer, HttpServerConfig};
use joblist_core::port::time_provider::SystemTimeProvider;
use joblist_core::JobService;
use joblist_infra_sqlite::{create_pool_with, run_migrations, SqliteJobRepository};

use crate::config::{database_file, Settings};

#[derive(Debug, Parser)]
#[command(name = "joblist-server", version, about = "Job listings REST API server")]
struct Args {
    /// TOML settings file
    #[arg(long, env = "JOBLIST_CONFIG")]
    config: Option<PathBuf>,

    /// Listen port (overrides settings)
    #[arg(long)]
    port: Option<u16>,

    /// SQLite URL, e.g. sqlite://jobs.db (overrides settings)
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load configuration
    let args = Args::parse();
    let mut settings =
        Settings::load(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(port) = args.port {
        settings.http.port = port;
    }
    if let Some(url) = args.database_url {
        settings.database_url = Some(url);
    }

    // 2. Initialize logging
    let _log_guard = logging::init(&settings.log)?;

    info!(
        version = joblist_core::VERSION,
        environment = ?settings.environment,
        "Job listings server starting..."
    );

    // 3. Initialize database
    let database_url = settings.database_url();
    let db_file = database_file(&database_url);
    if let Some(parent) = db_file
        .as_deref()
        .and_then(|file| file.parent())
        .filter(|dir| !dir.as_os_str().is_empty())
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create database directory {}", parent.display()))?;
    }

    info!(database_url = %database_url, "Initializing database...");
    let pool = create_pool_with(&database_url, settings.database_max_connections)
        .await
        .context("DB pool creation failed")?;
    run_migrations(&pool).await.context("Migration failed")?;

    // 4. Setup dependencies (DI wiring)
    let repo = Arc::new(SqliteJobRepository::new(pool.clone()));
    let service = Arc::new(JobService::new(
        repo.clone(),
        repo,
        Arc::new(SystemTimeProvider),
    ));

    // 5. Start HTTP server
    let http_config = HttpServerConfig {
        host: settings.http.host.clone(),
        port: settings.http.port,
    };
    let mut server = HttpServer::new(http_config, service)
        .start()
        .await
        .context("HTTP server start failed")?;

    info!(url = %server.base_url(), "Server ready. Press Ctrl+C to shutdown");

    // 6. Wait for shutdown signal
    shutdown_signal().await?;
    info!("Shutdown signal received. Exiting gracefully...");

    // 7. Graceful shutdown
    server.stop();
    server.stopped().await.context("HTTP server failed")?;
    pool.close().await;

    info!("Shutdown complete.");
    Ok(())
}

#[cfg(unix)]
async fn shutdown_signal() -> Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = signal(SignalKind::terminate()).context("Failed to listen for SIGTERM")?;
    tokio::select! {
        result = tokio::signal::ctrl_c() => result.context("Failed to listen for Ctrl+C")?,
        _ = terminate.recv() => {}
    }
    Ok(())
}

#[cfg(not(unix))]
async fn shutdown_signal() -> Result<()> {
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl+C")
}
