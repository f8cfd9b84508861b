//! training-api - Main entry point
//!
//! Startup order: arguments, configuration, tracing, database, membership
//! client, HTTP server. Values given on the command line (or through their
//! environment variables) override the configuration file.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use training_api::{build_router, AppState, MembershipClient};
use training_common::config::load_config;
use training_common::db::init_database;

/// Command-line arguments for training-api
#[derive(Parser, Debug)]
#[command(name = "training-api")]
#[command(about = "Training records service (Syllabus, Class, Student)")]
#[command(version)]
struct Args {
    /// Configuration file (overrides TRAINING_CONFIG)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long, env = "TRAINING_PORT")]
    port: Option<u16>,

    /// SQLite database file
    #[arg(long, env = "TRAINING_DATABASE")]
    database: Option<PathBuf>,

    /// Base URL of the membership service
    #[arg(long, env = "TRAINING_MEMBERSHIP_URL")]
    membership_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Configuration is read before tracing starts so its log level applies
    let loaded = load_config(args.config.as_deref());
    let level = loaded
        .as_ref()
        .map(|loaded| loaded.config.logging.level.clone())
        .unwrap_or_else(|_| "info".to_string());
    let default_filter =
        format!("training_api={level},training_common={level},tower_http={level}");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting training-api v{}", env!("CARGO_PKG_VERSION"));

    let loaded = loaded.context("Failed to load configuration")?;
    loaded.log_source();
    let mut config = loaded.config;
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(database) = args.database {
        config.database_path = database;
    }
    if let Some(url) = args.membership_url {
        config.membership_url = url;
    }
    config.validate().context("Invalid configuration")?;

    info!("Database path: {}", config.database_path.display());
    info!("Membership service: {}", config.membership_url);

    let pool = match init_database(&config.database_path).await {
        Ok(pool) => {
            info!("✓ Database ready");
            pool
        }
        Err(e) => {
            error!("Failed to initialize database: {}", e);
            return Err(e.into());
        }
    };

    let timeout = config.membership_timeout_ms.map(Duration::from_millis);
    if timeout.is_none() {
        warn!("No membership_timeout_ms configured; membership calls wait indefinitely");
    }
    let directory = MembershipClient::new(&config.membership_url, timeout)
        .context("Failed to create membership client")?;

    let state = AppState::new(pool, Arc::new(directory), config.pagination);
    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", config.bind_addr, config.port)
        .parse()
        .context("Invalid bind address")?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    let addr = listener.local_addr().context("Failed to read bound address")?;
    info!("training-api listening on http://{}", addr);
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
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
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
                error!("Failed to install signal handler: {}", e);
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
