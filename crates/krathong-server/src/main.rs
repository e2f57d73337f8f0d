//! Krathong Server
//!
//! Entry point for the Krathong HTTP service: loads configuration, connects
//! the store and the broker, and serves the API until a shutdown signal.

mod config;
mod telemetry;

use anyhow::{Context, Result};
use clap::Parser;
use krathong_api::build_api_server;
use krathong_db::{
    close_pool, create_pool, ConnectionSettings, MySqlKrathongRepository, MySqlPool,
    NatsEventPublisher, NatsPublisherConfig, PoolConfig,
};
use krathong_service::{DefaultKrathongService, KrathongService};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

use crate::config::Settings;
use crate::telemetry::TelemetryConfig;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding the `.env.<environment>` files
    #[arg(short, long, env = "CONFIG_DIR", default_value = "config")]
    config_dir: String,

    /// Deployment environment label (dev, prod, ...)
    #[arg(short, long, env = "APP_ENV", default_value = "dev")]
    environment: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let settings = Settings::load(&args.config_dir, &args.environment).with_context(|| {
        format!(
            "Failed to load configuration from {}",
            Settings::env_file_path(&args.config_dir, &args.environment).display()
        )
    })?;

    telemetry::init_with_config(TelemetryConfig::from(&settings.logging))
        .context("Failed to initialize logging")?;

    info!("Starting Krathong Server");
    info!("Environment: {}", args.environment);
    info!("Publish mode: {}", settings.broker.publish_mode);

    let pool = setup_database(&settings).await?;
    let publisher = Arc::new(setup_publisher(&settings).await?);

    let repository = Arc::new(MySqlKrathongRepository::new(pool.clone()));
    let services: Arc<dyn KrathongService> = Arc::new(DefaultKrathongService::new(
        repository,
        publisher.clone(),
        settings.broker.publish_mode,
    ));

    let app = build_api_server(services);

    let addr: SocketAddr = settings
        .bind_address()
        .parse()
        .context("Invalid HTTP bind address")?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind HTTP server")?;

    info!("HTTP Server listening on http://{}", addr);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP Server error")?;

    if let Err(e) = publisher.as_ref().clone().close().await {
        warn!("Failed to flush publisher: {}", e);
    }
    close_pool(pool).await;

    info!("Server shutdown complete");
    Ok(())
}

/// Setup database connection pool
async fn setup_database(settings: &Settings) -> Result<MySqlPool> {
    let db = &settings.database;
    let connection =
        ConnectionSettings::new(&db.user, &db.password, &db.database, &db.host, db.port);

    info!("Connecting to database: {}", connection.redacted());

    let pool_config = PoolConfig::new(connection)
        .run_migrations(db.run_migrations)
        .enable_logging(settings.logging.level.contains("debug"));

    let pool = create_pool(&pool_config)
        .await
        .context("Failed to create database connection pool")?;

    info!("Database connection established");
    Ok(pool)
}

/// Setup the broker client
///
/// The client is created in every publish mode so that switching modes only
/// takes a restart with a different `PUBLISH_MODE`.
async fn setup_publisher(settings: &Settings) -> Result<NatsEventPublisher> {
    let config = NatsPublisherConfig::new(&settings.broker.address, &settings.broker.topic);

    NatsEventPublisher::new(config)
        .await
        .context("Failed to create broker publisher")
}

/// Wait for SIGTERM or SIGINT (Ctrl+C)
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
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
