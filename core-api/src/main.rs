//! folio-server: HTTP front end for the content sync service
//!
//! Reads configuration from flags or `FOLIO_*` environment variables, opens
//! the database, starts the interval scheduler and serves the API until
//! Ctrl-C.

use anyhow::{Context, Result};
use clap::Parser;
use core_api::{build_router, AppState};
use core_runtime::{init_logging, AppConfig, LogFormat, LogLevel, LoggingConfig};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "folio-server")]
#[command(about = "Portfolio content sync service")]
#[command(version)]
struct Args {
    /// SQLite database file
    #[arg(long, env = "FOLIO_DATABASE_PATH", default_value = "folio.db")]
    database_path: PathBuf,

    /// Address to listen on
    #[arg(long, env = "FOLIO_BIND_ADDRESS", default_value = "127.0.0.1:8787")]
    bind_address: String,

    /// 64 hex characters used to encrypt stored credentials
    #[arg(long, env = "FOLIO_CREDENTIAL_KEY", hide_env_values = true)]
    credential_key: String,

    /// Timeout for each provider request, in seconds
    #[arg(long, env = "FOLIO_PROVIDER_TIMEOUT_SECS", default_value_t = 30)]
    provider_timeout_secs: u64,

    /// Scheduled Google Drive sync interval in seconds; off when unset
    #[arg(long, env = "FOLIO_PHOTO_SYNC_INTERVAL_SECS")]
    photo_sync_interval_secs: Option<u64>,

    /// Scheduled YouTube sync interval in seconds; off when unset
    #[arg(long, env = "FOLIO_VIDEO_SYNC_INTERVAL_SECS")]
    video_sync_interval_secs: Option<u64>,

    /// pretty, json or compact
    #[arg(long, env = "FOLIO_LOG_FORMAT", default_value = "pretty")]
    log_format: LogFormat,

    /// trace, debug, info, warn or error
    #[arg(long, env = "FOLIO_LOG_LEVEL", default_value = "info")]
    log_level: LogLevel,
}

impl Args {
    fn into_config(self) -> Result<AppConfig> {
        let logging = LoggingConfig::default()
            .with_format(self.log_format)
            .with_level(self.log_level);

        AppConfig::builder()
            .database_path(self.database_path)
            .bind_address(self.bind_address)
            .credential_key_hex(self.credential_key)
            .provider_timeout(Duration::from_secs(self.provider_timeout_secs))
            .photo_sync_interval(self.photo_sync_interval_secs.map(Duration::from_secs))
            .video_sync_interval(self.video_sync_interval_secs.map(Duration::from_secs))
            .logging(logging)
            .build()
            .context("Invalid configuration")
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Args::parse().into_config()?;

    init_logging(config.logging.clone()).context("Failed to initialize logging")?;

    info!(
        "Starting folio-server v{} on {}",
        env!("CARGO_PKG_VERSION"),
        config.bind_address
    );

    let bind_address = config.bind_address;
    let core = core_service::bootstrap(config)
        .await
        .context("Failed to initialize core service")?;

    let scheduler = core.scheduler().start();
    info!(schedules = scheduler.task_count(), "Sync scheduler started");

    let app = build_router(AppState::new(core));

    let listener = tokio::net::TcpListener::bind(bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;
    info!("Listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    scheduler.shutdown();
    info!("Shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
