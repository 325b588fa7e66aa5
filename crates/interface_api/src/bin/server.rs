//! Sales document generator - HTTP server binary
//!
//! # Usage
//!
//! ```bash
//! API_DATABASE_URL=postgres://localhost/sales_docs \
//! API_TEMPLATE_DIR=./templates \
//! cargo run --bin sales-docs
//! ```
//!
//! # Environment Variables
//!
//! * `API_HOST` / `API_PORT` - bind address (default: 0.0.0.0:8080)
//! * `API_DATABASE_URL` (or `DATABASE_URL`) - PostgreSQL connection string
//! * `API_TEMPLATE_DIR` - directory with `proposta.docx` and `contrato.docx`
//! * `API_WORK_DIR` - intermediate files (default: system temp directory)
//! * `API_CONVERTER_ENABLED`, `API_CONVERTER_PROGRAM`, `API_CONVERTER_TIMEOUT_SECS`
//! * `API_FALLBACK_TO_DOCX` - serve the DOCX when conversion fails (default: true)
//! * `API_TIMEZONE` - IANA timezone for document dates (default: America/Sao_Paulo)
//! * `API_RETENTION_DAYS`, `API_LIST_LIMIT`
//! * `API_LOG_LEVEL` - trace, debug, info, warn, error (default: info)

use anyhow::Context;
use infra_db::{create_pool, run_migrations, DatabaseConfig, PgSubmissionLedger};
use interface_api::{config::ApiConfig, create_router, AppState};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = load_config()?;
    init_tracing(&config.log_level);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        template_dir = %config.template_dir.display(),
        converter = config.converter_enabled,
        "Starting sales document server"
    );

    let pool = create_pool(DatabaseConfig::new(&config.database_url))
        .await
        .context("connecting to the submission database")?;
    run_migrations(&pool).await.context("applying migrations")?;

    let ledger = Arc::new(PgSubmissionLedger::new(pool));
    let addr: SocketAddr = config.server_addr().parse().context("parsing bind address")?;
    let state = AppState::from_config(config, ledger).context("building document service")?;
    let app = create_router(state);

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Loads configuration, honouring the conventional `DATABASE_URL`
fn load_config() -> anyhow::Result<ApiConfig> {
    let mut config = ApiConfig::from_env().context("reading API_* configuration")?;
    if std::env::var("API_DATABASE_URL").is_err() {
        if let Ok(url) = std::env::var("DATABASE_URL") {
            config.database_url = url;
        }
    }
    Ok(config)
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Waits for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
