//! # IMS API Server Entry Point
//!
//! ## Startup Sequence
//! 1. Initialize tracing (logging)
//! 2. Load configuration
//! 3. Connect to database & run migrations
//! 4. Build router and serve until Ctrl+C / SIGTERM
//! 5. Close the pool

use anyhow::Context;
use ims_api::{build_app, ApiConfig, AppState};
use ims_db::Database;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    info!("Starting IMS API server...");

    let config = ApiConfig::load().context("loading configuration")?;
    info!(
        bind_addr = %config.bind_addr,
        database = %config.database_path,
        allow_sell_last_unit = config.allow_sell_last_unit,
        "Configuration loaded"
    );
    if config.uses_dev_secret() {
        warn!("IMS_JWT_SECRET is not set, using the development secret");
    }

    let db = Database::new(config.db_config())
        .await
        .with_context(|| format!("opening database {}", config.database_path))?;
    info!("Database ready");

    let state = AppState::new(db.clone(), config.stock_policy(), &config.jwt_secret);
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.bind_addr))?;
    info!(addr = %config.bind_addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=ims_db=trace` - Show trace for the database crate only
/// - Default: `info,ims=debug,sqlx=warn`
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,ims=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
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
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
