pub mod api;
pub mod config;
pub mod core_state;
pub mod crypto;
pub mod db;
pub mod models;
pub mod services;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::config::{ConfigError, ServerConfig};
use crate::core_state::{CoreError, CoreState};

/// Failures that stop the server from starting.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Database error: {0}")]
    Core(#[from] CoreError),
    #[error("Seeding failed: {0}")]
    Seed(#[from] services::ServiceError),
    #[error("Server error: {0}")]
    Server(#[from] api::ServerError),
}

/// Install the global `tracing` subscriber. `RUST_LOG` overrides the
/// default filter.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}

/// Read configuration, open the database, seed reference data and serve
/// until Ctrl-C.
pub async fn run() -> Result<(), StartupError> {
    let config = ServerConfig::from_env()?;
    tracing::info!(
        "{} starting v{} (db: {})",
        config::APP_NAME,
        config::APP_VERSION,
        config.db_path.display()
    );

    let core = Arc::new(CoreState::open(&config.db_path)?);

    if config.seed_reference_data {
        let conn = core.lock_db()?;
        services::seed::seed_reference_data(&conn)?;
    }

    let server =
        api::start_api_server_on(core, config.bind_addr, config.cors_origin.as_deref()).await?;
    tracing::info!(addr = %server.addr, "Listening");

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {e}");
    }
    server.shutdown().await;
    Ok(())
}
