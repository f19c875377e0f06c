//! Application setup and initialization
//!
//! Everything `main` needs to turn a `Config` into a served router lives
//! here, so tests can assemble the same pieces around in-memory doubles.

pub mod database;
pub mod routes;
pub mod server;
pub mod storage;

use crate::state::{AppState, DbState};
use anyhow::{Context, Result};
use photomart_core::Config;
use sqlx::PgPool;
use std::sync::Arc;

/// Initialize the entire application.
///
/// The pool is handed back separately so the caller can close it after the
/// server has drained.
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router, PgPool)> {
    config.validate().context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(config.is_production())?;

    tracing::info!(
        environment = %config.environment(),
        storage_backend = %config.storage_backend(),
        "Configuration loaded and validated successfully"
    );

    let pool = database::setup_database(&config).await?;
    let storage = storage::setup_storage(&config).await?;

    let state = Arc::new(AppState::new(
        config.clone(),
        DbState::postgres(pool.clone()),
        storage,
    ));

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router, pool))
}
