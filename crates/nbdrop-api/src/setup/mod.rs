//! Application setup and initialization

pub mod routes;
pub mod server;
pub mod storage;

use crate::state::AppState;
use anyhow::{Context, Result};
use nbdrop_core::Config;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    config.validate().context("Configuration validation failed")?;

    tracing::info!(
        environment = %config.environment,
        save_dir = %config.save_dir.display(),
        "Configuration loaded and validated successfully"
    );

    let (store, mirror) = storage::setup_storage(&config).await?;

    let state = Arc::new(AppState::new(config.clone(), store, mirror));

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
