use anyhow::{Context, Result};
use nbdrop_core::Config;
use nbdrop_storage::{create_mirror, LocalStore, Mirror};
use std::sync::Arc;

/// Create the local store and the process-wide remote mirror.
pub async fn setup_storage(config: &Config) -> Result<(LocalStore, Arc<dyn Mirror>)> {
    let store = LocalStore::new(&config.save_dir)
        .await
        .context("Failed to initialize local store")?;

    let mirror = create_mirror(&config.mirror).await;

    tracing::info!(
        save_dir = %store.base_path().display(),
        mirror = mirror.backend_name(),
        mirror_enabled = mirror.is_enabled(),
        "Storage initialized"
    );

    Ok((store, mirror))
}
