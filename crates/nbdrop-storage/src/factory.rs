#[cfg(feature = "mirror-drive")]
use crate::DriveMirror;
use crate::{Mirror, RemoteFile};
use async_trait::async_trait;
use nbdrop_core::MirrorConfig;
use std::path::Path;
use std::sync::Arc;

/// Mirror used when no credentials are configured. Every upload is a no-op.
#[derive(Clone, Copy, Debug, Default)]
pub struct DisabledMirror;

#[async_trait]
impl Mirror for DisabledMirror {
    async fn upload(&self, _local_path: &Path, filename: &str) -> Option<RemoteFile> {
        tracing::debug!(filename = %filename, "Drive mirror disabled, skipping upload");
        None
    }

    fn is_enabled(&self) -> bool {
        false
    }

    fn backend_name(&self) -> &'static str {
        "disabled"
    }
}

/// Create the process-wide mirror from configuration.
///
/// The inline key wins over the key file. Without either, or when the client
/// cannot be built, the mirror is disabled for the process lifetime.
pub async fn create_mirror(config: &MirrorConfig) -> Arc<dyn Mirror> {
    #[cfg(feature = "mirror-drive")]
    {
        let built = if let Some(ref json) = config.service_account_json {
            Some((
                "environment",
                DriveMirror::from_service_account_json(json, config.folder_id.clone()).await,
            ))
        } else if let Some(path) = existing_key_file(config).await {
            Some((
                "local file",
                DriveMirror::from_service_account_file(path, config.folder_id.clone()).await,
            ))
        } else {
            None
        };

        match built {
            Some((source, Ok(mirror))) => {
                if config.folder_id.is_none() {
                    tracing::warn!("GOOGLE_DRIVE_FOLDER_ID not set, Drive uploads will be skipped");
                }
                tracing::info!(source, "Google Drive client initialized");
                Arc::new(mirror)
            }
            Some((source, Err(e))) => {
                tracing::error!(error = %e, source, "Failed to initialize Google Drive");
                Arc::new(DisabledMirror)
            }
            None => {
                tracing::warn!("No credentials found, skipping Drive upload");
                Arc::new(DisabledMirror)
            }
        }
    }

    #[cfg(not(feature = "mirror-drive"))]
    {
        let _ = config;
        tracing::warn!("Drive mirror not available (mirror-drive feature not enabled)");
        Arc::new(DisabledMirror)
    }
}

#[cfg(feature = "mirror-drive")]
async fn existing_key_file(config: &MirrorConfig) -> Option<&Path> {
    let path = config.service_account_file.as_deref()?;
    if tokio::fs::try_exists(path).await.unwrap_or(false) {
        Some(path)
    } else {
        None
    }
}
