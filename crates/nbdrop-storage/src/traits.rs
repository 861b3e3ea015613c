//! Storage errors and the remote mirror trait

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

/// Local store operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Remote mirror failures. These are logged by the mirror and never returned
/// through [`Mirror::upload`].
#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("Invalid service account credentials: {0}")]
    Credentials(String),

    #[error("Failed to build Drive client: {0}")]
    Client(String),

    #[error("Destination folder not configured (GOOGLE_DRIVE_FOLDER_ID)")]
    MissingFolder,

    #[error("Failed to read local file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Drive API error: {0}")]
    Api(String),
}

/// Copy of a stored file held by the remote service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFile {
    pub id: String,
    pub web_view_link: Option<String>,
}

/// Best-effort secondary copy of stored files.
///
/// Implementations are built once at startup and shared read-only between
/// requests. `upload` blocks the calling request until the remote call
/// finishes; every failure is logged and reported as `None`.
#[async_trait]
pub trait Mirror: Send + Sync {
    /// Copy the file at `local_path` to the remote folder under `filename`.
    async fn upload(&self, local_path: &Path, filename: &str) -> Option<RemoteFile>;

    /// Whether uploads can reach a remote service at all.
    fn is_enabled(&self) -> bool;

    /// Backend name for logs and health output.
    fn backend_name(&self) -> &'static str;
}
