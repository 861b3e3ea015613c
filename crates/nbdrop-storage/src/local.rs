use crate::traits::{StorageError, StorageResult};
use bytes::Bytes;
use futures::Stream;
use futures::StreamExt;
use nbdrop_core::models::StoredFile;
use std::path::{Component, Path, PathBuf};
use std::pin::Pin;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Byte stream of a served file.
pub type FileStream = Pin<Box<dyn Stream<Item = Result<Bytes, StorageError>> + Send>>;

/// An opened stored file, ready to be streamed to a client.
pub struct ServedFile {
    pub filename: String,
    pub size_bytes: u64,
    pub stream: FileStream,
}

/// Flat local directory holding one file per upload.
///
/// There is no index besides the directory itself: `list` reads the directory
/// on every call. Writes to distinct names are independent; writes to the same
/// name are not coordinated and the last writer wins.
#[derive(Clone, Debug)]
pub struct LocalStore {
    base_path: PathBuf,
}

impl LocalStore {
    /// Create a new LocalStore, creating `base_path` if needed.
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStore { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Convert a storage name to a filesystem path.
    ///
    /// Only a single normal path component is accepted, so the result is
    /// always a direct child of the storage directory.
    fn key_to_path(&self, filename: &str) -> StorageResult<PathBuf> {
        if filename.is_empty() || filename.contains(['/', '\\', '\0']) {
            return Err(StorageError::InvalidKey(
                "Filename contains invalid characters".to_string(),
            ));
        }

        let mut components = Path::new(filename).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(self.base_path.join(filename)),
            _ => Err(StorageError::InvalidKey(
                "Filename must be a plain file name".to_string(),
            )),
        }
    }

    /// Path a stored file lives at (whether or not it exists yet).
    pub fn path_of(&self, filename: &str) -> StorageResult<PathBuf> {
        self.key_to_path(filename)
    }

    /// Write `data` under `filename`, replacing any existing file of that name.
    pub async fn write(&self, filename: &str, data: &[u8]) -> StorageResult<StoredFile> {
        let path = self.key_to_path(filename)?;
        let start = std::time::Instant::now();

        // The directory may have been removed since startup.
        fs::create_dir_all(&self.base_path).await?;

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(data).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            filename = %filename,
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local store write successful"
        );

        Ok(StoredFile {
            filename: filename.to_string(),
            path,
            size_bytes: data.len() as u64,
        })
    }

    /// Names of all stored files, sorted lexicographically.
    pub async fn list(&self) -> StorageResult<Vec<String>> {
        let mut entries = match fs::read_dir(&self.base_path).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(name) => {
                    tracing::debug!(name = ?name, "Skipping non UTF-8 filename in listing");
                }
            }
        }
        names.sort();

        Ok(names)
    }

    /// Open a stored file for streaming.
    ///
    /// Returns `InvalidKey` for names that could escape the storage directory
    /// and `NotFound` for files that do not exist.
    pub async fn open(&self, filename: &str) -> StorageResult<ServedFile> {
        let path = self.key_to_path(filename)?;
        let start = std::time::Instant::now();

        let canonical = match fs::canonicalize(&path).await {
            Ok(canonical) => canonical,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound(filename.to_string()))
            }
            Err(e) => {
                return Err(StorageError::DownloadFailed(format!(
                    "Failed to resolve {}: {}",
                    path.display(),
                    e
                )))
            }
        };
        let base_canonical = fs::canonicalize(&self.base_path).await.map_err(|e| {
            StorageError::ConfigError(format!("Failed to canonicalize base path: {}", e))
        })?;
        if canonical.strip_prefix(&base_canonical).is_err() {
            return Err(StorageError::InvalidKey(
                "Filename resolves outside storage directory".to_string(),
            ));
        }

        let file = fs::File::open(&canonical).await.map_err(|e| {
            StorageError::DownloadFailed(format!("Failed to open file {}: {}", path.display(), e))
        })?;
        let metadata = file.metadata().await?;
        if !metadata.is_file() {
            return Err(StorageError::NotFound(filename.to_string()));
        }

        let key = filename.to_string();
        let stream = tokio_util::io::ReaderStream::new(file).map(move |result| {
            result.map_err(|e| {
                tracing::error!(
                    filename = %key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Local store stream read error"
                );
                StorageError::DownloadFailed(format!("Failed to read chunk: {}", e))
            })
        });

        Ok(ServedFile {
            filename: filename.to_string(),
            size_bytes: metadata.len(),
            stream: Box::pin(stream),
        })
    }

    /// Read a whole stored file into memory.
    pub async fn read(&self, filename: &str) -> StorageResult<Vec<u8>> {
        let mut served = self.open(filename).await?;
        let mut data = Vec::with_capacity(served.size_bytes as usize);
        while let Some(chunk) = served.stream.next().await {
            data.extend_from_slice(&chunk?);
        }
        Ok(data)
    }

    /// Whether the storage directory currently exists and is a directory.
    pub async fn is_available(&self) -> bool {
        fs::metadata(&self.base_path)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false)
    }
}
