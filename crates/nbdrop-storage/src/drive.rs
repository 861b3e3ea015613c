//! Google Drive mirror.
//!
//! Uses a service-account key; the destination folder must be shared with the
//! service account's `client_email`. Uploaded files inherit the folder's
//! permissions.

use crate::traits::{Mirror, MirrorError, RemoteFile};
use async_trait::async_trait;
use google_drive3 as drive3;
use std::io::Cursor;
use std::path::Path;

type DriveConnector = drive3::hyper_rustls::HttpsConnector<
    drive3::hyper_util::client::legacy::connect::HttpConnector,
>;

/// Drive v3 client bound to one destination folder.
pub struct DriveMirror {
    hub: drive3::DriveHub<DriveConnector>,
    folder_id: Option<String>,
}

impl DriveMirror {
    /// Build from an inline service-account key (JSON text).
    pub async fn from_service_account_json(
        json: &str,
        folder_id: Option<String>,
    ) -> Result<Self, MirrorError> {
        let key = drive3::yup_oauth2::parse_service_account_key(json)
            .map_err(|e| MirrorError::Credentials(e.to_string()))?;
        Self::with_key(key, folder_id).await
    }

    /// Build from a service-account key file.
    pub async fn from_service_account_file(
        path: &Path,
        folder_id: Option<String>,
    ) -> Result<Self, MirrorError> {
        let key = drive3::yup_oauth2::read_service_account_key(path)
            .await
            .map_err(|e| {
                MirrorError::Credentials(format!(
                    "read service account key from {}: {}",
                    path.display(),
                    e
                ))
            })?;
        Self::with_key(key, folder_id).await
    }

    async fn with_key(
        key: drive3::yup_oauth2::ServiceAccountKey,
        folder_id: Option<String>,
    ) -> Result<Self, MirrorError> {
        let connector = drive3::hyper_rustls::HttpsConnectorBuilder::new()
            .with_native_roots()
            .map_err(|e| MirrorError::Client(format!("load native root certs: {}", e)))?
            .https_only()
            .enable_http2()
            .build();

        let client = drive3::hyper_util::client::legacy::Client::builder(
            drive3::hyper_util::rt::TokioExecutor::new(),
        )
        .build(connector.clone());

        // yup-oauth2 takes a client with a `String` body; the hub's uses a boxed body.
        let auth_client = drive3::hyper_util::client::legacy::Client::builder(
            drive3::hyper_util::rt::TokioExecutor::new(),
        )
        .build::<_, String>(connector);

        let auth = drive3::yup_oauth2::ServiceAccountAuthenticator::with_client(key, auth_client)
            .build()
            .await
            .map_err(|e| {
                MirrorError::Client(format!("build service account authenticator: {}", e))
            })?;

        Ok(DriveMirror {
            hub: drive3::DriveHub::new(client, auth),
            folder_id,
        })
    }

    async fn try_upload(
        &self,
        local_path: &Path,
        filename: &str,
    ) -> Result<RemoteFile, MirrorError> {
        let folder_id = self.folder_id.as_deref().ok_or(MirrorError::MissingFolder)?;

        let data = tokio::fs::read(local_path).await?;
        let size = data.len();

        let mime: mime_guess::mime::Mime = mime_guess::from_path(filename)
            .first_raw()
            .unwrap_or("application/octet-stream")
            .parse()
            .map_err(|e| MirrorError::Api(format!("invalid mime type: {}", e)))?;

        let file = drive3::api::File {
            name: Some(filename.to_string()),
            parents: Some(vec![folder_id.to_string()]),
            ..Default::default()
        };

        let start = std::time::Instant::now();
        let (_resp, created) = self
            .hub
            .files()
            .create(file)
            .supports_all_drives(true)
            .param("fields", "id,webViewLink")
            .add_scope(drive3::api::Scope::File)
            .upload(Cursor::new(data), mime)
            .await
            .map_err(|e| MirrorError::Api(e.to_string()))?;

        let id = created
            .id
            .ok_or_else(|| MirrorError::Api("response carried no file id".to_string()))?;

        tracing::info!(
            filename = %filename,
            drive_id = %id,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Uploaded to Google Drive"
        );

        Ok(RemoteFile {
            id,
            web_view_link: created.web_view_link,
        })
    }
}

#[async_trait]
impl Mirror for DriveMirror {
    async fn upload(&self, local_path: &Path, filename: &str) -> Option<RemoteFile> {
        match self.try_upload(local_path, filename).await {
            Ok(remote) => Some(remote),
            Err(MirrorError::MissingFolder) => {
                tracing::warn!(
                    filename = %filename,
                    "Missing GOOGLE_DRIVE_FOLDER_ID, skipping Drive upload"
                );
                None
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    filename = %filename,
                    "Error uploading to Google Drive"
                );
                None
            }
        }
    }

    fn is_enabled(&self) -> bool {
        true
    }

    fn backend_name(&self) -> &'static str {
        "google-drive"
    }
}
