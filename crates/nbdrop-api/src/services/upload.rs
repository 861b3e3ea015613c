//! Upload pipeline: naming, local write, then best-effort mirror.

use crate::error::HttpAppError;
use crate::state::AppState;
use chrono::Local;
use nbdrop_core::{UploadRequest, UploadResponse};

/// Persist a decoded upload and mirror it.
///
/// The local write decides success. The mirror call is awaited before
/// returning, so a slow remote delays the response, but its failure only
/// leaves `drive_id`/`drive_link` empty.
pub async fn persist_upload(
    state: &AppState,
    request: UploadRequest,
) -> Result<UploadResponse, HttpAppError> {
    let filename = request.storage_filename(Local::now().naive_local());
    let kind = request.kind();

    let stored = state
        .store
        .write(&filename, request.payload.as_bytes())
        .await?;

    let remote = state.mirror.upload(&stored.path, &stored.filename).await;

    tracing::info!(
        participant_id = %request.participant_id,
        kind,
        local_filename = %stored.filename,
        size_bytes = stored.size_bytes,
        mirrored = remote.is_some(),
        "Upload saved locally"
    );

    let (drive_id, drive_link) = match remote {
        Some(remote) => (Some(remote.id), remote.web_view_link),
        None => (None, None),
    };

    Ok(UploadResponse::success(stored.filename, drive_id, drive_link))
}
