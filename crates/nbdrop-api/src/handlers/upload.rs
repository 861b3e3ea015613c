//! Upload handlers
//!
//! All three routes decode into an `UploadRequest` and share the same
//! persist-then-mirror pipeline.

use crate::error::{HttpAppError, ValidatedJson};
use crate::services::upload::persist_upload;
use crate::state::AppState;
use crate::utils::upload::extract_multipart_upload;
use axum::{
    extract::{Multipart, State},
    Json,
};
use nbdrop_core::{
    decode_csv, decode_notebook, CsvUploadBody, NotebookUploadBody, UploadResponse,
};
use std::sync::Arc;

/// Save a notebook sent as JSON text (or as a JSON document) under `.ipynb`.
#[tracing::instrument(skip(state, body), fields(operation = "upload_notebook"))]
pub async fn upload_notebook(
    State(state): State<Arc<AppState>>,
    ValidatedJson(body): ValidatedJson<NotebookUploadBody>,
) -> Result<Json<UploadResponse>, HttpAppError> {
    let request = decode_notebook(body)?;
    let response = persist_upload(&state, request).await?;
    Ok(Json(response))
}

/// Save a base64-encoded file (typically CSV) under its original name.
///
/// # Errors
/// - 400 when `filename` or `content_b64` is missing or the base64 is invalid
/// - 500 when the file cannot be written
#[tracing::instrument(skip(state, body), fields(operation = "upload_csv"))]
pub async fn upload_csv(
    State(state): State<Arc<AppState>>,
    ValidatedJson(body): ValidatedJson<CsvUploadBody>,
) -> Result<Json<UploadResponse>, HttpAppError> {
    let request = decode_csv(body)?;
    let response = persist_upload(&state, request).await?;
    Ok(Json(response))
}

/// Save a file sent as `multipart/form-data` (`participant_id`, `file`).
#[tracing::instrument(skip(state, multipart), fields(operation = "upload_file"))]
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, HttpAppError> {
    let request = extract_multipart_upload(multipart).await?;
    let response = persist_upload(&state, request).await?;
    Ok(Json(response))
}
