//! Listing and download of stored files.

use crate::error::HttpAppError;
use crate::state::AppState;
use crate::utils::html::escape_html;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, Response},
};
use futures::StreamExt;
use nbdrop_core::constants::SAVED_RESULTS_ROUTE;
use nbdrop_core::AppError;
use std::sync::Arc;

/// HTML list of every stored file, each linking to its download route.
#[tracing::instrument(skip(state), fields(operation = "list_files"))]
pub async fn list_files(State(state): State<Arc<AppState>>) -> Result<Html<String>, HttpAppError> {
    let names = state.store.list().await?;

    let items: String = names
        .iter()
        .map(|name| {
            format!(
                r#"<li><a href="{}/{}">{}</a></li>"#,
                SAVED_RESULTS_ROUTE,
                escape_html(&urlencoding::encode(name)),
                escape_html(name)
            )
        })
        .collect();

    tracing::debug!(count = names.len(), "Listed stored files");

    Ok(Html(format!("<h2>Saved files:</h2><ul>{}</ul>", items)))
}

/// `Content-Disposition` value with an ASCII fallback name and the exact
/// name in RFC 5987 form.
fn attachment_disposition(filename: &str) -> String {
    let ascii: String = filename
        .chars()
        .map(|c| {
            if (c.is_ascii_graphic() && c != '"' && c != '\\') || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        ascii,
        urlencoding::encode(filename)
    )
}

/// Stream a stored file back as an attachment.
///
/// Names that would resolve outside the storage directory are rejected with
/// 400; unknown names are 404.
#[tracing::instrument(skip(state), fields(operation = "serve_file"))]
pub async fn serve_file(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Result<Response, HttpAppError> {
    let served = state.store.open(&filename).await?;

    let content_type = mime_guess::from_path(&served.filename)
        .first_raw()
        .unwrap_or("application/octet-stream");

    let body_stream = served.stream.map(|result| {
        result.map_err(|e| std::io::Error::other(format!("Storage stream error: {}", e)))
    });

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, served.size_bytes)
        .header(
            header::CONTENT_DISPOSITION,
            attachment_disposition(&served.filename),
        )
        .header(header::CACHE_CONTROL, "no-cache")
        .body(Body::from_stream(body_stream))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {}", e)))?;

    Ok(response)
}
