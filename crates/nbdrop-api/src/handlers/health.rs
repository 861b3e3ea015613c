//! Health check handlers.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;

#[derive(serde::Serialize)]
pub struct HealthCheckResponse {
    pub status: String,
    pub storage: String,
    pub mirror: String,
}

/// Plain-text banner at the root path.
pub async fn banner() -> &'static str {
    "Backend is running! Use /upload or /upload_csv."
}

/// Storage directory and mirror status. The mirror never affects the status code.
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let storage_ok = state.store.is_available().await;
    if !storage_ok {
        tracing::error!(
            save_dir = %state.store.base_path().display(),
            "Storage directory unavailable"
        );
    }

    let response = HealthCheckResponse {
        status: if storage_ok { "healthy" } else { "degraded" }.to_string(),
        storage: if storage_ok { "healthy" } else { "unavailable" }.to_string(),
        mirror: state.mirror.backend_name().to_string(),
    };

    let status = if storage_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}
