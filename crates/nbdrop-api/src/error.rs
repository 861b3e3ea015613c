//! HTTP error response conversion
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>`. Domain errors
//! (`AppError`, `DecodeError`, `StorageError`) convert into `HttpAppError`
//! and render as `{"status": "error", "message": ..., "code": ...}`.

use axum::{
    extract::rejection::JsonRejection,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use nbdrop_core::{AppError, DecodeError, ErrorMetadata, LogLevel};
use nbdrop_storage::StorageError;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Always `"error"`, mirroring the `"success"` of upload responses
    pub status: String,
    pub message: String,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
}

/// Wrapper type for AppError to implement IntoResponse
/// (orphan rules: AppError lives in nbdrop-core).
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<DecodeError> for HttpAppError {
    fn from(err: DecodeError) -> Self {
        HttpAppError(AppError::Decode(err))
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::from(err))
    }
}

/// Convert JSON body deserialization failures into a 400 with our ErrorResponse format.
impl From<JsonRejection> for HttpAppError {
    fn from(rejection: JsonRejection) -> Self {
        HttpAppError(AppError::InvalidInput(format!(
            "Invalid request body: {}",
            rejection.body_text()
        )))
    }
}

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        let app = match err {
            StorageError::NotFound(name) => AppError::NotFound(format!("File not found: {}", name)),
            StorageError::InvalidKey(msg) => AppError::InvalidInput(msg),
            StorageError::UploadFailed(msg) => AppError::Storage(msg),
            StorageError::DownloadFailed(msg) => AppError::Storage(msg),
            StorageError::IoError(err) => AppError::Storage(format!("IO error: {}", err)),
            StorageError::ConfigError(msg) => AppError::Internal(msg),
        };
        HttpAppError(app)
    }
}

/// JSON body extractor that returns our ErrorResponse format (400 + JSON) on
/// deserialization failure instead of axum's plain-text rejection.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = HttpAppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(inner) = Json::<T>::from_request(req, state)
            .await
            .map_err(HttpAppError::from)?;
        Ok(ValidatedJson(inner))
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type = error_type, "Error occurred");
        }
    }
}

/// Set once at startup from [`Config::is_production`](nbdrop_core::Config::is_production).
static HIDE_ERROR_DETAILS: AtomicBool = AtomicBool::new(false);

/// Hide `details`/`error_type` from every error response (production mode).
pub fn set_hide_error_details(hide: bool) {
    HIDE_ERROR_DETAILS.store(hide, Ordering::Relaxed);
}

fn hide_error_details() -> bool {
    HIDE_ERROR_DETAILS.load(Ordering::Relaxed)
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        let (details, error_type) = if hide_error_details() || app_error.is_sensitive() {
            (None, None)
        } else {
            (
                Some(app_error.detailed_message()),
                Some(app_error.error_type().to_string()),
            )
        };

        let body = Json(ErrorResponse {
            status: "error".to_string(),
            message: app_error.client_message(),
            code: app_error.error_code().to_string(),
            details,
            error_type,
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_storage_error_not_found() {
        let HttpAppError(app_err) = StorageError::NotFound("a.csv".to_string()).into();
        match app_err {
            AppError::NotFound(msg) => assert!(msg.contains("a.csv")),
            _ => panic!("Expected NotFound variant"),
        }
    }

    #[test]
    fn test_from_storage_error_invalid_key() {
        let HttpAppError(app_err) = StorageError::InvalidKey("Invalid key".to_string()).into();
        match app_err {
            AppError::InvalidInput(msg) => assert_eq!(msg, "Invalid key"),
            _ => panic!("Expected InvalidInput variant"),
        }
    }

    #[test]
    fn test_from_storage_error_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let HttpAppError(app_err) = StorageError::IoError(io_err).into();
        assert_eq!(app_err.http_status_code(), 500);
        match app_err {
            AppError::Storage(msg) => assert!(msg.contains("disk full")),
            _ => panic!("Expected Storage variant"),
        }
    }

    #[test]
    fn test_decode_error_renders_400() {
        let response =
            HttpAppError::from(DecodeError::MissingField("filename or content")).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    async fn render(err: AppError) -> serde_json::Value {
        let response = HttpAppError(err).into_response();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        serde_json::from_slice(&body).expect("json body")
    }

    #[tokio::test]
    async fn test_details_follow_configured_mode() {
        set_hide_error_details(false);
        let json = render(AppError::InvalidInput("bad field".to_string())).await;
        assert_eq!(json["details"], "Invalid input: bad field");
        assert_eq!(json["error_type"], "InvalidInput");

        set_hide_error_details(true);
        let json = render(AppError::InvalidInput("bad field".to_string())).await;
        assert_eq!(json["message"], "bad field");
        assert!(json.get("details").is_none());
        assert!(json.get("error_type").is_none());

        set_hide_error_details(false);
    }

    #[tokio::test]
    async fn test_sensitive_details_always_hidden() {
        let json = render(AppError::Storage("/var/data/x: disk full".to_string())).await;
        assert_eq!(json["message"], "Failed to store file");
        assert!(json.get("details").is_none());
    }

    #[test]
    fn test_error_response_shape() {
        let response = ErrorResponse {
            status: "error".to_string(),
            message: "Missing filename or content".to_string(),
            code: "MISSING_FIELD".to_string(),
            details: None,
            error_type: None,
        };
        let json = serde_json::to_value(&response).expect("serialize");
        assert_eq!(json.get("status").and_then(|v| v.as_str()), Some("error"));
        assert!(json.get("message").and_then(|v| v.as_str()).is_some());
        assert!(json.get("details").is_none());
    }
}
