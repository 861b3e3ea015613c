//! Multipart upload extraction

use axum::extract::Multipart;
use nbdrop_core::{participant_or_unknown, AppError, DecodeError, Payload, UploadRequest};

/// Extract an upload from a multipart form.
///
/// Accepts an optional text field `participant_id` and exactly one file field
/// named `file`; other fields are ignored.
pub async fn extract_multipart_upload(mut multipart: Multipart) -> Result<UploadRequest, AppError> {
    let mut participant_id: Option<String> = None;
    let mut file: Option<(Option<String>, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Failed to read multipart: {}", e)))?
    {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        match field_name.as_str() {
            "participant_id" => {
                let text = field.text().await.map_err(|e| {
                    AppError::InvalidInput(format!("Failed to read participant_id: {}", e))
                })?;
                participant_id = Some(text);
            }
            "file" => {
                if file.is_some() {
                    return Err(AppError::InvalidInput(
                        "Multiple file fields are not allowed; send exactly one field named 'file'"
                            .to_string(),
                    ));
                }
                let filename = field.file_name().map(|s| s.to_string());
                let data = field.bytes().await.map_err(|e| {
                    AppError::InvalidInput(format!("Failed to read file data: {}", e))
                })?;
                file = Some((filename, data.to_vec()));
            }
            _ => {}
        }
    }

    let (filename, data) = file.ok_or(DecodeError::MissingField("file"))?;

    Ok(UploadRequest {
        participant_id: participant_or_unknown(participant_id),
        payload: Payload::Binary(data),
        original_filename: Some(
            filename.unwrap_or_else(|| nbdrop_core::constants::FALLBACK_FILENAME.to_string()),
        ),
    })
}
