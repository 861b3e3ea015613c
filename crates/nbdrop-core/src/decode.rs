//! Request decoding
//!
//! Turns the JSON bodies of the upload routes into a normalized
//! [`UploadRequest`]. Notebook and CSV content is never inspected.

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::constants::UNKNOWN_PARTICIPANT;
use crate::models::{CsvUploadBody, NotebookUploadBody, Payload, UploadRequest};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("Missing {0}")]
    MissingField(&'static str),

    #[error("Invalid base64: {0}")]
    InvalidEncoding(String),
}

/// Resolve the participant id, treating absent and blank values alike.
pub fn participant_or_unknown(participant_id: Option<String>) -> String {
    participant_id
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| UNKNOWN_PARTICIPANT.to_string())
}

/// Decode a notebook upload. An absent or null `notebook_json` is stored as an
/// empty notebook file.
pub fn decode_notebook(body: NotebookUploadBody) -> Result<UploadRequest, DecodeError> {
    let text = match body.notebook_json {
        None | Some(serde_json::Value::Null) => String::new(),
        Some(serde_json::Value::String(text)) => text,
        Some(document) => document.to_string(),
    };

    Ok(UploadRequest {
        participant_id: participant_or_unknown(body.participant_id),
        payload: Payload::Text(text),
        original_filename: None,
    })
}

/// Decode a base64 file upload.
///
/// ASCII whitespace inside `content_b64` (line wrapping) is ignored; anything
/// else outside the standard alphabet, or bad padding, is an error.
pub fn decode_csv(body: CsvUploadBody) -> Result<UploadRequest, DecodeError> {
    let filename = body.filename.filter(|f| !f.is_empty());
    let content_b64 = body.content_b64.filter(|c| !c.is_empty());

    let (Some(filename), Some(content_b64)) = (filename, content_b64) else {
        return Err(DecodeError::MissingField("filename or content"));
    };

    let compact: Vec<u8> = content_b64
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    let bytes = STANDARD
        .decode(&compact)
        .map_err(|e| DecodeError::InvalidEncoding(e.to_string()))?;

    Ok(UploadRequest {
        participant_id: participant_or_unknown(body.participant_id),
        payload: Payload::Binary(bytes),
        original_filename: Some(filename),
    })
}
