//! Upload request/response models

use std::path::PathBuf;

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

use crate::naming::storage_filename;

/// JSON body of `POST /upload`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotebookUploadBody {
    #[serde(default, deserialize_with = "deserialize_participant")]
    pub participant_id: Option<String>,
    /// Either the notebook text or the notebook document itself.
    #[serde(default)]
    pub notebook_json: Option<serde_json::Value>,
}

/// JSON body of `POST /upload_csv`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CsvUploadBody {
    #[serde(default, deserialize_with = "deserialize_participant")]
    pub participant_id: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub content_b64: Option<String>,
}

/// Participant ids are opaque tags; clients sometimes send them as numbers.
fn deserialize_participant<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    }))
}

/// Decoded upload content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// Notebook text, written as UTF-8.
    Text(String),
    /// Bytes already decoded from base64 or read from a multipart field.
    Binary(Vec<u8>),
}

impl Payload {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Payload::Text(text) => text.as_bytes(),
            Payload::Binary(bytes) => bytes,
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Payload::Text(text) => text.into_bytes(),
            Payload::Binary(bytes) => bytes,
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Normalized upload, independent of how it arrived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub participant_id: String,
    pub payload: Payload,
    pub original_filename: Option<String>,
}

impl UploadRequest {
    /// Storage filename for this upload when received at `at`.
    pub fn storage_filename(&self, at: NaiveDateTime) -> String {
        storage_filename(&self.participant_id, at, self.original_filename.as_deref())
    }

    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self.payload {
            Payload::Text(_) => "notebook",
            Payload::Binary(_) => "file",
        }
    }
}

/// A file written to the storage directory. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub filename: String,
    pub path: PathBuf,
    pub size_bytes: u64,
}

/// Success body shared by all upload routes.
///
/// `drive_id` and `drive_link` are serialized as `null` when the mirror is
/// disabled or the mirror upload failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub status: String,
    pub local_filename: String,
    pub drive_id: Option<String>,
    pub drive_link: Option<String>,
}

impl UploadResponse {
    pub fn success(
        local_filename: impl Into<String>,
        drive_id: Option<String>,
        drive_link: Option<String>,
    ) -> Self {
        Self {
            status: "success".to_string(),
            local_filename: local_filename.into(),
            drive_id,
            drive_link,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn participant_accepts_numbers() {
        let body: CsvUploadBody =
            serde_json::from_str(r#"{"participant_id": 42, "filename": "a.csv"}"#).unwrap();
        assert_eq!(body.participant_id.as_deref(), Some("42"));
        assert_eq!(body.content_b64, None);
    }

    #[test]
    fn missing_fields_default_to_none() {
        let body: NotebookUploadBody = serde_json::from_str("{}").unwrap();
        assert!(body.participant_id.is_none());
        assert!(body.notebook_json.is_none());

        let body: NotebookUploadBody =
            serde_json::from_str(r#"{"participant_id": null}"#).unwrap();
        assert!(body.participant_id.is_none());
    }

    #[test]
    fn response_keeps_null_mirror_fields() {
        let json = serde_json::to_value(UploadResponse::success("p1_x.csv", None, None)).unwrap();
        assert_eq!(json["status"], "success");
        assert!(json.get("drive_id").is_some_and(|v| v.is_null()));
        assert!(json.get("drive_link").is_some_and(|v| v.is_null()));
    }
}
