//! nbdrop core library
//!
//! Configuration, error taxonomy, domain models, request decoding and the
//! storage naming policy shared by the storage and API crates.

pub mod config;
pub mod constants;
pub mod decode;
pub mod error;
pub mod models;
pub mod naming;

// Re-export commonly used types
pub use config::{Config, MirrorConfig};
pub use decode::{decode_csv, decode_notebook, participant_or_unknown, DecodeError};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{
    CsvUploadBody, NotebookUploadBody, Payload, StoredFile, UploadRequest, UploadResponse,
};
pub use naming::{sanitize_component, storage_filename};
