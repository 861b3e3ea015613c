//! Stub mirrors substituted for the Drive client.

use async_trait::async_trait;
use nbdrop_storage::{Mirror, RemoteFile};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Records every upload and answers with a fixed remote file.
#[derive(Default)]
pub struct RecordingMirror {
    pub calls: Mutex<Vec<(PathBuf, String)>>,
}

impl RecordingMirror {
    pub fn calls(&self) -> Vec<(PathBuf, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mirror for RecordingMirror {
    async fn upload(&self, local_path: &Path, filename: &str) -> Option<RemoteFile> {
        self.calls
            .lock()
            .unwrap()
            .push((local_path.to_path_buf(), filename.to_string()));
        Some(RemoteFile {
            id: "drive-file-1".to_string(),
            web_view_link: Some("https://drive.example.com/file/drive-file-1".to_string()),
        })
    }

    fn is_enabled(&self) -> bool {
        true
    }

    fn backend_name(&self) -> &'static str {
        "recording"
    }
}

/// Enabled mirror whose remote calls always fail.
pub struct FailingMirror;

#[async_trait]
impl Mirror for FailingMirror {
    async fn upload(&self, _local_path: &Path, _filename: &str) -> Option<RemoteFile> {
        None
    }

    fn is_enabled(&self) -> bool {
        true
    }

    fn backend_name(&self) -> &'static str {
        "failing"
    }
}
