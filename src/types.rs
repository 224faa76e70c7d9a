use serde::{Deserialize, Serialize};

use crate::error::GridError;

/// One file chosen for submission: its name (the server filters on the
/// extension) and raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Read a file from disk, using its file name for the multipart part.
    pub fn from_path(path: impl AsRef<std::path::Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "file".to_string());
        let bytes = std::fs::read(path)?;
        Ok(Self { name, bytes })
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// A fully packaged submission: file parts in selection order plus the
/// option fields as wire strings.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub files: Vec<SelectedFile>,
    pub fields: Vec<(String, String)>,
}

impl UploadRequest {
    /// Total file payload bytes, the denominator for progress percent.
    pub fn total_bytes(&self) -> u64 {
        self.files.iter().map(|f| f.bytes.len() as u64).sum()
    }
}

/// Raw response from the grid service. The body is opaque: on success it is
/// the composite PNG, on failure it is consumed only for diagnostics.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

/// Observable workflow state of a [`GridSession`](crate::GridSession).
///
/// Lifecycle: Idle -> Validating -> Uploading { progress } -> Succeeded/Failed -> Idle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UploadState {
    Idle,
    Validating,
    Uploading { progress: u8 },
    Succeeded,
    Failed,
}

impl UploadState {
    /// Whether a task is currently in flight.
    pub fn is_busy(&self) -> bool {
        matches!(self, UploadState::Validating | UploadState::Uploading { .. })
    }
}

/// Outcome of one `submit` call on a session.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// Grid received and written through the artifact sink.
    Saved { filename: String },
    /// Grid received but the local save failed; the workflow still reset.
    SaveFailed { filename: String, error: String },
    /// Another submission is already in flight; this call was a no-op.
    Busy,
    /// The attempt failed; selection is retained for retry.
    Failed(GridError),
}

impl SubmitOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, SubmitOutcome::Saved { .. })
    }
}
