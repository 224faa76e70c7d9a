use thiserror::Error;

/// Errors produced by one submission attempt.
///
/// The `Display` text of each variant is the user-facing notification for
/// that failure; richer detail (headers, response bodies, underlying causes)
/// goes into a [`Diagnostic`] and is logged locally, never shown verbatim.
#[derive(Error, Debug)]
pub enum GridError {
    /// Submission attempted with an empty selection. Resolved before any I/O.
    #[error("Please select files first")]
    NoFilesSelected,

    /// The server answered with a status other than 200.
    #[error("Server responded with status {status}")]
    Server { status: u16 },

    /// The request was sent but no response ever arrived (connection refused,
    /// timeout, dropped transfer).
    #[error("No response received from server. Check that it is running and accessible")]
    Network { context: String },

    /// The request could not be built or serialized before leaving the client.
    #[error("Could not set up the upload request: {0}")]
    Setup(String),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, GridError>;

/// Diagnostic record attached to a classified failure.
///
/// Intended for local logging only: the user sees at most the status code,
/// while headers and body detail stay in the log.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub status: Option<u16>,
    pub headers: Vec<(String, String)>,
    pub detail: String,
}

impl Diagnostic {
    /// Diagnostic for a received-but-rejected response.
    pub fn from_response(status: u16, headers: Vec<(String, String)>, body: &[u8]) -> Self {
        Self {
            status: Some(status),
            headers,
            detail: body_detail(body),
        }
    }

    /// Diagnostic for a failure with no response (network or setup).
    pub fn from_message(message: impl Into<String>) -> Self {
        Self {
            status: None,
            headers: Vec::new(),
            detail: message.into(),
        }
    }

    /// Write this record to the local log.
    pub fn log(&self) {
        match self.status {
            Some(status) => eprintln!(
                "[imagegrid-rs] upload failed: status {}, detail: {}, headers: {:?}",
                status, self.detail, self.headers
            ),
            None => eprintln!("[imagegrid-rs] upload failed: {}", self.detail),
        }
    }
}

/// Extract a readable detail string from a failure body.
///
/// The grid service reports errors as `{"error": "..."}` JSON; fall back to
/// a truncated lossy string for anything else.
fn body_detail(body: &[u8]) -> String {
    if let Ok(json) = serde_json::from_slice::<serde_json::Value>(body) {
        if let Some(msg) = json.get("error").and_then(|e| e.as_str()) {
            return msg.to_string();
        }
        return json.to_string();
    }
    const MAX_DETAIL: usize = 200;
    String::from_utf8_lossy(&body[..body.len().min(MAX_DETAIL)]).into_owned()
}
