use crate::config::GridOptions;
use crate::error::{Diagnostic, GridError};
use crate::progress::ProgressTracker;
use crate::transport::{Transport, TransportFailure};
use crate::types::{SelectedFile, UploadRequest};

/// The only status the grid service uses for success. Redirects and other
/// 2xx codes are treated as server failures.
pub const SUCCESS_STATUS: u16 = 200;

/// Package one submission: one part per file, in selection order, plus the
/// three option fields as wire strings.
pub fn build_request(files: Vec<SelectedFile>, options: &GridOptions) -> UploadRequest {
    UploadRequest {
        files,
        fields: options.form_fields(),
    }
}

/// Run one submission attempt against a transport.
///
/// The empty-selection check resolves before any I/O. Exactly one transport
/// call is made per invocation; there is no retry. Progress values passed to
/// `on_progress` are non-decreasing, capped at 99 while the transfer is in
/// flight, and reach 100 only once the 200 response is confirmed. On success
/// the raw body is returned untouched; on failure a [`Diagnostic`] is logged
/// and the failure is classified into a [`GridError`].
pub async fn submit<T: Transport>(
    transport: &T,
    files: Vec<SelectedFile>,
    options: &GridOptions,
    on_progress: &mut dyn FnMut(u8),
) -> Result<Vec<u8>, GridError> {
    if files.is_empty() {
        return Err(GridError::NoFilesSelected);
    }

    let request = build_request(files, options);
    let mut tracker = ProgressTracker::new();
    let mut relay = |raw: u8| {
        if let Some(p) = tracker.update(raw) {
            on_progress(p);
        }
    };

    match transport.send(request, &mut relay).await {
        Ok(resp) if resp.status == SUCCESS_STATUS => {
            on_progress(tracker.complete());
            Ok(resp.body)
        }
        Ok(resp) => {
            Diagnostic::from_response(resp.status, resp.headers, &resp.body).log();
            Err(GridError::Server {
                status: resp.status,
            })
        }
        Err(TransportFailure::NoResponse { context }) => {
            Diagnostic::from_message(context.clone()).log();
            Err(GridError::Network { context })
        }
        Err(TransportFailure::Setup { message }) => {
            Diagnostic::from_message(message.clone()).log();
            Err(GridError::Setup(message))
        }
    }
}
