use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use crate::artifact::{grid_filename, ArtifactSink, Clock, DiskSink, ResultArtifact, SystemClock};
use crate::config::{GridOptions, SizeBounds};
use crate::error::GridError;
use crate::selection::SelectionStore;
use crate::transport::{HttpTransport, Transport};
use crate::types::{SelectedFile, SubmitOutcome, UploadState};
use crate::upload;

type StateListener = Box<dyn Fn(&UploadState) + Send + Sync>;

/// One grid submission workflow: selection, options, upload state, and the
/// reset behavior between attempts.
///
/// A session owns its selection and options exclusively and allows at most
/// one upload in flight. A second `submit` while one is running is rejected
/// as a no-op ([`SubmitOutcome::Busy`]); nothing is queued. Observers
/// register with [`subscribe`](GridSession::subscribe) and see every state
/// transition, including per-percent upload progress.
///
/// After a successful save the session resets fully (selection cleared,
/// progress zeroed). After a failure the selection is retained so the user
/// can retry without reselecting files.
pub struct GridSession<T: Transport> {
    transport: T,
    bounds: SizeBounds,
    inner: Mutex<Inner>,
    listeners: Mutex<Vec<StateListener>>,
    busy: AtomicBool,
    clock: Box<dyn Clock + Send + Sync>,
    sink: Mutex<Box<dyn ArtifactSink + Send>>,
}

struct Inner {
    selection: SelectionStore,
    options: GridOptions,
    state: UploadState,
}

/// Clears the in-flight flag on every exit path.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl GridSession<HttpTransport> {
    /// Session against a live grid service, with default bounds, system
    /// clock, and a [`DiskSink`] in the current directory.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_transport(HttpTransport::new(endpoint))
    }
}

impl<T: Transport> GridSession<T> {
    /// Session over an arbitrary transport (tests inject mocks here).
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport,
            bounds: SizeBounds::default(),
            inner: Mutex::new(Inner {
                selection: SelectionStore::new(),
                options: GridOptions::default(),
                state: UploadState::Idle,
            }),
            listeners: Mutex::new(Vec::new()),
            busy: AtomicBool::new(false),
            clock: Box::new(SystemClock),
            sink: Mutex::new(Box::new(DiskSink::default())),
        }
    }

    /// Override the image size bounds.
    pub fn with_bounds(mut self, bounds: SizeBounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Inject a time source for artifact naming.
    pub fn with_clock(mut self, clock: impl Clock + Send + Sync + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Inject the save capability for completed grids.
    pub fn with_sink(mut self, sink: impl ArtifactSink + Send + 'static) -> Self {
        self.sink = Mutex::new(Box::new(sink));
        self
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    // ── Selection ───────────────────────────────────────────────────

    /// Replace the current selection. Does not affect an in-flight upload,
    /// which works on a snapshot taken at submit time.
    pub fn set_selection(&self, files: Vec<SelectedFile>) {
        self.lock_inner().selection.set(files);
    }

    pub fn clear_selection(&self) {
        self.lock_inner().selection.clear();
    }

    pub fn selection_count(&self) -> usize {
        self.lock_inner().selection.count()
    }

    // ── Options ─────────────────────────────────────────────────────

    /// Set the per-image size, clamped into the session's bounds.
    pub fn set_image_size(&self, px: u32) {
        let clamped = self.bounds.clamp(px);
        self.lock_inner().options.image_size = clamped;
    }

    pub fn set_randomized_order(&self, on: bool) {
        self.lock_inner().options.randomized_order = on;
    }

    pub fn set_printer_paper_format(&self, on: bool) {
        self.lock_inner().options.printer_paper_format = on;
    }

    /// Immutable copy of the current option values.
    pub fn options(&self) -> GridOptions {
        self.lock_inner().options.clone()
    }

    // ── Observation ─────────────────────────────────────────────────

    pub fn state(&self) -> UploadState {
        self.lock_inner().state.clone()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Register a listener notified on every state transition and progress
    /// step. Listeners run inline on the workflow's scheduler and must not
    /// block.
    pub fn subscribe(&self, listener: impl Fn(&UploadState) + Send + Sync + 'static) {
        self.lock_listeners().push(Box::new(listener));
    }

    // ── Submission ──────────────────────────────────────────────────

    /// Run one submission attempt end to end.
    ///
    /// Validation happens before any I/O; an empty selection resolves
    /// straight back to `Idle`. On success the returned composite is named
    /// from the injected clock, handed to the artifact sink, and the session
    /// resets regardless of whether the save itself succeeds. On failure the
    /// busy flag and progress clear but the selection stays.
    pub async fn submit(&self) -> SubmitOutcome {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return SubmitOutcome::Busy;
        }
        let _guard = BusyGuard(&self.busy);

        self.set_state(UploadState::Validating);
        let (files, options) = {
            let inner = self.lock_inner();
            (inner.selection.snapshot(), inner.options.clone())
        };
        if files.is_empty() {
            self.set_state(UploadState::Idle);
            return SubmitOutcome::Failed(GridError::NoFilesSelected);
        }

        self.set_state(UploadState::Uploading { progress: 0 });
        let mut on_progress =
            |progress: u8| self.set_state(UploadState::Uploading { progress });

        match upload::submit(&self.transport, files, &options, &mut on_progress).await {
            Ok(body) => {
                self.set_state(UploadState::Succeeded);
                let filename = grid_filename(self.clock.now());
                let artifact = ResultArtifact {
                    filename: filename.clone(),
                    bytes: body,
                };
                let save_result = self.lock_sink().save(&artifact);
                self.reset();
                match save_result {
                    Ok(()) => SubmitOutcome::Saved { filename },
                    Err(e) => {
                        eprintln!(
                            "[imagegrid-rs] failed to save {}: {}",
                            artifact.filename, e
                        );
                        SubmitOutcome::SaveFailed {
                            filename,
                            error: e.to_string(),
                        }
                    }
                }
            }
            Err(err) => {
                self.set_state(UploadState::Failed);
                // selection retained for retry
                self.set_state(UploadState::Idle);
                SubmitOutcome::Failed(err)
            }
        }
    }

    /// Full reset: selection cleared, progress zeroed, back to `Idle`.
    fn reset(&self) {
        self.lock_inner().selection.clear();
        self.set_state(UploadState::Idle);
    }

    fn set_state(&self, state: UploadState) {
        self.lock_inner().state = state.clone();
        for listener in self.lock_listeners().iter() {
            listener(&state);
        }
    }

    fn lock_inner(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| {
            eprintln!("[imagegrid-rs] state mutex poisoned, recovering");
            poisoned.into_inner()
        })
    }

    fn lock_listeners(&self) -> MutexGuard<'_, Vec<StateListener>> {
        self.listeners.lock().unwrap_or_else(|poisoned| {
            eprintln!("[imagegrid-rs] listener mutex poisoned, recovering");
            poisoned.into_inner()
        })
    }

    fn lock_sink(&self) -> MutexGuard<'_, Box<dyn ArtifactSink + Send>> {
        self.sink.lock().unwrap_or_else(|poisoned| {
            eprintln!("[imagegrid-rs] sink mutex poisoned, recovering");
            poisoned.into_inner()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_idle() {
        let session = GridSession::new("http://localhost:5000");
        assert_eq!(session.state(), UploadState::Idle);
        assert!(!session.is_busy());
        assert_eq!(session.selection_count(), 0);
    }

    #[test]
    fn test_set_selection_updates_count() {
        let session = GridSession::new("http://localhost:5000");
        session.set_selection(vec![
            SelectedFile::new("a.png", vec![1]),
            SelectedFile::new("b.png", vec![2]),
        ]);
        assert_eq!(session.selection_count(), 2);
        session.clear_selection();
        assert_eq!(session.selection_count(), 0);
    }

    #[test]
    fn test_image_size_clamped_through_bounds() {
        let session = GridSession::new("http://localhost:5000");
        session.set_image_size(50_000);
        assert_eq!(session.options().image_size, 3000);
        session.set_image_size(1);
        assert_eq!(session.options().image_size, 100);
        session.set_image_size(1049);
        assert_eq!(session.options().image_size, 1000);
    }

    #[test]
    fn test_legacy_bounds_apply() {
        let session =
            GridSession::new("http://localhost:5000").with_bounds(SizeBounds::legacy());
        session.set_image_size(2600);
        assert_eq!(session.options().image_size, 2000);
    }

    #[test]
    fn test_option_toggles() {
        let session = GridSession::new("http://localhost:5000");
        session.set_randomized_order(false);
        session.set_printer_paper_format(true);
        let options = session.options();
        assert!(!options.randomized_order);
        assert!(options.printer_paper_format);
    }

    #[test]
    fn test_options_snapshot_is_immutable_copy() {
        let session = GridSession::new("http://localhost:5000");
        let before = session.options();
        session.set_image_size(2000);
        assert_eq!(before.image_size, 1000);
        assert_eq!(session.options().image_size, 2000);
    }
}
