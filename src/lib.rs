//! # imagegrid-rs
//!
//! Async Rust client for the Image Grid compositing service. Packages a
//! selection of local images into a multipart upload, tracks transfer
//! progress, interprets the service's response, and saves the returned
//! composite under a timestamped name.
//!
//! ## Features
//!
//! - **Submission workflow** — a [`GridSession`] state machine
//!   (`Idle → Validating → Uploading → Succeeded/Failed → Idle`) with a
//!   single in-flight guard and automatic reset between attempts
//! - **Upload progress** — byte-accurate, non-decreasing percentages; 100
//!   is reported only on confirmed success
//! - **Failure taxonomy** — empty selection, server status, no response,
//!   and request-setup failures classified into [`GridError`], each with a
//!   user-facing message and a logged diagnostic
//! - **Bounded options** — image size clamped to configurable slider bounds
//! - **Injected seams** — transport, clock, and artifact sink are traits, so
//!   the whole workflow runs deterministically under test
//!
//! ## Quick Start
//!
//! ```no_run
//! use imagegrid_rs::{GridSession, SelectedFile, SubmitOutcome};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let session = GridSession::new("http://127.0.0.1:5000");
//!     session.set_selection(vec![
//!         SelectedFile::from_path("photos/a.png")?,
//!         SelectedFile::from_path("photos/b.png")?,
//!     ]);
//!     session.set_image_size(1000);
//!
//!     session.subscribe(|state| println!("state: {:?}", state));
//!
//!     match session.submit().await {
//!         SubmitOutcome::Saved { filename } => println!("saved {}", filename),
//!         SubmitOutcome::SaveFailed { filename, error } => {
//!             eprintln!("grid {} generated but not saved: {}", filename, error)
//!         }
//!         SubmitOutcome::Busy => eprintln!("an upload is already running"),
//!         SubmitOutcome::Failed(err) => eprintln!("{}", err),
//!     }
//!     Ok(())
//! }
//! ```

pub mod artifact;
pub mod config;
pub mod error;
pub mod progress;
pub mod selection;
pub mod session;
pub mod transport;
pub mod types;
pub mod upload;

pub use artifact::{grid_filename, ArtifactSink, Clock, DiskSink, ResultArtifact, SystemClock};
pub use config::{GridOptions, SizeBounds};
pub use error::{Diagnostic, GridError, Result};
pub use progress::ProgressTracker;
pub use selection::SelectionStore;
pub use session::GridSession;
pub use transport::{HttpTransport, Transport, TransportFailure};
pub use types::{RawResponse, SelectedFile, SubmitOutcome, UploadRequest, UploadState};
