//! Observe the workflow state machine while an upload runs.
//!
//! Subscribes to the session before submitting and prints every transition,
//! including per-percent upload progress.
//!
//! ```sh
//! cargo run --example watch_progress -- photos/*.png
//! ```

use imagegrid_rs::{GridSession, HttpTransport, SelectedFile, SubmitOutcome, UploadState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let paths: Vec<String> = std::env::args().skip(1).collect();
    if paths.is_empty() {
        eprintln!("usage: watch_progress <image> [image ...]");
        return Ok(());
    }

    let transport = HttpTransport::new("http://127.0.0.1:5000");
    if !transport.health().await.unwrap_or(false) {
        eprintln!("Grid service is not reachable");
        return Ok(());
    }

    let session = GridSession::with_transport(transport);
    let mut files = Vec::new();
    for path in &paths {
        files.push(SelectedFile::from_path(path)?);
    }
    session.set_selection(files);

    session.subscribe(|state| match state {
        UploadState::Uploading { progress } => println!("  {}%", progress),
        other => println!("state: {:?}", other),
    });

    match session.submit().await {
        SubmitOutcome::Saved { filename } => println!("Done: {}", filename),
        other => eprintln!("Did not complete: {:?}", other),
    }
    Ok(())
}
