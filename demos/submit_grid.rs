//! Submit a set of images and save the returned composite grid.
//!
//! ```sh
//! cargo run --example submit_grid -- photos/a.png photos/b.png
//! ```

use imagegrid_rs::{GridSession, SelectedFile, SubmitOutcome};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let paths: Vec<String> = std::env::args().skip(1).collect();
    if paths.is_empty() {
        eprintln!("usage: submit_grid <image> [image ...]");
        return Ok(());
    }

    let mut files = Vec::new();
    for path in &paths {
        files.push(SelectedFile::from_path(path)?);
    }

    let session = GridSession::new("http://127.0.0.1:5000");
    session.set_selection(files);
    session.set_image_size(1000);
    session.set_randomized_order(true);

    println!("Uploading {} file(s)...", paths.len());
    match session.submit().await {
        SubmitOutcome::Saved { filename } => println!("Saved {}", filename),
        SubmitOutcome::SaveFailed { filename, error } => {
            eprintln!("Grid {} generated but not saved: {}", filename, error)
        }
        SubmitOutcome::Busy => eprintln!("An upload is already running"),
        SubmitOutcome::Failed(err) => eprintln!("{}", err),
    }
    Ok(())
}
