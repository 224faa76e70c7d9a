use std::path::PathBuf;

use chrono::{DateTime, Local};

/// Time source for artifact naming. Injected so tests get deterministic
/// filenames.
pub trait Clock {
    fn now(&self) -> DateTime<Local>;
}

/// Wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Derive the output filename for a completed grid:
/// `YYYY.MM.DD_hh.mm.ss_image_grid.png`, zero-padded. Distinct per success
/// unless two completions land within the same second.
pub fn grid_filename(at: DateTime<Local>) -> String {
    at.format("%Y.%m.%d_%H.%M.%S_image_grid.png").to_string()
}

/// The composite image returned by the service, plus its derived filename.
/// The body is opaque; it is handed to an [`ArtifactSink`] unparsed.
#[derive(Debug, Clone)]
pub struct ResultArtifact {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Injected save capability for completed grids.
///
/// `save` either writes the artifact or fails; any transient resource it
/// acquires (file handles, temporary references) must be released on every
/// exit path. Implementations are invoked inline on the workflow's
/// cooperative scheduler and should off-load internally if a save could
/// block for long.
pub trait ArtifactSink {
    fn save(&mut self, artifact: &ResultArtifact) -> std::io::Result<()>;
}

/// Writes artifacts into a directory via `std::fs::write`; the handle is
/// released on every path by scope.
#[derive(Debug, Clone)]
pub struct DiskSink {
    dir: PathBuf,
}

impl DiskSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl Default for DiskSink {
    fn default() -> Self {
        Self::new(".")
    }
}

impl ArtifactSink for DiskSink {
    fn save(&mut self, artifact: &ResultArtifact) -> std::io::Result<()> {
        std::fs::write(self.dir.join(&artifact.filename), &artifact.bytes)
    }
}
