use crate::types::SelectedFile;

/// Holds the files currently chosen for the next submission.
///
/// The store is read by the upload path exactly once per submission, via
/// [`snapshot`](SelectionStore::snapshot); replacing the selection while an
/// upload is in flight never touches the in-flight copy.
#[derive(Debug, Default)]
pub struct SelectionStore {
    files: Vec<SelectedFile>,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current selection.
    pub fn set(&mut self, files: Vec<SelectedFile>) {
        self.files = files;
    }

    /// Empty the selection.
    pub fn clear(&mut self) {
        self.files.clear();
    }

    pub fn count(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Owned copy of the selection for one submission.
    pub fn snapshot(&self) -> Vec<SelectedFile> {
        self.files.clone()
    }
}
