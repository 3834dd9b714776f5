use labtransfer_types::{AttachmentSlot, DbId};

/// Moves attachments referenced by imported records to their canonical
/// place.
pub trait FileCallback {
    /// Relocates the file named `path` for the record `id`. Returns the
    /// new path, or `None` when the file could not be found or moved, in
    /// which case the path field is removed.
    fn relocate(&mut self, slot: AttachmentSlot, id: DbId, index: usize, path: &str) -> Option<String>;

    /// Number of files moved so far.
    fn relocated(&self) -> usize;
}

/// Leaves every path as written in the document.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeepPaths;

impl FileCallback for KeepPaths {
    fn relocate(&mut self, _: AttachmentSlot, _: DbId, _: usize, path: &str) -> Option<String> {
        Some(path.to_string())
    }

    fn relocated(&self) -> usize {
        0
    }
}
