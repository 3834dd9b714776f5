//! Error types for the container crate.

use labtransfer_graph::{ExportError, ImportError};
use thiserror::Error;

pub type ArchiveResult<T> = Result<T, ArchiveError>;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("more than one document entry in the container: {0}")]
    DuplicateDocument(String),

    #[error("entry name escapes the container root: {0}")]
    UnsafeEntry(String),
}
