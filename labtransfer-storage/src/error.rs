//! Error types for the storage layer.

use labtransfer_types::{DbId, EntityKind};
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur in storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Entity not found.
    #[error("{kind} #{id} not found")]
    NotFound { kind: EntityKind, id: DbId },

    /// A transaction is already open.
    #[error("a transaction is already active")]
    TransactionActive,

    /// Commit or rollback without an open transaction.
    #[error("no active transaction")]
    NoTransaction,

    /// Record stored under a kind it does not belong to.
    #[error("expected a {expected} record, found a {found} record")]
    KindMismatch {
        expected: EntityKind,
        found: EntityKind,
    },

    /// Backend-specific failure.
    #[error("storage backend error: {0}")]
    Backend(String),
}
