//! Core type definitions for the lab data transfer engine.
//!
//! This crate defines the vocabulary shared by the exporter, the importer
//! and the container format:
//! - Persisted identifiers (`DbId`) and document-local reference ids (`JsonId`)
//! - Transient identities for records that were never persisted (UUID v7)
//! - The catalog of entity kinds, with their id prefixes and section names
//! - Reserved document field names
//! - Attachment slots and the path fields that carry them

mod attachment;
mod fields;
mod ids;
mod kind;

pub use attachment::AttachmentSlot;
pub use fields::{
    is_reserved_key, DATABASE_ID_FIELD, GENERATION_DATE_FIELD, HIDDEN_PREFIX, ID_FIELD,
    SOURCE_DATABASE, SOURCE_EXTERNAL, SOURCE_FIELD, SPECIAL_PREFIX,
};
pub use ids::{DbId, JsonId, TransientId};
pub use kind::EntityKind;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid database id: {0}")]
    InvalidDbId(String),

    #[error("no entity kind uses the reference prefix of {0}")]
    UnknownPrefix(String),

    #[error("unknown section: {0}")]
    UnknownSection(String),
}
