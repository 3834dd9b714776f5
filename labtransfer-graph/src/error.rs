//! Error types for graph export and import.

use labtransfer_model::ModelError;
use labtransfer_storage::StorageError;
use labtransfer_types::EntityKind;
use thiserror::Error;

/// Errors raised while exporting the graph.
#[derive(Debug, Error)]
pub enum ExportError {
    /// A relationship points to a record that is not part of the export.
    #[error("{owner} field '{field}' points to {target_kind} #{target}, which has no reference id")]
    UnresolvedReference {
        owner: EntityKind,
        field: &'static str,
        target_kind: EntityKind,
        target: String,
    },

    /// A required relationship is empty.
    #[error("{owner} #{id} has no value for required field '{field}'")]
    MissingRelation {
        owner: EntityKind,
        id: String,
        field: &'static str,
    },

    /// A stored record came back without its persisted id.
    #[error("a stored {0} record has no id")]
    MissingIdentity(EntityKind),

    /// The document could not be serialized.
    #[error("cannot write document: {0}")]
    Json(#[from] serde_json::Error),

    /// The store failed while being read.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Error taxonomy of record-level import failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultCategory {
    /// A reference id is unbound, duplicated, malformed or of the wrong kind.
    ReferenceIntegrity,
    /// A field name matches no mutator of the record type.
    MutatorResolution,
    /// A required value is missing or cannot be parsed.
    RequiredField,
    /// The store rejected the record.
    Storage,
}

/// Why one record could not be imported.
#[derive(Debug, Error)]
pub enum RecordFault {
    /// The section element is not an object.
    #[error("record is not a JSON object")]
    NotAnObject,

    /// The reference id is not bound to any imported record.
    #[error("field '{field}' references '{id}', which is not bound to any imported record")]
    UnboundReference { field: String, id: String },

    /// The reference id is bound to a record of another kind.
    #[error("field '{field}' references '{id}', a {found} where a {expected} is expected")]
    ReferenceKind {
        field: String,
        id: String,
        expected: EntityKind,
        found: EntityKind,
    },

    /// The value is not an `{"@id": ..}` object.
    #[error("field '{field}' is not a reference")]
    MalformedReference { field: String },

    /// Two records declare the same `@id`.
    #[error("reference id '{0}' is used by more than one record")]
    DuplicateId(String),

    /// A required field is absent or empty.
    #[error("missing required field '{0}'")]
    MissingField(String),

    /// A field value cannot be parsed.
    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    /// Attribute binding failed.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// The store rejected a read or write for this record.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl RecordFault {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn category(&self) -> FaultCategory {
        match self {
            Self::UnboundReference { .. }
            | Self::ReferenceKind { .. }
            | Self::MalformedReference { .. }
            | Self::DuplicateId(_) => FaultCategory::ReferenceIntegrity,
            Self::Model(ModelError::NoMutator { .. }) => FaultCategory::MutatorResolution,
            Self::NotAnObject
            | Self::MissingField(_)
            | Self::InvalidValue { .. }
            | Self::Model(ModelError::Invalid { .. }) => FaultCategory::RequiredField,
            Self::Storage(_) => FaultCategory::Storage,
        }
    }
}

/// A failed record, with enough context to find it in the document.
#[derive(Debug, Error)]
#[error("cannot import {section}[{index}]: {cause}\n{snapshot}")]
pub struct RecordError {
    pub section: &'static str,
    pub index: usize,
    /// Pretty-printed source record.
    pub snapshot: String,
    #[source]
    pub cause: RecordFault,
}

impl RecordError {
    #[must_use]
    pub fn new(section: &'static str, index: usize, source: &serde_json::Value, cause: RecordFault) -> Self {
        Self {
            section,
            index,
            snapshot: serde_json::to_string_pretty(source).unwrap_or_else(|_| source.to_string()),
            cause,
        }
    }
}

/// Errors that stop an import.
#[derive(Debug, Error)]
pub enum ImportError {
    /// A record failed under the fail-fast policy.
    #[error(transparent)]
    Record(Box<RecordError>),

    /// The root or a section has the wrong shape.
    #[error("invalid document: {0}")]
    InvalidDocument(String),

    /// The document text is not JSON.
    #[error("document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The store could not begin, commit or roll back a record.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ImportError {
    /// The failed record, when the import stopped on one.
    #[must_use]
    pub fn record(&self) -> Option<&RecordError> {
        match self {
            Self::Record(error) => Some(error),
            _ => None,
        }
    }
}
