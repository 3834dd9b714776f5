//! Collaborators feeding the exporter with records that are not, or not
//! only, in the store.

use labtransfer_model::Publication;
use labtransfer_types::{DbId, TransientId};

/// Supplies same-kind records used to complete missing attribute values
/// of a stored publication.
pub trait SimilarPublicationProvider {
    fn similar(&self, publication: &Publication) -> Vec<Publication>;
}

/// An author of an external publication.
#[derive(Debug, Clone, PartialEq)]
pub enum ExternalAuthor {
    /// A person already in the store.
    Known(DbId),
    /// A person only known by name. Authors sharing an identity are
    /// written once.
    Unknown {
        identity: TransientId,
        first_name: String,
        last_name: String,
    },
}

impl ExternalAuthor {
    #[must_use]
    pub fn unknown(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self::Unknown {
            identity: TransientId::new(),
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }
}

/// A publication from an external catalog, merged into the export.
#[derive(Debug, Clone, PartialEq)]
pub struct ExternalPublication {
    pub identity: TransientId,
    /// Journal or conference references must point into the store.
    pub publication: Publication,
    pub authors: Vec<ExternalAuthor>,
}

impl ExternalPublication {
    #[must_use]
    pub fn new(publication: Publication, authors: Vec<ExternalAuthor>) -> Self {
        Self {
            identity: TransientId::new(),
            publication,
            authors,
        }
    }
}

/// Supplies publications that exist outside the store.
pub trait ExtraPublicationProvider {
    fn publications(&self) -> Vec<ExternalPublication>;
}
