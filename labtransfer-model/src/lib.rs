//! Entity model of the lab data store, as seen by the transfer engine.
//!
//! - Entity structs for every kind, with typed relationship fields
//! - `Labeled` enumerations written by constant name
//! - Per-kind `FieldTable`s mapping canonical attribute names to typed
//!   accessor/mutator closures
//! - The `AliasTable` and the generic attribute projector built on them

#[macro_use]
mod labels;

mod alias;
mod entities;
mod field;
mod projector;
mod record;
mod scalar;

pub use alias::AliasTable;
pub use entities::{
    Address, AnnualWork, ApplicationUser, AssociatedStructure, Authorship, Conference,
    ConferenceQualityIndicators, GlobalIndicators, Holder, Invitation, Journal,
    JournalQualityIndicators, JuryMembership, Membership, Organization, Person, PhoneNumber,
    Project, ProjectBudget, ProjectParticipant, Publication, PublicationDetails, PublicationShape,
    PublicationType, ScientificAxis, Supervision, Supervisor, TeachingActivity, parse_month,
    MIN_PUBLICATION_YEAR,
};
pub use field::{Entity, FieldDef, FieldTable, TableBuilder};
pub use labels::*;
pub use projector::{bind_all, bind_field, project, Binding};
pub use record::Record;
pub use scalar::{format_date, parse_date, Scalar, ScalarType, DATE_FORMAT};

use labtransfer_types::EntityKind;

/// Errors raised while binding attributes or checking records.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    #[error("no mutator of {kind} accepts field '{field}'")]
    NoMutator { kind: EntityKind, field: String },

    #[error("invalid {kind}: {reason}")]
    Invalid { kind: EntityKind, reason: String },
}
