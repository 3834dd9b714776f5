//! Entity kinds and their field tables.

macro_rules! impl_entity {
    ($ty:ident, $kind:ident, $table:ident) => {
        impl $crate::Entity for $ty {
            const KIND: labtransfer_types::EntityKind = labtransfer_types::EntityKind::$kind;

            fn id(&self) -> Option<labtransfer_types::DbId> {
                self.id
            }

            fn set_id(&mut self, id: labtransfer_types::DbId) {
                self.id = Some(id);
            }

            fn fields(&self) -> &'static $crate::FieldTable<Self> {
                &$table
            }

            fn into_record(self) -> $crate::Record {
                $crate::Record::$kind(self)
            }

            fn from_record(record: $crate::Record) -> Option<Self> {
                match record {
                    $crate::Record::$kind(inner) => Some(inner),
                    _ => None,
                }
            }
        }
    };
}

mod activity;
mod address;
mod organization;
mod person;
mod project;
mod publication;
mod teaching;
mod misc;
mod venue;

pub use activity::{Invitation, JuryMembership, Supervision, Supervisor};
pub use address::Address;
pub use misc::{ApplicationUser, GlobalIndicators, ScientificAxis};
pub use organization::{Membership, Organization};
pub use person::{Person, PhoneNumber};
pub use project::{AssociatedStructure, Holder, Project, ProjectBudget, ProjectParticipant};
pub use publication::{
    parse_month, Authorship, Publication, PublicationDetails, PublicationShape,
    PublicationType, MIN_PUBLICATION_YEAR,
};
pub use teaching::{AnnualWork, TeachingActivity};
pub use venue::{Conference, ConferenceQualityIndicators, Journal, JournalQualityIndicators};
