use labtransfer_types::{DbId, EntityKind};

use crate::entities::{
    Address, ApplicationUser, AssociatedStructure, Conference, GlobalIndicators, Invitation,
    Journal, JuryMembership, Membership, Organization, Person, Project, Publication,
    ScientificAxis, Supervision, TeachingActivity,
};

/// Any persisted record, as exchanged with the storage collaborator.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    GlobalIndicators(GlobalIndicators),
    Address(Address),
    Organization(Organization),
    ScientificAxis(ScientificAxis),
    Person(Person),
    Journal(Journal),
    Conference(Conference),
    Membership(Membership),
    Publication(Publication),
    JuryMembership(JuryMembership),
    Supervision(Supervision),
    Invitation(Invitation),
    Project(Project),
    AssociatedStructure(AssociatedStructure),
    TeachingActivity(TeachingActivity),
    ApplicationUser(ApplicationUser),
}

macro_rules! each_record {
    ($record:expr, $inner:ident => $body:expr) => {
        match $record {
            Record::GlobalIndicators($inner) => $body,
            Record::Address($inner) => $body,
            Record::Organization($inner) => $body,
            Record::ScientificAxis($inner) => $body,
            Record::Person($inner) => $body,
            Record::Journal($inner) => $body,
            Record::Conference($inner) => $body,
            Record::Membership($inner) => $body,
            Record::Publication($inner) => $body,
            Record::JuryMembership($inner) => $body,
            Record::Supervision($inner) => $body,
            Record::Invitation($inner) => $body,
            Record::Project($inner) => $body,
            Record::AssociatedStructure($inner) => $body,
            Record::TeachingActivity($inner) => $body,
            Record::ApplicationUser($inner) => $body,
        }
    };
}

impl Record {
    #[must_use]
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::GlobalIndicators(_) => EntityKind::GlobalIndicators,
            Self::Address(_) => EntityKind::Address,
            Self::Organization(_) => EntityKind::Organization,
            Self::ScientificAxis(_) => EntityKind::ScientificAxis,
            Self::Person(_) => EntityKind::Person,
            Self::Journal(_) => EntityKind::Journal,
            Self::Conference(_) => EntityKind::Conference,
            Self::Membership(_) => EntityKind::Membership,
            Self::Publication(_) => EntityKind::Publication,
            Self::JuryMembership(_) => EntityKind::JuryMembership,
            Self::Supervision(_) => EntityKind::Supervision,
            Self::Invitation(_) => EntityKind::Invitation,
            Self::Project(_) => EntityKind::Project,
            Self::AssociatedStructure(_) => EntityKind::AssociatedStructure,
            Self::TeachingActivity(_) => EntityKind::TeachingActivity,
            Self::ApplicationUser(_) => EntityKind::ApplicationUser,
        }
    }

    #[must_use]
    pub fn id(&self) -> Option<DbId> {
        use crate::Entity;
        each_record!(self, r => r.id())
    }

    pub fn set_id(&mut self, id: DbId) {
        use crate::Entity;
        each_record!(self, r => r.set_id(id))
    }
}
