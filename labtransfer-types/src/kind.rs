use serde::{Deserialize, Serialize};
use std::fmt;

use crate::Error;

/// The fixed set of entity kinds handled by the transfer engine.
///
/// Variant order is the processing order on both export and import:
/// every kind only references kinds declared before it, apart from the
/// same-section hierarchies (organizations, conferences) and the
/// scientific-axis links, which are wired in a second pass.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    GlobalIndicators,
    Address,
    Organization,
    ScientificAxis,
    Person,
    Journal,
    Conference,
    Membership,
    Publication,
    JuryMembership,
    Supervision,
    Invitation,
    Project,
    AssociatedStructure,
    TeachingActivity,
    ApplicationUser,
}

impl EntityKind {
    /// Every kind, in processing order.
    pub const ALL: [EntityKind; 16] = [
        Self::GlobalIndicators,
        Self::Address,
        Self::Organization,
        Self::ScientificAxis,
        Self::Person,
        Self::Journal,
        Self::Conference,
        Self::Membership,
        Self::Publication,
        Self::JuryMembership,
        Self::Supervision,
        Self::Invitation,
        Self::Project,
        Self::AssociatedStructure,
        Self::TeachingActivity,
        Self::ApplicationUser,
    ];

    /// Prefix of the document-local ids of this kind. Empty for the
    /// singleton global indicators, which are never referenced.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::GlobalIndicators => "",
            Self::Address => "/adr#",
            Self::Organization => "/ro#",
            Self::ScientificAxis => "/axis#",
            Self::Person => "/pers#",
            Self::Journal => "/jour#",
            Self::Conference => "/conf#",
            Self::Membership => "/mbr#",
            Self::Publication => "/publi#",
            Self::JuryMembership => "/jury#",
            Self::Supervision => "/sup#",
            Self::Invitation => "/inv#",
            Self::Project => "/prj#",
            Self::AssociatedStructure => "/assostr#",
            Self::TeachingActivity => "/teach#",
            Self::ApplicationUser => "/user#",
        }
    }

    /// Top-level document field holding this kind's records.
    #[must_use]
    pub const fn section(self) -> &'static str {
        match self {
            Self::GlobalIndicators => "globalIndicators",
            Self::Address => "organizationAddresses",
            Self::Organization => "researchOrganizations",
            Self::ScientificAxis => "scientificAxes",
            Self::Person => "persons",
            Self::Journal => "journals",
            Self::Conference => "conferences",
            Self::Membership => "organizationMemberships",
            Self::Publication => "publications",
            Self::JuryMembership => "juryMemberships",
            Self::Supervision => "supervisions",
            Self::Invitation => "invitations",
            Self::Project => "projects",
            Self::AssociatedStructure => "associatedStructures",
            Self::TeachingActivity => "teachingActivities",
            Self::ApplicationUser => "applicationUsers",
        }
    }

    /// Human-readable label used in logs and progress phases.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::GlobalIndicators => "global indicators",
            Self::Address => "addresses",
            Self::Organization => "research organizations",
            Self::ScientificAxis => "scientific axes",
            Self::Person => "persons",
            Self::Journal => "journals",
            Self::Conference => "conferences",
            Self::Membership => "organization memberships",
            Self::Publication => "publications",
            Self::JuryMembership => "jury memberships",
            Self::Supervision => "supervisions",
            Self::Invitation => "invitations",
            Self::Project => "projects",
            Self::AssociatedStructure => "associated structures",
            Self::TeachingActivity => "teaching activities",
            Self::ApplicationUser => "application users",
        }
    }

    /// Looks up a kind by its section name.
    pub fn from_section(section: &str) -> Result<Self, Error> {
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.section() == section)
            .ok_or_else(|| Error::UnknownSection(section.to_string()))
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
