use serde::{Deserialize, Serialize};

use crate::EntityKind;

/// A path-valued field whose target file travels inside the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttachmentSlot {
    PublicationPdf,
    PublicationAward,
    AddressBackground,
    OrganizationLogo,
    ProjectLogo,
    ProjectImage,
    ProjectScientificRequirements,
    ProjectPressDocument,
    ProjectPowerpoint,
    TeachingSlides,
}

impl AttachmentSlot {
    pub const ALL: [AttachmentSlot; 10] = [
        Self::PublicationPdf,
        Self::PublicationAward,
        Self::AddressBackground,
        Self::OrganizationLogo,
        Self::ProjectLogo,
        Self::ProjectImage,
        Self::ProjectScientificRequirements,
        Self::ProjectPressDocument,
        Self::ProjectPowerpoint,
        Self::TeachingSlides,
    ];

    /// Kind of the record owning the path field.
    #[must_use]
    pub const fn kind(self) -> EntityKind {
        match self {
            Self::PublicationPdf | Self::PublicationAward => EntityKind::Publication,
            Self::AddressBackground => EntityKind::Address,
            Self::OrganizationLogo => EntityKind::Organization,
            Self::ProjectLogo
            | Self::ProjectImage
            | Self::ProjectScientificRequirements
            | Self::ProjectPressDocument
            | Self::ProjectPowerpoint => EntityKind::Project,
            Self::TeachingSlides => EntityKind::TeachingActivity,
        }
    }

    /// Document field carrying the path. For `ProjectImage` the field is
    /// an array of paths.
    #[must_use]
    pub const fn field(self) -> &'static str {
        match self {
            Self::PublicationPdf => "pathToDownloadablePDF",
            Self::PublicationAward => "pathToDownloadableAwardCertificate",
            Self::AddressBackground => "pathToBackgroundImage",
            Self::OrganizationLogo | Self::ProjectLogo => "pathToLogo",
            Self::ProjectImage => "pathsToImages",
            Self::ProjectScientificRequirements => "pathToScientificRequirements",
            Self::ProjectPressDocument => "pathToPressDocument",
            Self::ProjectPowerpoint => "pathToPowerpoint",
            Self::TeachingSlides => "pathToSlides",
        }
    }

    #[must_use]
    pub const fn is_indexed(self) -> bool {
        matches!(self, Self::ProjectImage)
    }

    /// Slots owned by records of `kind`.
    pub fn for_kind(kind: EntityKind) -> impl Iterator<Item = AttachmentSlot> {
        Self::ALL.into_iter().filter(move |s| s.kind() == kind)
    }
}
