use std::fmt;

use labtransfer_types::EntityKind;
use serde::Serialize;

use crate::RecordError;

/// Records created by one import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportStats {
    pub addresses: usize,
    pub organizations: usize,
    pub scientific_axes: usize,
    pub persons: usize,
    /// Persons created on the fly for authors given by name.
    pub authors: usize,
    pub journals: usize,
    pub conferences: usize,
    pub memberships: usize,
    pub publications: usize,
    pub jury_memberships: usize,
    pub supervisions: usize,
    pub invitations: usize,
    pub projects: usize,
    pub associated_structures: usize,
    pub teaching_activities: usize,
    pub application_users: usize,
    /// Attachment files moved to their canonical place.
    pub attachments: usize,
}

impl ImportStats {
    fn counter(&mut self, kind: EntityKind) -> Option<&mut usize> {
        Some(match kind {
            EntityKind::GlobalIndicators => return None,
            EntityKind::Address => &mut self.addresses,
            EntityKind::Organization => &mut self.organizations,
            EntityKind::ScientificAxis => &mut self.scientific_axes,
            EntityKind::Person => &mut self.persons,
            EntityKind::Journal => &mut self.journals,
            EntityKind::Conference => &mut self.conferences,
            EntityKind::Membership => &mut self.memberships,
            EntityKind::Publication => &mut self.publications,
            EntityKind::JuryMembership => &mut self.jury_memberships,
            EntityKind::Supervision => &mut self.supervisions,
            EntityKind::Invitation => &mut self.invitations,
            EntityKind::Project => &mut self.projects,
            EntityKind::AssociatedStructure => &mut self.associated_structures,
            EntityKind::TeachingActivity => &mut self.teaching_activities,
            EntityKind::ApplicationUser => &mut self.application_users,
        })
    }

    /// Counts one created record of `kind`.
    pub fn record(&mut self, kind: EntityKind) {
        if let Some(counter) = self.counter(kind) {
            *counter += 1;
        }
    }

    /// Created records of `kind`.
    #[must_use]
    pub fn created(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::GlobalIndicators => 0,
            EntityKind::Address => self.addresses,
            EntityKind::Organization => self.organizations,
            EntityKind::ScientificAxis => self.scientific_axes,
            EntityKind::Person => self.persons,
            EntityKind::Journal => self.journals,
            EntityKind::Conference => self.conferences,
            EntityKind::Membership => self.memberships,
            EntityKind::Publication => self.publications,
            EntityKind::JuryMembership => self.jury_memberships,
            EntityKind::Supervision => self.supervisions,
            EntityKind::Invitation => self.invitations,
            EntityKind::Project => self.projects,
            EntityKind::AssociatedStructure => self.associated_structures,
            EntityKind::TeachingActivity => self.teaching_activities,
            EntityKind::ApplicationUser => self.application_users,
        }
    }

    /// Created records over every kind, stub authors excluded.
    #[must_use]
    pub fn total(&self) -> usize {
        EntityKind::ALL.iter().map(|k| self.created(*k)).sum()
    }
}

impl fmt::Display for ImportStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "addresses={}, organizations={}, scientific axes={}, persons={}, authors={}, \
             journals={}, conferences={}, memberships={}, publications={}, jury memberships={}, \
             supervisions={}, invitations={}, projects={}, associated structures={}, \
             teaching activities={}, application users={}, attachments={}",
            self.addresses,
            self.organizations,
            self.scientific_axes,
            self.persons,
            self.authors,
            self.journals,
            self.conferences,
            self.memberships,
            self.publications,
            self.jury_memberships,
            self.supervisions,
            self.invitations,
            self.projects,
            self.associated_structures,
            self.teaching_activities,
            self.application_users,
            self.attachments,
        )
    }
}

/// Outcome of an import that did not abort.
#[derive(Debug, Default)]
pub struct ImportReport {
    pub stats: ImportStats,
    /// Failed records, in document order. Always empty under fail-fast.
    pub failures: Vec<RecordError>,
    /// True when nothing was written to the target store.
    pub dry_run: bool,
}

impl ImportReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}
