use labtransfer_model::{
    AssociatedStructure, FundingScheme, Holder, HolderRole, Labeled, ParticipantRole, Project, ProjectBudget,
    ProjectParticipant, TeachingActivity, TeachingActivityType,
};
use labtransfer_storage::{EntityStore, EntityStoreExt};
use labtransfer_types::{AttachmentSlot, DbId, EntityKind};
use serde_json::{Map, Value};
use tracing::{info, warn};

use super::{number, Fault, ImportRun};
use crate::document::{label_field, object_list, optional_str, section_elements, string_list};
use crate::ImportError;

const PROJECT_MANUAL: [&str; 9] = [
    "coordinator",
    "localOrganization",
    "superOrganization",
    "learOrganization",
    "otherPartners",
    "participants",
    "budgets",
    "videoURLs",
    "pathsToImages",
];

impl<S: EntityStore + ?Sized> ImportRun<'_, S> {
    pub(super) fn projects(&mut self, root: &Map<String, Value>) -> Result<(), ImportError> {
        const KIND: EntityKind = EntityKind::Project;
        let elements = section_elements(root, KIND)?;
        if elements.is_empty() {
            return Ok(());
        }
        info!("Importing {} {}", elements.len(), KIND.section());
        for (index, element) in elements.iter().enumerate() {
            let built = self.record(KIND, index, element, |run, element| {
                run.build_project(element).map(|id| (id, ()))
            })?;
            if built.is_some() {
                self.consume_axis_links(element);
            }
        }
        Ok(())
    }

    fn build_project(&mut self, element: &Map<String, Value>) -> Fault<DbId> {
        const ORG: EntityKind = EntityKind::Organization;
        let mut project = Project::default();
        self.bind_scalars(&mut project, element, &PROJECT_MANUAL)?;
        project.coordinator = Some(self.resolve(element, "coordinator", ORG)?);
        project.local_organization = Some(self.resolve(element, "localOrganization", ORG)?);
        project.super_organization = Some(self.resolve(element, "superOrganization", ORG)?);
        project.lear_organization = Some(self.resolve(element, "learOrganization", ORG)?);
        project.other_partners = self.resolve_list(element, "otherPartners", ORG)?;

        for entry in object_list(element, "participants")? {
            project.participants.push(ProjectParticipant {
                person: self.resolve(entry, "person", EntityKind::Person)?,
                role: label_field::<ParticipantRole>(entry, "role")?,
            });
        }
        for entry in object_list(element, "budgets")? {
            // Older documents name the scheme `fundingScheme`.
            let funding = optional_str(entry, "funding")
                .or_else(|| optional_str(entry, "fundingScheme"))
                .and_then(FundingScheme::parse_label)
                .unwrap_or_default();
            project.budgets.push(ProjectBudget {
                funding,
                budget: number(entry.get("budget")).map_or(0.0, |b| b as f32),
                grant: optional_str(entry, "grant").map(str::to_string),
            });
        }
        project.video_urls = string_list(element, "videoURLs")?;
        project.paths_to_images = string_list(element, "pathsToImages")?;
        project.scientific_axes = self.linked_axes(element);

        let id = self.save(&mut project)?;
        let mut changed = false;
        changed |= self.relocate(AttachmentSlot::ProjectLogo, id, 0, &mut project.path_to_logo);
        changed |= self.relocate(AttachmentSlot::ProjectPowerpoint, id, 0, &mut project.path_to_powerpoint);
        changed |= self.relocate(AttachmentSlot::ProjectPressDocument, id, 0, &mut project.path_to_press_document);
        changed |= self.relocate(
            AttachmentSlot::ProjectScientificRequirements,
            id,
            0,
            &mut project.path_to_scientific_requirements,
        );
        let mut images = Vec::with_capacity(project.paths_to_images.len());
        for (index, path) in std::mem::take(&mut project.paths_to_images).into_iter().enumerate() {
            let mut path = Some(path);
            changed |= self.relocate(AttachmentSlot::ProjectImage, id, index, &mut path);
            images.extend(path);
        }
        project.paths_to_images = images;
        if changed {
            self.store.store(project)?;
        }
        Ok(id)
    }

    pub(super) fn associated_structures(&mut self, root: &Map<String, Value>) -> Result<(), ImportError> {
        self.section(root, EntityKind::AssociatedStructure, |run, element| {
            let mut structure = AssociatedStructure::default();
            run.bind_scalars(&mut structure, element, &["funding", "holders", "projects"])?;
            structure.funding_organization = run.resolve_opt(element, "funding", EntityKind::Organization)?;
            for entry in object_list(element, "holders")? {
                // A holder's super-organization is informative only.
                let super_organization = run
                    .resolve_opt(entry, "superOrganization", EntityKind::Organization)
                    .unwrap_or_else(|fault| {
                        warn!("Ignored holder super-organization: {fault}");
                        None
                    });
                structure.holders.push(Holder {
                    person: run.resolve(entry, "person", EntityKind::Person)?,
                    role: label_field::<HolderRole>(entry, "role")?,
                    role_description: optional_str(entry, "roleDescription").map(str::to_string),
                    organization: run.resolve_opt(entry, "organization", EntityKind::Organization)?,
                    super_organization,
                });
            }
            structure.projects = run.resolve_list(element, "projects", EntityKind::Project)?;
            run.save(&mut structure)
        })
    }

    pub(super) fn teaching_activities(&mut self, root: &Map<String, Value>) -> Result<(), ImportError> {
        self.section(root, EntityKind::TeachingActivity, |run, element| {
            let mut activity = TeachingActivity::default();
            run.bind_scalars(&mut activity, element, &["person", "university", "annualWorkPerType"])?;
            activity.person = Some(run.resolve(element, "person", EntityKind::Person)?);
            activity.university = Some(run.resolve(element, "university", EntityKind::Organization)?);
            for entry in object_list(element, "annualWorkPerType")? {
                let activity_type = label_field::<TeachingActivityType>(entry, "type")?;
                let hours = number(entry.get("hours")).unwrap_or(0.0) as f32;
                activity.set_annual_hours(activity_type, hours);
            }
            let id = run.save(&mut activity)?;
            if run.relocate(AttachmentSlot::TeachingSlides, id, 0, &mut activity.path_to_slides) {
                run.store.store(activity)?;
            }
            Ok(id)
        })
    }
}
