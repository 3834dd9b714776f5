use std::sync::LazyLock;

use chrono::NaiveDate;
use labtransfer_types::DbId;

use crate::labels::{
    AssociatedStructureType, FundingScheme, HolderRole, ParticipantRole, ProjectActivityType,
    ProjectContractType, ProjectStatus, Trl,
};
use crate::FieldTable;

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectParticipant {
    pub person: DbId,
    pub role: ParticipantRole,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectBudget {
    pub funding: FundingScheme,
    pub budget: f32,
    pub grant: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Project {
    pub id: Option<DbId>,
    pub acronym: Option<String>,
    pub scientific_title: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    /// In months.
    pub duration: Option<i64>,
    pub global_budget: Option<f32>,
    pub status: ProjectStatus,
    pub activity_type: ProjectActivityType,
    pub contract_type: ProjectContractType,
    pub trl: Trl,
    pub confidential: bool,
    pub open_source: bool,
    pub project_url: Option<String>,
    pub path_to_logo: Option<String>,
    pub path_to_powerpoint: Option<String>,
    pub path_to_press_document: Option<String>,
    pub path_to_scientific_requirements: Option<String>,
    pub paths_to_images: Vec<String>,
    pub video_urls: Vec<String>,
    pub validated: bool,
    pub coordinator: Option<DbId>,
    pub local_organization: Option<DbId>,
    pub super_organization: Option<DbId>,
    pub lear_organization: Option<DbId>,
    pub other_partners: Vec<DbId>,
    pub participants: Vec<ProjectParticipant>,
    pub budgets: Vec<ProjectBudget>,
    pub scientific_axes: Vec<DbId>,
}

static PROJECT_FIELDS: LazyLock<FieldTable<Project>> = LazyLock::new(|| {
    FieldTable::<Project>::builder()
        .text("acronym", |p| p.acronym.clone(), |p, v| p.acronym = v)
        .text(
            "scientificTitle",
            |p| p.scientific_title.clone(),
            |p, v| p.scientific_title = v,
        )
        .text("description", |p| p.description.clone(), |p, v| p.description = v)
        .date("startDate", |p| p.start_date, |p, v| p.start_date = v)
        .integer("duration", |p| p.duration, |p, v| p.duration = Some(v))
        .float("globalBudget", |p| p.global_budget, |p, v| p.global_budget = Some(v))
        .enumeration("status", |p| p.status, |p, v| p.status = v)
        .enumeration("activityType", |p| p.activity_type, |p, v| p.activity_type = v)
        .enumeration("contractType", |p| p.contract_type, |p, v| p.contract_type = v)
        .enumeration("TRL", |p| p.trl, |p, v| p.trl = v)
        .flag("confidential", |p| p.confidential, |p, v| p.confidential = v)
        .flag("openSource", |p| p.open_source, |p, v| p.open_source = v)
        .text("projectURL", |p| p.project_url.clone(), |p, v| p.project_url = v)
        .text("pathToLogo", |p| p.path_to_logo.clone(), |p, v| p.path_to_logo = v)
        .text(
            "pathToPowerpoint",
            |p| p.path_to_powerpoint.clone(),
            |p, v| p.path_to_powerpoint = v,
        )
        .text(
            "pathToPressDocument",
            |p| p.path_to_press_document.clone(),
            |p, v| p.path_to_press_document = v,
        )
        .text(
            "pathToScientificRequirements",
            |p| p.path_to_scientific_requirements.clone(),
            |p, v| p.path_to_scientific_requirements = v,
        )
        .flag("validated", |p| p.validated, |p, v| p.validated = v)
        .build()
});

impl_entity!(Project, Project, PROJECT_FIELDS);

/// A holder of an associated structure.
#[derive(Debug, Clone, PartialEq)]
pub struct Holder {
    pub person: DbId,
    pub role: HolderRole,
    pub role_description: Option<String>,
    pub organization: Option<DbId>,
    pub super_organization: Option<DbId>,
}

/// A structure (company, network, institute) created around the lab.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssociatedStructure {
    pub id: Option<DbId>,
    pub acronym: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub creation_date: Option<NaiveDate>,
    pub creation_duration: Option<i64>,
    pub budget: Option<f32>,
    pub structure_type: AssociatedStructureType,
    pub confidential: bool,
    pub validated: bool,
    pub funding_organization: Option<DbId>,
    pub holders: Vec<Holder>,
    pub projects: Vec<DbId>,
}

static STRUCTURE_FIELDS: LazyLock<FieldTable<AssociatedStructure>> = LazyLock::new(|| {
    FieldTable::<AssociatedStructure>::builder()
        .text("acronym", |s| s.acronym.clone(), |s, v| s.acronym = v)
        .text("name", |s| s.name.clone(), |s, v| s.name = v)
        .text("description", |s| s.description.clone(), |s, v| s.description = v)
        .date("creationDate", |s| s.creation_date, |s, v| s.creation_date = v)
        .integer(
            "creationDuration",
            |s| s.creation_duration,
            |s, v| s.creation_duration = Some(v),
        )
        .float("budget", |s| s.budget, |s, v| s.budget = Some(v))
        .enumeration("type", |s| s.structure_type, |s, v| s.structure_type = v)
        .flag("confidential", |s| s.confidential, |s, v| s.confidential = v)
        .flag("validated", |s| s.validated, |s, v| s.validated = v)
        .build()
});

impl_entity!(AssociatedStructure, AssociatedStructure, STRUCTURE_FIELDS);
