//! Graph exporter: store to transfer document.

use std::collections::HashMap;

use chrono::Local;
use labtransfer_model::{
    project, Address, ApplicationUser, AssociatedStructure, Conference, Entity, GlobalIndicators,
    Invitation, Journal, JuryMembership, Membership, Organization, Person, Project, Publication,
    Scalar, ScientificAxis, Supervision, TeachingActivity,
};
use labtransfer_storage::{EntityStore, EntityStoreExt};
use labtransfer_types::{
    DbId, EntityKind, JsonId, DATABASE_ID_FIELD, ID_FIELD, SOURCE_DATABASE, SOURCE_EXTERNAL,
    SOURCE_FIELD,
};
use serde_json::{json, Map, Value};
use tracing::{debug, info};

use crate::document::{put_label, reference, DocumentBuilder};
use crate::providers::{ExternalAuthor, ExternalPublication};
use crate::registry::{ReferenceRegistry, RegistryKey};
use crate::{
    ExportError, ExportSettings, ExtraPublicationProvider, NoProgress, ProgressSink, SimilarPublicationProvider,
};

type ExportResult<T> = Result<T, ExportError>;

/// Exporter inputs besides the store.
#[derive(Clone, Copy)]
pub struct ExportOptions<'a> {
    pub settings: &'a ExportSettings,
    pub similar: Option<&'a dyn SimilarPublicationProvider>,
    pub extra: Option<&'a dyn ExtraPublicationProvider>,
}

impl<'a> ExportOptions<'a> {
    #[must_use]
    pub fn new(settings: &'a ExportSettings) -> Self {
        Self {
            settings,
            similar: None,
            extra: None,
        }
    }

    #[must_use]
    pub fn with_similar(mut self, provider: &'a dyn SimilarPublicationProvider) -> Self {
        self.similar = Some(provider);
        self
    }

    #[must_use]
    pub fn with_extra(mut self, provider: &'a dyn ExtraPublicationProvider) -> Self {
        self.extra = Some(provider);
        self
    }
}

impl std::fmt::Debug for ExportOptions<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportOptions")
            .field("settings", self.settings)
            .field("similar", &self.similar.is_some())
            .field("extra", &self.extra.is_some())
            .finish()
    }
}

/// Walks a store section by section and writes the transfer document.
pub struct GraphExporter<'a, S: EntityStore + ?Sized> {
    store: &'a S,
    options: ExportOptions<'a>,
}

impl<'a, S: EntityStore + ?Sized> GraphExporter<'a, S> {
    #[must_use]
    pub fn new(store: &'a S, options: ExportOptions<'a>) -> Self {
        Self { store, options }
    }

    /// Builds the document, or `None` when the store holds nothing.
    pub fn export(&self) -> ExportResult<Option<Value>> {
        self.export_with(&mut NoProgress)
    }

    /// Builds the document, reporting one progress step per section.
    pub fn export_with(&self, progress: &mut dyn ProgressSink) -> ExportResult<Option<Value>> {
        let mut run = ExportRun {
            store: self.store,
            options: self.options,
            registry: ReferenceRegistry::new(),
            doc: DocumentBuilder::new(),
            axes: HashMap::new(),
            axis_links: Vec::new(),
        };
        progress.start(EntityKind::ALL.len(), "Exporting store");
        for kind in EntityKind::ALL {
            progress.step(kind.label());
            match kind {
                EntityKind::GlobalIndicators => run.global_indicators()?,
                EntityKind::Address => run.addresses()?,
                EntityKind::Organization => run.organizations()?,
                EntityKind::ScientificAxis => run.scientific_axes()?,
                EntityKind::Person => run.persons()?,
                EntityKind::Journal => run.journals()?,
                EntityKind::Conference => run.conferences()?,
                EntityKind::Membership => run.memberships()?,
                EntityKind::Publication => run.publications()?,
                EntityKind::JuryMembership => run.jury_memberships()?,
                EntityKind::Supervision => run.supervisions()?,
                EntityKind::Invitation => run.invitations()?,
                EntityKind::Project => run.projects()?,
                EntityKind::AssociatedStructure => run.associated_structures()?,
                EntityKind::TeachingActivity => run.teaching_activities()?,
                EntityKind::ApplicationUser => run.application_users()?,
            }
        }
        run.link_axes();
        progress.finish();

        let date = self
            .options
            .settings
            .generation_date
            .unwrap_or_else(|| Local::now().date_naive());
        let document = run.doc.finish(date);
        match &document {
            Some(_) => info!("Exported graph dated {date}"),
            None => info!("Store is empty, nothing to export"),
        }
        Ok(document)
    }

    /// Builds the document as JSON text, indented when the settings ask for
    /// it.
    pub fn export_json(&self) -> ExportResult<Option<String>> {
        let Some(document) = self.export()? else {
            return Ok(None);
        };
        let text = if self.options.settings.pretty {
            serde_json::to_string_pretty(&document)?
        } else {
            serde_json::to_string(&document)?
        };
        Ok(Some(text))
    }
}

/// A scientific-axis edge recorded while exporting the linked record.
struct AxisLink {
    axis: usize,
    field: &'static str,
    target: JsonId,
}

struct ExportRun<'a, S: EntityStore + ?Sized> {
    store: &'a S,
    options: ExportOptions<'a>,
    registry: ReferenceRegistry,
    doc: DocumentBuilder,
    /// Axis record id to node index.
    axes: HashMap<DbId, usize>,
    axis_links: Vec<AxisLink>,
}

impl<S: EntityStore + ?Sized> ExportRun<'_, S> {
    // ── Helpers ──────────────────────────────────────────────────

    /// Assigns the json-id of `entity` and opens its node with the
    /// projected attributes.
    fn open<T: Entity>(&mut self, entity: &T, fallbacks: &[T]) -> ExportResult<(DbId, JsonId, Map<String, Value>)> {
        let id = entity.id().ok_or(ExportError::MissingIdentity(T::KIND))?;
        let json_id = self.registry.assign(RegistryKey::Stored(T::KIND, id));
        let mut node = Map::new();
        node.insert(ID_FIELD.to_string(), Value::String(json_id.to_string()));
        node.extend(project(entity, fallbacks));
        Ok((id, json_id, node))
    }

    fn stored_ref(
        &self,
        owner: EntityKind,
        field: &'static str,
        target_kind: EntityKind,
        target: DbId,
    ) -> ExportResult<Value> {
        self.registry
            .lookup(&RegistryKey::Stored(target_kind, target))
            .map(reference)
            .ok_or_else(|| ExportError::UnresolvedReference {
                owner,
                field,
                target_kind,
                target: target.to_string(),
            })
    }

    fn put_ref(
        &self,
        node: &mut Map<String, Value>,
        owner: EntityKind,
        field: &'static str,
        target_kind: EntityKind,
        target: Option<DbId>,
    ) -> ExportResult<()> {
        if let Some(target) = target {
            node.insert(field.to_string(), self.stored_ref(owner, field, target_kind, target)?);
        }
        Ok(())
    }

    fn put_required_ref(
        &self,
        node: &mut Map<String, Value>,
        owner: (EntityKind, &JsonId),
        field: &'static str,
        target_kind: EntityKind,
        target: Option<DbId>,
    ) -> ExportResult<()> {
        let target = target.ok_or_else(|| ExportError::MissingRelation {
            owner: owner.0,
            id: owner.1.to_string(),
            field,
        })?;
        node.insert(field.to_string(), self.stored_ref(owner.0, field, target_kind, target)?);
        Ok(())
    }

    fn put_ref_list(
        &self,
        node: &mut Map<String, Value>,
        owner: EntityKind,
        field: &'static str,
        target_kind: EntityKind,
        targets: &[DbId],
    ) -> ExportResult<()> {
        if targets.is_empty() {
            return Ok(());
        }
        let refs = targets
            .iter()
            .map(|t| self.stored_ref(owner, field, target_kind, *t))
            .collect::<ExportResult<Vec<_>>>()?;
        node.insert(field.to_string(), Value::Array(refs));
        Ok(())
    }

    fn put_strings(node: &mut Map<String, Value>, field: &str, values: &[String]) {
        let values: Vec<Value> = values
            .iter()
            .filter(|v| !v.trim().is_empty())
            .map(|v| Value::String(v.clone()))
            .collect();
        if !values.is_empty() {
            node.insert(field.to_string(), Value::Array(values));
        }
    }

    fn defer_axes(&mut self, owner: EntityKind, field: &'static str, target: &JsonId, axes: &[DbId]) -> ExportResult<()> {
        for axis in axes {
            let index = *self.axes.get(axis).ok_or_else(|| ExportError::UnresolvedReference {
                owner,
                field: "scientificAxes",
                target_kind: EntityKind::ScientificAxis,
                target: axis.to_string(),
            })?;
            self.axis_links.push(AxisLink {
                axis: index,
                field,
                target: target.clone(),
            });
        }
        Ok(())
    }

    fn section_done(&self, kind: EntityKind) {
        let count = self.doc.len(kind);
        if count > 0 {
            info!("Exported {} {}", count, kind.section());
        }
    }

    // ── Sections ─────────────────────────────────────────────────

    fn global_indicators(&mut self) -> ExportResult<()> {
        let Some(global) = self.store.all::<GlobalIndicators>()?.into_iter().next() else {
            return Ok(());
        };
        if global.visible_indicators.is_empty() {
            return Ok(());
        }
        let mut node = Map::new();
        node.insert("visibleGlobalIndicators".into(), json!(global.visible_indicators));
        self.doc.set_global(node);
        Ok(())
    }

    fn addresses(&mut self) -> ExportResult<()> {
        for address in self.store.all::<Address>()? {
            let (_, _, node) = self.open(&address, &[])?;
            self.doc.push(EntityKind::Address, node);
        }
        self.section_done(EntityKind::Address);
        Ok(())
    }

    fn organizations(&mut self) -> ExportResult<()> {
        const KIND: EntityKind = EntityKind::Organization;
        let mut deferred = Vec::new();
        for organization in self.store.all::<Organization>()? {
            let (_, _, mut node) = self.open(&organization, &[])?;
            put_label(&mut node, "type", organization.organization_type);
            self.put_ref_list(&mut node, KIND, "addresses", EntityKind::Address, &organization.addresses)?;
            let index = self.doc.push(KIND, node);
            if !organization.super_organizations.is_empty() {
                deferred.push((index, organization.super_organizations));
            }
        }
        // Every organization has its json-id now, whatever the storage order.
        for (index, supers) in deferred {
            let refs = supers
                .iter()
                .map(|s| self.stored_ref(KIND, "superOrganizations", KIND, *s))
                .collect::<ExportResult<Vec<_>>>()?;
            if let Some(node) = self.doc.node_mut(KIND, index) {
                node.insert("superOrganizations".into(), Value::Array(refs));
            }
        }
        self.section_done(KIND);
        Ok(())
    }

    fn scientific_axes(&mut self) -> ExportResult<()> {
        for axis in self.store.all::<ScientificAxis>()? {
            let (id, _, node) = self.open(&axis, &[])?;
            let index = self.doc.push(EntityKind::ScientificAxis, node);
            self.axes.insert(id, index);
        }
        self.section_done(EntityKind::ScientificAxis);
        Ok(())
    }

    fn persons(&mut self) -> ExportResult<()> {
        for person in self.store.all::<Person>()? {
            let (_, _, mut node) = self.open(&person, &[])?;
            put_label(&mut node, "gender", person.gender);
            if let Some(phone) = &person.office_phone {
                node.insert("officePhone".into(), phone.to_json());
            }
            if let Some(phone) = &person.mobile_phone {
                node.insert("mobilePhone".into(), phone.to_json());
            }
            self.doc.push(EntityKind::Person, node);
        }
        self.section_done(EntityKind::Person);
        Ok(())
    }

    fn journals(&mut self) -> ExportResult<()> {
        for journal in self.store.all::<Journal>()? {
            let (_, _, mut node) = self.open(&journal, &[])?;
            let mut history = Map::new();
            for (year, indicators) in journal.quality_indicators.iter().filter(|(_, i)| !i.is_empty()) {
                let mut entry = Map::new();
                if let Some(q) = indicators.scimago_q_index {
                    put_label(&mut entry, "scimagoQIndex", q);
                }
                if let Some(q) = indicators.wos_q_index {
                    put_label(&mut entry, "wosQIndex", q);
                }
                if let Some(factor) = indicators.impact_factor {
                    entry.insert("impactFactor".into(), Scalar::Float(factor).to_json());
                }
                history.insert(year.to_string(), Value::Object(entry));
            }
            if !history.is_empty() {
                node.insert("qualityIndicatorsHistory".into(), Value::Object(history));
            }
            self.doc.push(EntityKind::Journal, node);
        }
        self.section_done(EntityKind::Journal);
        Ok(())
    }

    fn conferences(&mut self) -> ExportResult<()> {
        const KIND: EntityKind = EntityKind::Conference;
        let mut deferred = Vec::new();
        for conference in self.store.all::<Conference>()? {
            let (_, _, mut node) = self.open(&conference, &[])?;
            let mut history = Map::new();
            for (year, indicators) in &conference.quality_indicators {
                if let Some(core) = indicators.core_index {
                    let mut entry = Map::new();
                    put_label(&mut entry, "coreIndex", core);
                    history.insert(year.to_string(), Value::Object(entry));
                }
            }
            if !history.is_empty() {
                node.insert("qualityIndicatorsHistory".into(), Value::Object(history));
            }
            let index = self.doc.push(KIND, node);
            if let Some(enclosing) = conference.enclosing_conference {
                deferred.push((index, enclosing));
            }
        }
        for (index, enclosing) in deferred {
            let edge = self.stored_ref(KIND, "enclosingConference", KIND, enclosing)?;
            if let Some(node) = self.doc.node_mut(KIND, index) {
                node.insert("enclosingConference".into(), edge);
            }
        }
        self.section_done(KIND);
        Ok(())
    }

    fn memberships(&mut self) -> ExportResult<()> {
        const KIND: EntityKind = EntityKind::Membership;
        for membership in self.store.all::<Membership>()? {
            let (_, json_id, mut node) = self.open(&membership, &[])?;
            put_label(&mut node, "memberStatus", membership.status);
            self.put_required_ref(&mut node, (KIND, &json_id), "person", EntityKind::Person, membership.person)?;
            self.put_required_ref(
                &mut node,
                (KIND, &json_id),
                "researchOrganization",
                EntityKind::Organization,
                membership.organization,
            )?;
            self.put_ref(
                &mut node,
                KIND,
                "superOrganization",
                EntityKind::Organization,
                membership.super_organization,
            )?;
            self.put_ref(&mut node, KIND, "address", EntityKind::Address, membership.address)?;
            self.defer_axes(KIND, "memberships", &json_id, &membership.scientific_axes)?;
            self.doc.push(KIND, node);
        }
        self.section_done(KIND);
        Ok(())
    }

    /// Relationship and enumeration fields shared by stored and external
    /// publications. Authors are written by the caller.
    fn publication_node(&mut self, publication: &Publication, node: &mut Map<String, Value>) -> ExportResult<()> {
        const KIND: EntityKind = EntityKind::Publication;
        if let Some(ty) = publication.publication_type {
            put_label(node, "type", ty);
        }
        put_label(node, "majorLanguage", publication.major_language);
        self.put_ref(node, KIND, "journal", EntityKind::Journal, publication.journal)?;
        self.put_ref(node, KIND, "conference", EntityKind::Conference, publication.conference)?;
        Ok(())
    }

    fn publications(&mut self) -> ExportResult<()> {
        const KIND: EntityKind = EntityKind::Publication;
        for publication in self.store.all::<Publication>()? {
            let fallbacks = self
                .options
                .similar
                .map(|provider| provider.similar(&publication))
                .unwrap_or_default();
            let (id, json_id, mut node) = self.open(&publication, &fallbacks)?;
            self.publication_node(&publication, &mut node)?;
            let mut authors = publication.authors.clone();
            authors.sort_by_key(|a| a.rank);
            let refs = authors
                .iter()
                .map(|a| self.stored_ref(KIND, "authors", EntityKind::Person, a.person))
                .collect::<ExportResult<Vec<_>>>()?;
            node.insert("authors".into(), Value::Array(refs));
            node.insert(SOURCE_FIELD.into(), Value::String(SOURCE_DATABASE.into()));
            node.insert(DATABASE_ID_FIELD.into(), json!(id.get()));
            self.defer_axes(KIND, "publications", &json_id, &publication.scientific_axes)?;
            self.doc.push(KIND, node);
        }

        let external = self
            .options
            .extra
            .map(|provider| provider.publications())
            .unwrap_or_default();
        for publication in external {
            self.external_publication(publication)?;
        }
        self.section_done(KIND);
        Ok(())
    }

    fn external_publication(&mut self, external: ExternalPublication) -> ExportResult<()> {
        const KIND: EntityKind = EntityKind::Publication;
        let json_id = self
            .registry
            .assign(RegistryKey::Transient(KIND, external.identity));
        let mut node = Map::new();
        node.insert(ID_FIELD.to_string(), Value::String(json_id.to_string()));
        node.extend(project(&external.publication, &[]));
        self.publication_node(&external.publication, &mut node)?;

        let mut refs = Vec::with_capacity(external.authors.len());
        for author in &external.authors {
            let edge = match author {
                ExternalAuthor::Known(person) => self.stored_ref(KIND, "authors", EntityKind::Person, *person)?,
                ExternalAuthor::Unknown {
                    identity,
                    first_name,
                    last_name,
                } => {
                    let key = RegistryKey::Transient(EntityKind::Person, *identity);
                    if let Some(id) = self.registry.lookup(&key) {
                        reference(id)
                    } else {
                        let id = self.registry.assign(key);
                        let mut person = Map::new();
                        person.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
                        person.insert("firstName".into(), Value::String(first_name.clone()));
                        person.insert("lastName".into(), Value::String(last_name.clone()));
                        self.doc.push(EntityKind::Person, person);
                        debug!("Added external author {} {}", first_name, last_name);
                        reference(&id)
                    }
                }
            };
            refs.push(edge);
        }
        node.insert("authors".into(), Value::Array(refs));
        node.insert(SOURCE_FIELD.into(), Value::String(SOURCE_EXTERNAL.into()));
        self.defer_axes(KIND, "publications", &json_id, &external.publication.scientific_axes)?;
        self.doc.push(KIND, node);
        Ok(())
    }

    fn jury_memberships(&mut self) -> ExportResult<()> {
        const KIND: EntityKind = EntityKind::JuryMembership;
        for jury in self.store.all::<JuryMembership>()? {
            let (_, json_id, mut node) = self.open(&jury, &[])?;
            put_label(&mut node, "type", jury.membership_type);
            put_label(&mut node, "defenseType", jury.defense_type);
            self.put_required_ref(&mut node, (KIND, &json_id), "person", EntityKind::Person, jury.person)?;
            self.put_required_ref(&mut node, (KIND, &json_id), "candidate", EntityKind::Person, jury.candidate)?;
            self.put_ref_list(&mut node, KIND, "promoters", EntityKind::Person, &jury.promoters)?;
            self.doc.push(KIND, node);
        }
        self.section_done(KIND);
        Ok(())
    }

    fn supervisions(&mut self) -> ExportResult<()> {
        const KIND: EntityKind = EntityKind::Supervision;
        for supervision in self.store.all::<Supervision>()? {
            let (_, json_id, mut node) = self.open(&supervision, &[])?;
            put_label(&mut node, "funding", supervision.funding);
            self.put_required_ref(
                &mut node,
                (KIND, &json_id),
                "person",
                EntityKind::Membership,
                supervision.supervised,
            )?;
            let mut supervisors = Vec::with_capacity(supervision.supervisors.len());
            for supervisor in &supervision.supervisors {
                let mut entry = Map::new();
                entry.insert(
                    "person".into(),
                    self.stored_ref(KIND, "supervisors", EntityKind::Person, supervisor.person)?,
                );
                entry.insert("percent".into(), json!(supervisor.percent));
                put_label(&mut entry, "type", supervisor.supervisor_type);
                supervisors.push(Value::Object(entry));
            }
            if !supervisors.is_empty() {
                node.insert("supervisors".into(), Value::Array(supervisors));
            }
            self.doc.push(KIND, node);
        }
        self.section_done(KIND);
        Ok(())
    }

    fn invitations(&mut self) -> ExportResult<()> {
        const KIND: EntityKind = EntityKind::Invitation;
        for invitation in self.store.all::<Invitation>()? {
            let (_, json_id, mut node) = self.open(&invitation, &[])?;
            put_label(&mut node, "type", invitation.invitation_type);
            self.put_required_ref(&mut node, (KIND, &json_id), "guest", EntityKind::Person, invitation.guest)?;
            self.put_required_ref(&mut node, (KIND, &json_id), "inviter", EntityKind::Person, invitation.inviter)?;
            self.doc.push(KIND, node);
        }
        self.section_done(KIND);
        Ok(())
    }

    fn projects(&mut self) -> ExportResult<()> {
        const KIND: EntityKind = EntityKind::Project;
        const ORG: EntityKind = EntityKind::Organization;
        for prj in self.store.all::<Project>()? {
            let (_, json_id, mut node) = self.open(&prj, &[])?;
            put_label(&mut node, "status", prj.status);
            put_label(&mut node, "activityType", prj.activity_type);
            put_label(&mut node, "contractType", prj.contract_type);
            put_label(&mut node, "TRL", prj.trl);
            let owner = (KIND, &json_id);
            self.put_required_ref(&mut node, owner, "coordinator", ORG, prj.coordinator)?;
            self.put_required_ref(&mut node, owner, "localOrganization", ORG, prj.local_organization)?;
            self.put_required_ref(&mut node, owner, "superOrganization", ORG, prj.super_organization)?;
            self.put_required_ref(&mut node, owner, "learOrganization", ORG, prj.lear_organization)?;
            self.put_ref_list(&mut node, KIND, "otherPartners", ORG, &prj.other_partners)?;

            let mut participants = Vec::with_capacity(prj.participants.len());
            for participant in &prj.participants {
                let mut entry = Map::new();
                entry.insert(
                    "person".into(),
                    self.stored_ref(KIND, "participants", EntityKind::Person, participant.person)?,
                );
                put_label(&mut entry, "role", participant.role);
                participants.push(Value::Object(entry));
            }
            if !participants.is_empty() {
                node.insert("participants".into(), Value::Array(participants));
            }

            let budgets: Vec<Value> = prj
                .budgets
                .iter()
                .map(|b| {
                    let mut entry = Map::new();
                    put_label(&mut entry, "funding", b.funding);
                    entry.insert("budget".into(), Scalar::Float(b.budget).to_json());
                    if let Some(grant) = b.grant.as_deref().filter(|g| !g.trim().is_empty()) {
                        entry.insert("grant".into(), Value::String(grant.to_string()));
                    }
                    Value::Object(entry)
                })
                .collect();
            if !budgets.is_empty() {
                node.insert("budgets".into(), Value::Array(budgets));
            }
            Self::put_strings(&mut node, "videoURLs", &prj.video_urls);
            Self::put_strings(&mut node, "pathsToImages", &prj.paths_to_images);
            self.defer_axes(KIND, "projects", &json_id, &prj.scientific_axes)?;
            self.doc.push(KIND, node);
        }
        self.section_done(KIND);
        Ok(())
    }

    fn associated_structures(&mut self) -> ExportResult<()> {
        const KIND: EntityKind = EntityKind::AssociatedStructure;
        for structure in self.store.all::<AssociatedStructure>()? {
            let (_, _, mut node) = self.open(&structure, &[])?;
            put_label(&mut node, "type", structure.structure_type);
            self.put_ref(
                &mut node,
                KIND,
                "funding",
                EntityKind::Organization,
                structure.funding_organization,
            )?;
            let mut holders = Vec::with_capacity(structure.holders.len());
            for holder in &structure.holders {
                let mut entry = Map::new();
                entry.insert(
                    "person".into(),
                    self.stored_ref(KIND, "holders", EntityKind::Person, holder.person)?,
                );
                put_label(&mut entry, "role", holder.role);
                if let Some(description) = holder.role_description.as_deref().filter(|d| !d.trim().is_empty()) {
                    entry.insert("roleDescription".into(), Value::String(description.to_string()));
                }
                self.put_ref(&mut entry, KIND, "organization", EntityKind::Organization, holder.organization)?;
                self.put_ref(
                    &mut entry,
                    KIND,
                    "superOrganization",
                    EntityKind::Organization,
                    holder.super_organization,
                )?;
                holders.push(Value::Object(entry));
            }
            if !holders.is_empty() {
                node.insert("holders".into(), Value::Array(holders));
            }
            self.put_ref_list(&mut node, KIND, "projects", EntityKind::Project, &structure.projects)?;
            self.doc.push(KIND, node);
        }
        self.section_done(KIND);
        Ok(())
    }

    fn teaching_activities(&mut self) -> ExportResult<()> {
        const KIND: EntityKind = EntityKind::TeachingActivity;
        for activity in self.store.all::<TeachingActivity>()? {
            let (_, json_id, mut node) = self.open(&activity, &[])?;
            put_label(&mut node, "level", activity.level);
            put_label(&mut node, "studentType", activity.student_type);
            put_label(&mut node, "role", activity.role);
            put_label(&mut node, "language", activity.language);
            self.put_required_ref(&mut node, (KIND, &json_id), "person", EntityKind::Person, activity.person)?;
            self.put_required_ref(
                &mut node,
                (KIND, &json_id),
                "university",
                EntityKind::Organization,
                activity.university,
            )?;
            let work: Vec<Value> = activity
                .annual_work
                .iter()
                .filter(|w| w.hours > 0.0)
                .map(|w| {
                    let mut entry = Map::new();
                    put_label(&mut entry, "type", w.activity_type);
                    entry.insert("hours".into(), Scalar::Float(w.hours).to_json());
                    Value::Object(entry)
                })
                .collect();
            if !work.is_empty() {
                node.insert("annualWorkPerType".into(), Value::Array(work));
            }
            self.doc.push(KIND, node);
        }
        self.section_done(KIND);
        Ok(())
    }

    fn application_users(&mut self) -> ExportResult<()> {
        const KIND: EntityKind = EntityKind::ApplicationUser;
        for user in self.store.all::<ApplicationUser>()? {
            let (_, json_id, mut node) = self.open(&user, &[])?;
            self.put_required_ref(&mut node, (KIND, &json_id), "person", EntityKind::Person, user.person)?;
            self.doc.push(KIND, node);
        }
        self.section_done(KIND);
        Ok(())
    }

    /// Writes the axis edges gathered from memberships, publications and
    /// projects into the axis nodes.
    fn link_axes(&mut self) {
        for link in std::mem::take(&mut self.axis_links) {
            let Some(node) = self.doc.node_mut(EntityKind::ScientificAxis, link.axis) else {
                continue;
            };
            let entry = node
                .entry(link.field)
                .or_insert_with(|| Value::Array(Vec::new()));
            if let Value::Array(refs) = entry {
                refs.push(reference(&link.target));
            }
        }
    }
}
