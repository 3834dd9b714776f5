//! Graph importer: transfer document to store.
//!
//! Sections are read in dependency order. Every record is built, attached
//! and saved inside its own storage transaction; a document id is bound
//! only once that transaction committed.

mod memberships;
mod publications;
mod sections;
mod works;

use std::collections::HashMap;

use labtransfer_model::{bind_all, AliasTable, Entity};
use labtransfer_storage::{EntityStore, EntityStoreExt, ScratchStore};
use labtransfer_types::{AttachmentSlot, DbId, EntityKind, JsonId};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::document::{as_object, element_id, optional_ref, ref_list, required_ref, section_elements};
use crate::files::KeepPaths;
use crate::id_map::IdMap;
use crate::names::NameMatcher;
use crate::progress::NoProgress;
use crate::{
    FailurePolicy, FileCallback, ImportError, ImportOptions, ImportReport, ImportStats,
    ProgressSink, RecordError, RecordFault,
};

type Fault<T> = Result<T, RecordFault>;

/// Rebuilds an entity graph from a transfer document. Import is additive:
/// nothing in the target store is updated or deleted, except the global
/// indicators singleton.
#[derive(Debug, Clone, Default)]
pub struct GraphImporter {
    options: ImportOptions,
}

impl GraphImporter {
    #[must_use]
    pub fn new(options: ImportOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub fn options(&self) -> &ImportOptions {
        &self.options
    }

    /// Imports `document` keeping attachment paths as written.
    pub fn import<S: EntityStore + ?Sized>(&self, store: &mut S, document: &Value) -> Result<ImportReport, ImportError> {
        self.import_with(store, document, &mut KeepPaths, &mut NoProgress)
    }

    /// Parses and imports a JSON text.
    pub fn import_str<S: EntityStore + ?Sized>(&self, store: &mut S, json: &str) -> Result<ImportReport, ImportError> {
        let document: Value = serde_json::from_str(json)?;
        self.import(store, &document)
    }

    /// Imports `document`, moving attachments through `files` and
    /// reporting one progress step per section.
    pub fn import_with<S: EntityStore + ?Sized>(
        &self,
        store: &mut S,
        document: &Value,
        files: &mut dyn FileCallback,
        progress: &mut dyn ProgressSink,
    ) -> Result<ImportReport, ImportError> {
        if self.options.dry_run {
            let mut scratch = ScratchStore::new(&*store);
            let report = self.run(&mut scratch, document, files, progress)?;
            info!("Dry run: {} pending records discarded", scratch.pending());
            Ok(report)
        } else {
            self.run(store, document, files, progress)
        }
    }

    fn run<S: EntityStore + ?Sized>(
        &self,
        store: &mut S,
        document: &Value,
        files: &mut dyn FileCallback,
        progress: &mut dyn ProgressSink,
    ) -> Result<ImportReport, ImportError> {
        let root = document
            .as_object()
            .ok_or_else(|| ImportError::InvalidDocument("root is not an object".into()))?;
        let mut run = ImportRun {
            store,
            files,
            progress,
            aliases: self.options.alias_table(),
            matcher: NameMatcher::new(self.options.name_similarity_threshold),
            policy: self.options.failure_policy,
            ids: IdMap::new(),
            axis_links: HashMap::new(),
            stats: ImportStats::default(),
            failures: Vec::new(),
        };
        run.progress.start(EntityKind::ALL.len(), "Importing document");
        for kind in EntityKind::ALL {
            run.progress.step(kind.label());
            match kind {
                EntityKind::GlobalIndicators => run.global_indicators(root)?,
                EntityKind::Address => run.addresses(root)?,
                EntityKind::Organization => run.organizations(root)?,
                EntityKind::ScientificAxis => run.scientific_axes(root)?,
                EntityKind::Person => run.persons(root)?,
                EntityKind::Journal => run.journals(root)?,
                EntityKind::Conference => run.conferences(root)?,
                EntityKind::Membership => run.memberships(root)?,
                EntityKind::Publication => run.publications(root)?,
                EntityKind::JuryMembership => run.jury_memberships(root)?,
                EntityKind::Supervision => run.supervisions(root)?,
                EntityKind::Invitation => run.invitations(root)?,
                EntityKind::Project => run.projects(root)?,
                EntityKind::AssociatedStructure => run.associated_structures(root)?,
                EntityKind::TeachingActivity => run.teaching_activities(root)?,
                EntityKind::ApplicationUser => run.application_users(root)?,
            }
            run.dangling_axis_links(root, kind)?;
        }
        run.stats.attachments = run.files.relocated();
        run.progress.finish();

        info!("Imported {} records: {}", run.stats.total(), run.stats);
        if !run.failures.is_empty() {
            warn!("{} records could not be imported", run.failures.len());
        }
        Ok(ImportReport {
            stats: run.stats,
            failures: run.failures,
            dry_run: self.options.dry_run,
        })
    }
}

/// A scientific axis waiting for the record it links to.
#[derive(Debug, Clone, Copy)]
struct AxisLink {
    axis: DbId,
    index: usize,
    field: &'static str,
    /// Kind of the linked record.
    target: EntityKind,
}

struct ImportRun<'a, S: EntityStore + ?Sized> {
    store: &'a mut S,
    files: &'a mut dyn FileCallback,
    progress: &'a mut dyn ProgressSink,
    aliases: AliasTable,
    matcher: NameMatcher,
    policy: FailurePolicy,
    ids: IdMap,
    /// Linked record json-id to the axes listing it.
    axis_links: HashMap<JsonId, Vec<AxisLink>>,
    stats: ImportStats,
    failures: Vec<RecordError>,
}

impl<S: EntityStore + ?Sized> ImportRun<'_, S> {
    // ── Units ────────────────────────────────────────────────────

    /// Runs `work` inside one storage transaction. Storage failures of the
    /// transaction itself abort the import; record faults are returned.
    fn unit<R>(&mut self, work: impl FnOnce(&mut Self) -> Fault<R>) -> Result<Fault<R>, ImportError> {
        self.store.begin()?;
        match work(self) {
            Ok(value) => {
                self.store.commit()?;
                Ok(Ok(value))
            }
            Err(fault) => {
                self.store.rollback()?;
                Ok(Err(fault))
            }
        }
    }

    /// Applies the failure policy to a failed record.
    fn fail(&mut self, kind: EntityKind, index: usize, source: &Value, fault: RecordFault) -> Result<(), ImportError> {
        let error = RecordError::new(kind.section(), index, source, fault);
        match self.policy {
            FailurePolicy::FailFast => Err(ImportError::Record(Box::new(error))),
            FailurePolicy::CollectAll => {
                warn!("Skipped {}[{}]: {}", error.section, error.index, error.cause);
                self.failures.push(error);
                Ok(())
            }
        }
    }

    /// Builds and saves one record in its own unit, then binds its
    /// document id. Returns `None` when the record failed and the policy
    /// lets the import go on.
    fn record<R>(
        &mut self,
        kind: EntityKind,
        index: usize,
        element: &Value,
        build: impl FnOnce(&mut Self, &Map<String, Value>) -> Fault<(DbId, R)>,
    ) -> Result<Option<(DbId, R)>, ImportError> {
        let json_id = element.as_object().and_then(element_id);
        let outcome = self.unit(|run| {
            let object = as_object(element)?;
            if let Some(json_id) = &json_id {
                run.check_unbound(json_id)?;
            }
            build(run, object)
        })?;
        match outcome {
            Ok((id, extra)) => {
                if let Some(json_id) = json_id {
                    if let Err(fault) = self.ids.bind(json_id, kind, id) {
                        self.fail(kind, index, element, fault)?;
                    }
                }
                self.stats.record(kind);
                debug!("Created {} #{} from {}[{}]", kind, id, kind.section(), index);
                Ok(Some((id, extra)))
            }
            Err(fault) => {
                self.fail(kind, index, element, fault)?;
                Ok(None)
            }
        }
    }

    /// Imports every element of a section through `build`.
    fn section(
        &mut self,
        root: &Map<String, Value>,
        kind: EntityKind,
        mut build: impl FnMut(&mut Self, &Map<String, Value>) -> Fault<DbId>,
    ) -> Result<(), ImportError> {
        let elements = section_elements(root, kind)?;
        if elements.is_empty() {
            return Ok(());
        }
        info!("Importing {} {}", elements.len(), kind.section());
        for (index, element) in elements.iter().enumerate() {
            self.record(kind, index, element, |run, object| {
                build(run, object).map(|id| (id, ()))
            })?;
        }
        Ok(())
    }

    fn check_unbound(&self, json_id: &JsonId) -> Fault<()> {
        if self.ids.contains(json_id) {
            return Err(RecordFault::DuplicateId(json_id.to_string()));
        }
        Ok(())
    }

    // ── Binding helpers ──────────────────────────────────────────

    /// Binds every scalar field of `element`; `manual` fields are read by
    /// the caller.
    fn bind_scalars<T: Entity>(&self, entity: &mut T, element: &Map<String, Value>, manual: &[&str]) -> Fault<()> {
        bind_all(entity, element, &self.aliases, manual)?;
        Ok(())
    }

    fn resolve(&self, element: &Map<String, Value>, field: &str, kind: EntityKind) -> Fault<DbId> {
        let id = required_ref(element, field)?;
        self.ids.resolve(field, id, kind)
    }

    fn resolve_opt(&self, element: &Map<String, Value>, field: &str, kind: EntityKind) -> Fault<Option<DbId>> {
        optional_ref(element, field)?
            .map(|id| self.ids.resolve(field, id, kind))
            .transpose()
    }

    fn resolve_list(&self, element: &Map<String, Value>, field: &str, kind: EntityKind) -> Fault<Vec<DbId>> {
        let mut resolved = Vec::new();
        for id in ref_list(element, field)? {
            let id = self.ids.resolve(field, id, kind)?;
            if !resolved.contains(&id) {
                resolved.push(id);
            }
        }
        Ok(resolved)
    }

    /// Axes listing the record `element`, as far as they are known.
    fn linked_axes(&self, element: &Map<String, Value>) -> Vec<DbId> {
        element_id(element)
            .and_then(|id| self.axis_links.get(&id))
            .map(|links| links.iter().map(|l| l.axis).collect())
            .unwrap_or_default()
    }

    /// Drops the pending axis links of a record that now exists.
    fn consume_axis_links(&mut self, element: &Value) {
        if let Some(id) = element.as_object().and_then(element_id) {
            self.axis_links.remove(&id);
        }
    }

    /// Moves one attachment. Returns whether `path` changed.
    fn relocate(&mut self, slot: AttachmentSlot, id: DbId, index: usize, path: &mut Option<String>) -> bool {
        let Some(current) = path.as_deref().filter(|p| !p.trim().is_empty()) else {
            return false;
        };
        let moved = self.files.relocate(slot, id, index, current);
        if moved.as_deref() == Some(current) {
            return false;
        }
        match &moved {
            Some(target) => debug!("Moved {} to {}", current, target),
            None => warn!("Attachment '{}' of {} #{} not found, path removed", current, slot.kind(), id),
        }
        *path = moved;
        true
    }

    /// Saves `entity` and returns its id, ready for a re-save.
    fn save<T: Entity>(&mut self, entity: &mut T) -> Fault<DbId> {
        let id = self.store.store(entity.clone())?;
        entity.set_id(id);
        Ok(id)
    }

    /// Fails the axis links to records of `kind` that were never created.
    /// Runs once the section of `kind` is done, before any later section.
    fn dangling_axis_links(&mut self, root: &Map<String, Value>, kind: EntityKind) -> Result<(), ImportError> {
        let mut dangling: Vec<(JsonId, AxisLink)> = Vec::new();
        self.axis_links.retain(|target, links| {
            links.retain(|link| {
                let pending = link.target != kind;
                if !pending {
                    dangling.push((target.clone(), *link));
                }
                pending
            });
            !links.is_empty()
        });
        if dangling.is_empty() {
            return Ok(());
        }
        let elements = section_elements(root, EntityKind::ScientificAxis)?;
        dangling.sort_by(|a, b| (a.1.index, a.0.as_str()).cmp(&(b.1.index, b.0.as_str())));
        for (target, link) in dangling {
            let fault = RecordFault::UnboundReference {
                field: link.field.to_string(),
                id: target.to_string(),
            };
            let source = elements.get(link.index).cloned().unwrap_or(Value::Null);
            self.fail(EntityKind::ScientificAxis, link.index, &source, fault)?;
        }
        Ok(())
    }
}

/// Numeric value of a number or numeric string.
fn number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
