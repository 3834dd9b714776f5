use labtransfer_model::{parse_month, Authorship, Labeled, Person, Publication, PublicationType};
use labtransfer_storage::{EntityStore, EntityStoreExt};
use labtransfer_types::{AttachmentSlot, DbId, EntityKind};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use super::{Fault, ImportRun};
use crate::document::{optional_str, reference_id, section_elements};
use crate::names::PersonName;
use crate::{ImportError, RecordFault};

const KIND: EntityKind = EntityKind::Publication;
const MANUAL: [&str; 5] = ["type", "authors", "journal", "conference", "month"];

impl<S: EntityStore + ?Sized> ImportRun<'_, S> {
    pub(super) fn publications(&mut self, root: &Map<String, Value>) -> Result<(), ImportError> {
        let elements = section_elements(root, KIND)?;
        if elements.is_empty() {
            return Ok(());
        }
        info!("Importing {} {}", elements.len(), KIND.section());
        for (index, element) in elements.iter().enumerate() {
            if let Some((_, stubs)) = self.record(KIND, index, element, Self::build_publication)? {
                self.stats.authors += stubs;
                self.consume_axis_links(element);
            }
        }
        Ok(())
    }

    /// Builds and saves one publication. Returns its id and the number of
    /// stub authors created for it.
    fn build_publication(&mut self, element: &Map<String, Value>) -> Fault<(DbId, usize)> {
        let label = optional_str(element, "type").ok_or_else(|| RecordFault::MissingField("type".into()))?;
        let publication_type = PublicationType::parse_label(label)
            .ok_or_else(|| RecordFault::invalid("type", format!("unknown publication type '{label}'")))?;
        let mut publication = Publication::new(publication_type);
        self.bind_scalars(&mut publication, element, &MANUAL)?;

        if let Some(month) = optional_str(element, "month") {
            let month = parse_month(month).ok_or_else(|| RecordFault::invalid("month", format!("'{month}' is not a month")))?;
            if publication.publication_date.is_none() && !publication.set_month(month) {
                debug!("Ignored month of a publication without year");
            }
        }

        let shape = publication.shape();
        if shape.is_journal_based() {
            publication.journal = Some(self.resolve(element, "journal", EntityKind::Journal)?);
        }
        if shape.is_conference_based() {
            publication.conference = Some(self.resolve(element, "conference", EntityKind::Conference)?);
        }
        publication.check_sanity()?;
        publication.scientific_axes = self.linked_axes(element);

        let stubs = self.attach_authors(&mut publication, element)?;
        let id = self.save(&mut publication)?;
        let pdf = self.relocate(AttachmentSlot::PublicationPdf, id, 0, &mut publication.path_to_downloadable_pdf);
        let award = self.relocate(
            AttachmentSlot::PublicationAward,
            id,
            0,
            &mut publication.path_to_downloadable_award_certificate,
        );
        if pdf || award {
            self.store.store(publication)?;
        }
        Ok((id, stubs))
    }

    /// Authors are references to imported persons, or plain names matched
    /// against stored persons. Unmatched names become stub persons.
    fn attach_authors(&mut self, publication: &mut Publication, element: &Map<String, Value>) -> Fault<usize> {
        let entries = match element.get("authors") {
            Some(Value::Array(entries)) if !entries.is_empty() => entries,
            Some(Value::Array(_)) | None | Some(Value::Null) => {
                return Err(RecordFault::MissingField("authors".into()));
            }
            Some(_) => return Err(RecordFault::invalid("authors", "expected an array")),
        };
        let mut known: Option<Vec<Person>> = None;
        let mut stubs = 0;
        publication.authors.clear();
        for entry in entries {
            let person = match entry {
                Value::String(raw) => {
                    let name = PersonName::parse(raw)
                        .ok_or_else(|| RecordFault::invalid("authors", "blank author name"))?;
                    if known.is_none() {
                        known = Some(self.store.all::<Person>()?);
                    }
                    let persons = known.get_or_insert_with(Vec::new);
                    match self.matcher.find(&name, persons).and_then(|p| p.id) {
                        Some(id) => id,
                        None => {
                            let mut stub = Person {
                                first_name: Some(name.first_name).filter(|s| !s.is_empty()),
                                last_name: Some(name.last_name),
                                ..Person::default()
                            };
                            let id = self.save(&mut stub)?;
                            debug!("Created author {} #{}", stub.full_name(), id);
                            persons.push(stub);
                            stubs += 1;
                            id
                        }
                    }
                }
                other => {
                    let id = reference_id(other).ok_or_else(|| RecordFault::MalformedReference {
                        field: "authors".into(),
                    })?;
                    self.ids.resolve("authors", id, EntityKind::Person)?
                }
            };
            if publication.authors.iter().any(|a| a.person == person) {
                let title = publication.title.as_deref().unwrap_or_default();
                warn!("Skipping repeated author {} of \"{}\"", entry, title);
                continue;
            }
            let rank = u32::try_from(publication.authors.len()).unwrap_or(u32::MAX);
            publication.authors.push(Authorship { person, rank });
        }
        Ok(stubs)
    }
}
