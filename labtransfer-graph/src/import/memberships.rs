use std::collections::{HashMap, HashSet};

use labtransfer_model::{Membership, Organization};
use labtransfer_storage::{EntityStore, EntityStoreExt};
use labtransfer_types::{DbId, EntityKind, JsonId};
use serde_json::{Map, Value};
use tracing::{debug, info};

use super::{Fault, ImportRun};
use crate::document::{as_object, element_id, section_elements};
use crate::reconcile::{reconcile, Candidate};
use crate::{ImportError, RecordFault};

const KIND: EntityKind = EntityKind::Membership;

/// Where a provisional membership came from.
#[derive(Debug, Clone)]
struct Origin {
    index: usize,
    json_id: Option<JsonId>,
}

impl<S: EntityStore + ?Sized> ImportRun<'_, S> {
    /// Memberships are built first, grouped per person in document order,
    /// reconciled, then persisted per person: services before employers.
    pub(super) fn memberships(&mut self, root: &Map<String, Value>) -> Result<(), ImportError> {
        let elements = section_elements(root, KIND)?;
        if elements.is_empty() {
            return Ok(());
        }
        info!("Importing {} {}", elements.len(), KIND.section());

        let mut groups: Vec<(DbId, Vec<Candidate<Origin>>)> = Vec::new();
        let mut supers: HashMap<DbId, Vec<DbId>> = HashMap::new();
        let mut seen = HashSet::new();
        for (index, element) in elements.iter().enumerate() {
            let candidate = match self.provisional_membership(element, &mut seen, &mut supers) {
                Ok(candidate) => candidate,
                Err(fault) => {
                    self.fail(KIND, index, element, fault)?;
                    continue;
                }
            };
            let json_id = element.as_object().and_then(element_id);
            let (membership, employer) = candidate;
            let Some(person) = membership.person else {
                continue;
            };
            let candidate = Candidate {
                membership,
                employer,
                tag: Origin { index, json_id },
            };
            match groups.iter_mut().find(|(p, _)| *p == person) {
                Some((_, group)) => group.push(candidate),
                None => groups.push((person, vec![candidate])),
            }
        }

        for (person, candidates) in groups {
            let reconciled = reconcile(candidates, |child, parent| {
                supers.get(&child).is_some_and(|s| s.contains(&parent))
            });
            for absorbed in &reconciled.absorbed {
                debug!(
                    "Membership {}[{}] of person #{} absorbed by a service membership",
                    KIND.section(),
                    absorbed.tag.index,
                    person
                );
                if let Some(json_id) = &absorbed.tag.json_id {
                    self.ids.absorb(json_id.clone(), KIND);
                    self.axis_links.remove(json_id);
                }
            }
            for candidate in reconciled.services.into_iter().chain(reconciled.employers) {
                self.persist_membership(elements, candidate)?;
            }
        }
        Ok(())
    }

    /// Builds one membership without saving it. Returns it with its
    /// employer flag.
    fn provisional_membership(
        &self,
        element: &Value,
        seen: &mut HashSet<JsonId>,
        supers: &mut HashMap<DbId, Vec<DbId>>,
    ) -> Fault<(Membership, bool)> {
        let element = as_object(element)?;
        if let Some(json_id) = element_id(element) {
            self.check_unbound(&json_id)?;
            if !seen.insert(json_id.clone()) {
                return Err(RecordFault::DuplicateId(json_id.to_string()));
            }
        }
        let mut membership = Membership::default();
        self.bind_scalars(
            &mut membership,
            element,
            &["person", "researchOrganization", "superOrganization", "address"],
        )?;
        membership.person = Some(self.resolve(element, "person", EntityKind::Person)?);
        let organization_id = self.resolve(element, "researchOrganization", EntityKind::Organization)?;
        membership.organization = Some(organization_id);
        membership.super_organization = self.resolve_opt(element, "superOrganization", EntityKind::Organization)?;
        membership.address = self.resolve_opt(element, "address", EntityKind::Address)?;
        membership.scientific_axes = self.linked_axes(element);

        let organization = self.store.require::<Organization>(organization_id)?;
        supers
            .entry(organization_id)
            .or_insert_with(|| organization.super_organizations.clone());
        Ok((membership, organization.organization_type.is_employer()))
    }

    fn persist_membership(&mut self, elements: &[Value], candidate: Candidate<Origin>) -> Result<(), ImportError> {
        let Origin { index, json_id } = candidate.tag;
        let element = &elements[index];
        let membership = candidate.membership;
        match self.unit(move |run| Ok(run.store.store(membership)?))? {
            Ok(id) => {
                if let Some(json_id) = json_id {
                    if let Err(fault) = self.ids.bind(json_id, KIND, id) {
                        return self.fail(KIND, index, element, fault);
                    }
                }
                self.consume_axis_links(element);
                self.stats.record(KIND);
                debug!("Created {} #{} from {}[{}]", KIND, id, KIND.section(), index);
                Ok(())
            }
            Err(fault) => self.fail(KIND, index, element, fault),
        }
    }
}
