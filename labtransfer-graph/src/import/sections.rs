use labtransfer_model::{
    Address, ApplicationUser, Conference, ConferenceQualityIndicators, CoreRanking, GlobalIndicators,
    Invitation, Journal, JournalQualityIndicators, JuryMembership, Labeled, Organization, Person,
    PhoneNumber, QuartileRanking, ScientificAxis, Supervision, Supervisor, SupervisorType,
};
use labtransfer_storage::{EntityStore, EntityStoreExt};
use labtransfer_types::{AttachmentSlot, EntityKind, JsonId};
use serde_json::{Map, Value};
use tracing::info;

use super::{number, AxisLink, Fault, ImportRun};
use crate::document::{label_field, object_list, optional_ref, ref_list, section_elements, string_list};
use crate::{ImportError, RecordFault};

const SUPER_ORGANIZATIONS: &str = "superOrganizations";
const SUPER_ORGANIZATION: &str = "superOrganization";
const ENCLOSING_CONFERENCE: &str = "enclosingConference";
const QUALITY_HISTORY: &str = "qualityIndicatorsHistory";

impl<S: EntityStore + ?Sized> ImportRun<'_, S> {
    pub(super) fn global_indicators(&mut self, root: &Map<String, Value>) -> Result<(), ImportError> {
        let Some(source) = root.get(EntityKind::GlobalIndicators.section()) else {
            return Ok(());
        };
        let outcome = self.unit(|run| {
            let element = source.as_object().ok_or(RecordFault::NotAnObject)?;
            if !element.contains_key("visibleGlobalIndicators") {
                return Ok(());
            }
            let visible = string_list(element, "visibleGlobalIndicators")?;
            let mut global = run
                .store
                .all::<GlobalIndicators>()?
                .into_iter()
                .next()
                .unwrap_or_default();
            global.visible_indicators = visible;
            run.store.store(global)?;
            Ok(())
        })?;
        if let Err(fault) = outcome {
            self.fail(EntityKind::GlobalIndicators, 0, source, fault)?;
        }
        Ok(())
    }

    pub(super) fn addresses(&mut self, root: &Map<String, Value>) -> Result<(), ImportError> {
        self.section(root, EntityKind::Address, |run, element| {
            let mut address = Address::default();
            run.bind_scalars(&mut address, element, &[])?;
            let id = run.save(&mut address)?;
            if run.relocate(AttachmentSlot::AddressBackground, id, 0, &mut address.path_to_background_image) {
                run.store.store(address)?;
            }
            Ok(id)
        })
    }

    /// Phase 1 creates every organization; phase 2 wires the
    /// super-organization edges, which may point forward in the section.
    pub(super) fn organizations(&mut self, root: &Map<String, Value>) -> Result<(), ImportError> {
        const KIND: EntityKind = EntityKind::Organization;
        let elements = section_elements(root, KIND)?;
        if elements.is_empty() {
            return Ok(());
        }
        info!("Importing {} {}", elements.len(), KIND.section());
        let mut created = Vec::new();
        for (index, element) in elements.iter().enumerate() {
            let built = self.record(KIND, index, element, |run, element| {
                let mut organization = Organization::default();
                run.bind_scalars(
                    &mut organization,
                    element,
                    &["addresses", SUPER_ORGANIZATIONS, SUPER_ORGANIZATION],
                )?;
                organization.addresses = run.resolve_list(element, "addresses", EntityKind::Address)?;
                // Validated here so phase 2 only sees well-formed edges.
                ref_list(element, SUPER_ORGANIZATIONS)?;
                let id = run.save(&mut organization)?;
                if run.relocate(AttachmentSlot::OrganizationLogo, id, 0, &mut organization.path_to_logo) {
                    run.store.store(organization)?;
                }
                Ok((id, ()))
            })?;
            if let Some((id, ())) = built {
                created.push((index, id));
            }
        }

        for (index, id) in created {
            let element = &elements[index];
            let outcome = self.unit(|run| {
                let object = element.as_object().ok_or(RecordFault::NotAnObject)?;
                let mut supers = run.resolve_list(object, SUPER_ORGANIZATIONS, KIND)?;
                if let Some(legacy) = run.resolve_opt(object, SUPER_ORGANIZATION, KIND)? {
                    if !supers.contains(&legacy) {
                        supers.push(legacy);
                    }
                }
                if supers.is_empty() {
                    return Ok(());
                }
                let mut organization = run.store.require::<Organization>(id)?;
                for parent in supers {
                    if parent != id && !organization.super_organizations.contains(&parent) {
                        organization.super_organizations.push(parent);
                    }
                }
                run.store.store(organization)?;
                Ok(())
            })?;
            if let Err(fault) = outcome {
                self.fail(KIND, index, element, fault)?;
            }
        }
        Ok(())
    }

    /// Axes list the memberships, publications and projects they cover;
    /// those sections come later, so the links are kept until the linked
    /// record is created.
    pub(super) fn scientific_axes(&mut self, root: &Map<String, Value>) -> Result<(), ImportError> {
        const KIND: EntityKind = EntityKind::ScientificAxis;
        const LINKS: [(&str, EntityKind); 3] = [
            ("memberships", EntityKind::Membership),
            ("publications", EntityKind::Publication),
            ("projects", EntityKind::Project),
        ];
        let elements = section_elements(root, KIND)?;
        if elements.is_empty() {
            return Ok(());
        }
        info!("Importing {} {}", elements.len(), KIND.section());
        for (index, element) in elements.iter().enumerate() {
            let built = self.record(KIND, index, element, |run, element| {
                let mut axis = ScientificAxis::default();
                run.bind_scalars(&mut axis, element, &LINKS.map(|(field, _)| field))?;
                let mut targets = Vec::new();
                for (field, kind) in LINKS {
                    for target in ref_list(element, field)? {
                        targets.push((field, kind, target.to_string()));
                    }
                }
                let id = run.save(&mut axis)?;
                Ok((id, targets))
            })?;
            let Some((axis, targets)) = built else {
                continue;
            };
            for (field, kind, target) in targets {
                self.axis_links
                    .entry(JsonId::from_document(target))
                    .or_default()
                    .push(AxisLink {
                        axis,
                        index,
                        field,
                        target: kind,
                    });
            }
        }
        Ok(())
    }

    pub(super) fn persons(&mut self, root: &Map<String, Value>) -> Result<(), ImportError> {
        self.section(root, EntityKind::Person, |run, element| {
            let mut person = Person::default();
            run.bind_scalars(&mut person, element, &["officePhone", "mobilePhone"])?;
            person.office_phone = phone(element, "officePhone")?;
            person.mobile_phone = phone(element, "mobilePhone")?;
            run.save(&mut person)
        })
    }

    pub(super) fn journals(&mut self, root: &Map<String, Value>) -> Result<(), ImportError> {
        self.section(root, EntityKind::Journal, |run, element| {
            let mut journal = Journal::default();
            run.bind_scalars(&mut journal, element, &[QUALITY_HISTORY])?;
            for (year, entry) in history(element)? {
                let indicators = JournalQualityIndicators {
                    scimago_q_index: optional_label::<QuartileRanking>(entry, "scimagoQIndex")?,
                    wos_q_index: optional_label::<QuartileRanking>(entry, "wosQIndex")?,
                    impact_factor: number(entry.get("impactFactor")).map(|f| f as f32),
                };
                if !indicators.is_empty() {
                    journal.quality_indicators.insert(year, indicators);
                }
            }
            run.save(&mut journal)
        })
    }

    pub(super) fn conferences(&mut self, root: &Map<String, Value>) -> Result<(), ImportError> {
        const KIND: EntityKind = EntityKind::Conference;
        let elements = section_elements(root, KIND)?;
        if elements.is_empty() {
            return Ok(());
        }
        info!("Importing {} {}", elements.len(), KIND.section());
        let mut created = Vec::new();
        for (index, element) in elements.iter().enumerate() {
            let built = self.record(KIND, index, element, |run, element| {
                let mut conference = Conference::default();
                run.bind_scalars(&mut conference, element, &[QUALITY_HISTORY, ENCLOSING_CONFERENCE])?;
                for (year, entry) in history(element)? {
                    if let Some(core) = optional_label::<CoreRanking>(entry, "coreIndex")? {
                        conference.quality_indicators.insert(
                            year,
                            ConferenceQualityIndicators {
                                core_index: Some(core),
                            },
                        );
                    }
                }
                optional_ref(element, ENCLOSING_CONFERENCE)?;
                Ok((run.save(&mut conference)?, ()))
            })?;
            if let Some((id, ())) = built {
                created.push((index, id));
            }
        }

        for (index, id) in created {
            let element = &elements[index];
            let outcome = self.unit(|run| {
                let object = element.as_object().ok_or(RecordFault::NotAnObject)?;
                let Some(enclosing) = run.resolve_opt(object, ENCLOSING_CONFERENCE, KIND)? else {
                    return Ok(());
                };
                let mut conference = run.store.require::<Conference>(id)?;
                conference.enclosing_conference = Some(enclosing);
                run.store.store(conference)?;
                Ok(())
            })?;
            if let Err(fault) = outcome {
                self.fail(KIND, index, element, fault)?;
            }
        }
        Ok(())
    }

    pub(super) fn jury_memberships(&mut self, root: &Map<String, Value>) -> Result<(), ImportError> {
        self.section(root, EntityKind::JuryMembership, |run, element| {
            let mut jury = JuryMembership::default();
            run.bind_scalars(&mut jury, element, &["person", "candidate", "promoters"])?;
            jury.person = Some(run.resolve(element, "person", EntityKind::Person)?);
            jury.candidate = Some(run.resolve(element, "candidate", EntityKind::Person)?);
            jury.promoters = run.resolve_list(element, "promoters", EntityKind::Person)?;
            run.save(&mut jury)
        })
    }

    pub(super) fn supervisions(&mut self, root: &Map<String, Value>) -> Result<(), ImportError> {
        self.section(root, EntityKind::Supervision, |run, element| {
            let mut supervision = Supervision::default();
            run.bind_scalars(&mut supervision, element, &["person", "supervisors"])?;
            supervision.supervised = Some(run.resolve(element, "person", EntityKind::Membership)?);
            for entry in object_list(element, "supervisors")? {
                supervision.supervisors.push(Supervisor {
                    person: run.resolve(entry, "person", EntityKind::Person)?,
                    percent: number(entry.get("percent")).map_or(0, |p| p.round() as i64),
                    supervisor_type: label_field::<SupervisorType>(entry, "type")?,
                });
            }
            run.save(&mut supervision)
        })
    }

    pub(super) fn invitations(&mut self, root: &Map<String, Value>) -> Result<(), ImportError> {
        self.section(root, EntityKind::Invitation, |run, element| {
            let mut invitation = Invitation::default();
            run.bind_scalars(&mut invitation, element, &["guest", "inviter"])?;
            invitation.guest = Some(run.resolve(element, "guest", EntityKind::Person)?);
            invitation.inviter = Some(run.resolve(element, "inviter", EntityKind::Person)?);
            run.save(&mut invitation)
        })
    }

    pub(super) fn application_users(&mut self, root: &Map<String, Value>) -> Result<(), ImportError> {
        self.section(root, EntityKind::ApplicationUser, |run, element| {
            let mut user = ApplicationUser::default();
            run.bind_scalars(&mut user, element, &["person"])?;
            user.person = Some(run.resolve(element, "person", EntityKind::Person)?);
            run.save(&mut user)
        })
    }
}

fn phone(element: &Map<String, Value>, field: &str) -> Fault<Option<PhoneNumber>> {
    match element.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(raw) => PhoneNumber::from_json(raw)
            .map(Some)
            .ok_or_else(|| RecordFault::invalid(field, "not a phone number")),
    }
}

/// Year-keyed quality history. Years that are not integers are an error.
fn history(element: &Map<String, Value>) -> Fault<Vec<(i32, &Map<String, Value>)>> {
    let Some(raw) = element.get(QUALITY_HISTORY).filter(|v| !v.is_null()) else {
        return Ok(Vec::new());
    };
    let history = raw
        .as_object()
        .ok_or_else(|| RecordFault::invalid(QUALITY_HISTORY, "expected an object keyed by year"))?;
    history
        .iter()
        .map(|(year, entry)| {
            let year = year
                .trim()
                .parse::<i32>()
                .map_err(|_| RecordFault::invalid(QUALITY_HISTORY, format!("'{year}' is not a year")))?;
            let entry = entry
                .as_object()
                .ok_or_else(|| RecordFault::invalid(QUALITY_HISTORY, "expected an object per year"))?;
            Ok((year, entry))
        })
        .collect()
}

/// An enumeration where absent and blank mean "no value".
fn optional_label<E: Labeled>(entry: &Map<String, Value>, field: &str) -> Fault<Option<E>> {
    match entry.get(field).and_then(Value::as_str).map(str::trim) {
        None | Some("") => Ok(None),
        Some(_) => label_field(entry, field).map(Some),
    }
}
