use std::collections::BTreeSet;

use chrono::NaiveDate;
use labtransfer_graph::{
    ExportError, ExportOptions, ExportSettings, ExternalAuthor, ExternalPublication,
    ExtraPublicationProvider, GraphExporter, ProgressSink, SimilarPublicationProvider,
};
use labtransfer_model::{
    Authorship, Conference, Membership, Organization, Person, Publication, PublicationType,
    ResearchOrganizationType,
};
use labtransfer_storage::{EntityStoreExt, MemoryStore};
use labtransfer_types::{DbId, EntityKind};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn settings() -> ExportSettings {
    ExportSettings {
        generation_date: NaiveDate::from_ymd_opt(2024, 1, 2),
        pretty: false,
    }
}

fn export(store: &MemoryStore) -> Result<Option<Value>, ExportError> {
    let settings = settings();
    GraphExporter::new(store, ExportOptions::new(&settings)).export()
}

fn person(store: &mut MemoryStore, first: &str, last: &str) -> DbId {
    store
        .store(Person {
            first_name: Some(first.into()),
            last_name: Some(last.into()),
            ..Person::default()
        })
        .unwrap()
}

fn paper(title: &str, authors: &[DbId]) -> Publication {
    let mut publication = Publication::new(PublicationType::PhdThesis);
    publication.title = Some(title.into());
    publication.publication_year = Some(2020);
    publication.authors = authors
        .iter()
        .enumerate()
        .map(|(rank, person)| Authorship {
            person: *person,
            rank: rank as u32,
        })
        .collect();
    publication
}

fn section<'a>(document: &'a Value, kind: EntityKind) -> &'a [Value] {
    document[kind.section()].as_array().map_or(&[], Vec::as_slice)
}

fn ids(document: &Value, kind: EntityKind) -> Vec<String> {
    section(document, kind)
        .iter()
        .map(|n| n["@id"].as_str().unwrap().to_string())
        .collect()
}

/// Every `{"@id": ..}` object nested inside a node.
fn collect_refs(value: &Value, refs: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            if let Some(Value::String(id)) = map.get("@id") {
                refs.push(id.clone());
            }
            for (key, child) in map {
                if key != "@id" {
                    collect_refs(child, refs);
                }
            }
        }
        Value::Array(items) => items.iter().for_each(|i| collect_refs(i, refs)),
        _ => {}
    }
}

// ── Basics ───────────────────────────────────────────────────────

#[test]
fn empty_store_exports_nothing() {
    let store = MemoryStore::new();
    assert!(export(&store).unwrap().is_none());
}

#[test]
fn document_carries_generation_date() {
    let mut store = MemoryStore::new();
    person(&mut store, "Ada", "Lovelace");
    let document = export(&store).unwrap().unwrap();
    assert_eq!(document["_last-update-date"], json!("2024-01-02"));
}

#[test]
fn ids_follow_storage_order_per_kind() {
    let mut store = MemoryStore::new();
    person(&mut store, "Ada", "Lovelace");
    store
        .store(Organization {
            acronym: Some("LAB".into()),
            ..Organization::default()
        })
        .unwrap();
    person(&mut store, "Alan", "Turing");

    let document = export(&store).unwrap().unwrap();
    assert_eq!(ids(&document, EntityKind::Person), vec!["/pers#0", "/pers#1"]);
    assert_eq!(ids(&document, EntityKind::Organization), vec!["/ro#0"]);
    assert_eq!(section(&document, EntityKind::Person)[1]["lastName"], json!("Turing"));
}

#[test]
fn export_is_deterministic() {
    let mut store = MemoryStore::new();
    let ada = person(&mut store, "Ada", "Lovelace");
    let alan = person(&mut store, "Alan", "Turing");
    store.store(paper("Notes", &[alan, ada])).unwrap();

    assert_eq!(export(&store).unwrap(), export(&store).unwrap());
}

#[test]
fn json_text_follows_pretty_setting() {
    let mut store = MemoryStore::new();
    person(&mut store, "Ada", "Lovelace");
    let compact = settings();
    let pretty = ExportSettings {
        pretty: true,
        ..settings()
    };

    let flat = GraphExporter::new(&store, ExportOptions::new(&compact)).export_json().unwrap().unwrap();
    let indented = GraphExporter::new(&store, ExportOptions::new(&pretty)).export_json().unwrap().unwrap();
    assert!(!flat.contains('\n'));
    assert!(indented.contains("\n  \"persons\""));
    let reparsed: Value = serde_json::from_str(&indented).unwrap();
    assert_eq!(reparsed, export(&store).unwrap().unwrap());
}

#[test]
fn empty_sections_are_omitted() {
    let mut store = MemoryStore::new();
    person(&mut store, "Ada", "Lovelace");
    let document = export(&store).unwrap().unwrap();
    let keys: BTreeSet<&str> = document.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys, BTreeSet::from(["_last-update-date", "persons"]));
}

// ── Relationships ────────────────────────────────────────────────

#[test]
fn every_reference_resolves() {
    let mut store = MemoryStore::new();
    let lab = store
        .store(Organization {
            acronym: Some("LAB".into()),
            ..Organization::default()
        })
        .unwrap();
    let ada = person(&mut store, "Ada", "Lovelace");
    let alan = person(&mut store, "Alan", "Turing");
    store
        .store(Membership {
            person: Some(ada),
            organization: Some(lab),
            ..Membership::default()
        })
        .unwrap();
    store.store(paper("Notes", &[ada, alan])).unwrap();

    let document = export(&store).unwrap().unwrap();
    let mut defined = BTreeSet::new();
    let mut referenced = Vec::new();
    for kind in EntityKind::ALL {
        for node in section(&document, kind) {
            defined.insert(node["@id"].as_str().unwrap().to_string());
            for (key, value) in node.as_object().unwrap() {
                if key != "@id" {
                    collect_refs(value, &mut referenced);
                }
            }
        }
    }
    assert_eq!(referenced.len(), 4);
    for id in referenced {
        assert!(defined.contains(&id), "{id} is not defined");
    }
}

#[test]
fn authors_are_written_in_rank_order() {
    let mut store = MemoryStore::new();
    let ada = person(&mut store, "Ada", "Lovelace");
    let alan = person(&mut store, "Alan", "Turing");
    let mut publication = paper("Notes", &[]);
    publication.authors = vec![
        Authorship { person: ada, rank: 1 },
        Authorship { person: alan, rank: 0 },
    ];
    store.store(publication).unwrap();

    let document = export(&store).unwrap().unwrap();
    let node = &section(&document, EntityKind::Publication)[0];
    assert_eq!(node["authors"], json!([{ "@id": "/pers#1" }, { "@id": "/pers#0" }]));
    assert_eq!(node["type"], json!("PHD_THESIS"));
    assert_eq!(node["_source"], json!("database"));
    assert!(node["_databaseId"].is_u64());
}

#[test]
fn super_organization_stored_later_is_still_linked() {
    let mut store = MemoryStore::new();
    let lab = store
        .store(Organization {
            acronym: Some("LAB".into()),
            ..Organization::default()
        })
        .unwrap();
    let university = store
        .store(Organization {
            acronym: Some("UNIV".into()),
            organization_type: ResearchOrganizationType::University,
            ..Organization::default()
        })
        .unwrap();
    let mut child: Organization = store.require(lab).unwrap();
    child.super_organizations = vec![university];
    store.store(child).unwrap();

    let document = export(&store).unwrap().unwrap();
    let organizations = section(&document, EntityKind::Organization);
    assert_eq!(organizations[0]["superOrganizations"], json!([{ "@id": "/ro#1" }]));
    assert_eq!(organizations[1]["type"], json!("UNIVERSITY"));
    assert!(organizations[1].get("superOrganizations").is_none());
}

#[test]
fn enclosing_conference_stored_later_is_still_linked() {
    let mut store = MemoryStore::new();
    let workshop = store
        .store(Conference {
            acronym: Some("WS".into()),
            ..Conference::default()
        })
        .unwrap();
    let main = store
        .store(Conference {
            acronym: Some("MAIN".into()),
            ..Conference::default()
        })
        .unwrap();
    let mut child: Conference = store.require(workshop).unwrap();
    child.enclosing_conference = Some(main);
    store.store(child).unwrap();

    let document = export(&store).unwrap().unwrap();
    let conferences = section(&document, EntityKind::Conference);
    assert_eq!(conferences[0]["acronym"], json!("WS"));
    assert_eq!(conferences[0]["enclosingConference"], json!({ "@id": "/conf#1" }));
    assert!(conferences[1].get("enclosingConference").is_none());
}

#[test]
fn dangling_relationship_is_unresolved() {
    let mut store = MemoryStore::new();
    let lab = store.store(Organization::default()).unwrap();
    store
        .store(Membership {
            person: Some(DbId::new(999)),
            organization: Some(lab),
            ..Membership::default()
        })
        .unwrap();

    let error = export(&store).unwrap_err();
    assert!(matches!(
        error,
        ExportError::UnresolvedReference {
            owner: EntityKind::Membership,
            field: "person",
            target_kind: EntityKind::Person,
            ..
        }
    ));
}

#[test]
fn missing_required_relationship() {
    let mut store = MemoryStore::new();
    let ada = person(&mut store, "Ada", "Lovelace");
    store
        .store(Membership {
            person: Some(ada),
            ..Membership::default()
        })
        .unwrap();

    let error = export(&store).unwrap_err();
    match error {
        ExportError::MissingRelation { owner, id, field } => {
            assert_eq!(owner, EntityKind::Membership);
            assert_eq!(id, "/mbr#0");
            assert_eq!(field, "researchOrganization");
        }
        other => panic!("unexpected error: {other}"),
    }
}

// ── Providers ────────────────────────────────────────────────────

struct Abstracts;

impl SimilarPublicationProvider for Abstracts {
    fn similar(&self, publication: &Publication) -> Vec<Publication> {
        let mut similar = publication.clone();
        similar.title = Some("Other title".into());
        similar.abstract_text = Some("From a sibling record".into());
        vec![similar]
    }
}

#[test]
fn similar_records_fill_missing_values_only() {
    let mut store = MemoryStore::new();
    let ada = person(&mut store, "Ada", "Lovelace");
    store.store(paper("Notes", &[ada])).unwrap();

    let settings = settings();
    let document = GraphExporter::new(&store, ExportOptions::new(&settings).with_similar(&Abstracts))
        .export()
        .unwrap()
        .unwrap();
    let node = &section(&document, EntityKind::Publication)[0];
    assert_eq!(node["title"], json!("Notes"));
    assert_eq!(node["abstractText"], json!("From a sibling record"));
}

struct Catalog {
    ada: DbId,
}

impl ExtraPublicationProvider for Catalog {
    fn publications(&self) -> Vec<ExternalPublication> {
        let grace = ExternalAuthor::unknown("Grace", "Hopper");
        let first = ExternalPublication::new(
            paper("External one", &[]),
            vec![ExternalAuthor::Known(self.ada), grace.clone()],
        );
        let second = ExternalPublication::new(paper("External two", &[]), vec![grace]);
        vec![first, second]
    }
}

#[test]
fn external_publications_are_merged() {
    let mut store = MemoryStore::new();
    let ada = person(&mut store, "Ada", "Lovelace");
    store.store(paper("Stored", &[ada])).unwrap();

    let settings = settings();
    let catalog = Catalog { ada };
    let document = GraphExporter::new(&store, ExportOptions::new(&settings).with_extra(&catalog))
        .export()
        .unwrap()
        .unwrap();

    // The shared unknown author is written once, after the stored persons.
    let persons = section(&document, EntityKind::Person);
    assert_eq!(persons.len(), 2);
    assert_eq!(persons[1]["@id"], json!("/pers#1"));
    assert_eq!(persons[1]["lastName"], json!("Hopper"));

    let publications = section(&document, EntityKind::Publication);
    assert_eq!(ids(&document, EntityKind::Publication), vec!["/publi#0", "/publi#1", "/publi#2"]);
    assert_eq!(publications[1]["_source"], json!("external"));
    assert!(publications[1].get("_databaseId").is_none());
    assert_eq!(
        publications[1]["authors"],
        json!([{ "@id": "/pers#0" }, { "@id": "/pers#1" }])
    );
    assert_eq!(publications[2]["authors"], json!([{ "@id": "/pers#1" }]));
}

// ── Progress ─────────────────────────────────────────────────────

#[derive(Default)]
struct Steps {
    total: usize,
    labels: Vec<String>,
    finished: bool,
}

impl ProgressSink for Steps {
    fn start(&mut self, total_steps: usize, _label: &str) {
        self.total = total_steps;
    }

    fn step(&mut self, label: &str) {
        self.labels.push(label.to_string());
    }

    fn finish(&mut self) {
        self.finished = true;
    }
}

#[test]
fn progress_has_one_step_per_section() {
    let mut store = MemoryStore::new();
    person(&mut store, "Ada", "Lovelace");
    let settings = settings();
    let mut steps = Steps::default();
    let document = GraphExporter::new(&store, ExportOptions::new(&settings))
        .export_with(&mut steps)
        .unwrap();

    assert!(document.is_some());
    assert_eq!(steps.total, EntityKind::ALL.len());
    assert_eq!(steps.labels.len(), EntityKind::ALL.len());
    assert_eq!(steps.labels[4], "persons");
    assert!(steps.finished);
}

#[test]
fn empty_store_still_finishes_progress() {
    let store = MemoryStore::new();
    let settings = settings();
    let mut steps = Steps::default();
    let document = GraphExporter::new(&store, ExportOptions::new(&settings))
        .export_with(&mut steps)
        .unwrap();

    assert!(document.is_none());
    assert_eq!(steps.labels.len(), EntityKind::ALL.len());
    assert!(steps.finished);
}
