use std::sync::LazyLock;

use labtransfer_model::{
    bind_all, bind_field, project, AliasTable, Binding, Entity, FieldTable, Journal, Language,
    ModelError, Organization, Person, Publication, PublicationType, Record,
    ResearchOrganizationType,
};
use labtransfer_types::{DbId, EntityKind};
use pretty_assertions::assert_eq;
use serde_json::{json, Map, Value};

fn attrs(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap()
}

fn paper() -> Publication {
    let mut p = Publication::new(PublicationType::InternationalJournalPaper);
    p.title = Some("Graphs".into());
    p.publication_year = Some(2021);
    p
}

// ── Export direction ─────────────────────────────────────────────

#[test]
fn project_skips_empty_and_enumeration_fields() {
    let org = Organization {
        acronym: Some("CIAD".into()),
        name: Some("  ".into()),
        organization_type: ResearchOrganizationType::ResearchTeam,
        ..Organization::default()
    };
    let out = project(&org, &[]);
    assert_eq!(out.get("acronym"), Some(&json!("CIAD")));
    assert!(!out.contains_key("name"));
    assert!(!out.contains_key("type"));
    assert_eq!(out.get("validated"), Some(&json!(false)));
}

#[test]
fn project_fills_missing_values_from_fallbacks_in_order() {
    let primary = Journal {
        journal_name: Some("Primary".into()),
        ..Journal::default()
    };
    let first = Journal {
        journal_name: Some("Ignored".into()),
        publisher: Some("First".into()),
        ..Journal::default()
    };
    let second = Journal {
        publisher: Some("Second".into()),
        issn: Some("1234-5678".into()),
        ..Journal::default()
    };
    let out = project(&primary, &[first, second]);
    assert_eq!(out.get("journalName"), Some(&json!("Primary")));
    assert_eq!(out.get("publisher"), Some(&json!("First")));
    assert_eq!(out.get("ISSN"), Some(&json!("1234-5678")));
}

#[test]
fn project_writes_dates_and_numbers() {
    let mut p = paper();
    p.publication_date = chrono::NaiveDate::from_ymd_opt(2021, 5, 1);
    p.details.volume = Some("12".into());
    let out = project(&p, &[]);
    assert_eq!(out.get("publicationDate"), Some(&json!("2021-05-01")));
    assert_eq!(out.get("publicationYear"), Some(&json!(2021)));
    assert_eq!(out.get("volume"), Some(&json!("12")));
    assert!(!out.contains_key("majorLanguage"));
}

// ── Import direction ─────────────────────────────────────────────

#[test]
fn alias_and_canonical_bind_the_same_attribute() {
    let aliases = AliasTable::default();
    let mut a = paper();
    let mut b = paper();
    bind_field(&mut a, "language", &json!("FRENCH"), &aliases);
    bind_field(&mut b, "majorLanguage", &json!("french"), &aliases);
    assert_eq!(a.major_language, Language::French);
    assert_eq!(a.major_language, b.major_language);
}

#[test]
fn year_alias_sets_publication_year() {
    let mut p = Publication::new(PublicationType::PhdThesis);
    let binding = bind_field(&mut p, "year", &json!("2019"), &AliasTable::default());
    assert_eq!(binding, Binding::Bound("publicationYear"));
    assert_eq!(p.publication_year, Some(2019));
}

#[test]
fn boolean_prefix_is_stripped() {
    let mut j = Journal::default();
    let binding = bind_field(&mut j, "isOpenAccess", &json!(true), &AliasTable::empty());
    assert_eq!(binding, Binding::Bound("openAccess"));
    assert!(j.open_access);
}

#[test]
fn field_names_match_case_insensitively() {
    let mut p = Person::default();
    bind_field(&mut p, "orcid", &json!("0000-0001"), &AliasTable::empty());
    assert_eq!(p.orcid.as_deref(), Some("0000-0001"));
}

#[test]
fn rejected_value_falls_through_to_next_candidate() {
    let mut aliases = AliasTable::empty();
    aliases.register("cnu", "memberStatus");
    aliases.register("cnu", "cnuSection");
    let mut m = labtransfer_model::Membership::default();
    let binding = bind_field(&mut m, "cnu", &json!(27), &aliases);
    assert_eq!(binding, Binding::Bound("cnuSection"));
    assert_eq!(m.cnu_section, Some(27));

    let mut m = labtransfer_model::Membership::default();
    let binding = bind_field(&mut m, "cnu", &json!([27]), &aliases);
    assert_eq!(binding, Binding::Unbound);
}

#[test]
fn blank_enumeration_selects_default() {
    let mut p = Person {
        gender: labtransfer_model::Gender::Female,
        ..Person::default()
    };
    bind_field(&mut p, "gender", &json!(""), &AliasTable::empty());
    assert_eq!(p.gender, labtransfer_model::Gender::NotSpecified);
}

#[test]
fn null_is_absent() {
    let mut p = Person {
        email: Some("a@b.c".into()),
        ..Person::default()
    };
    assert_eq!(bind_field(&mut p, "email", &Value::Null, &AliasTable::empty()), Binding::Absent);
    assert_eq!(p.email.as_deref(), Some("a@b.c"));
}

#[test]
fn bind_all_skips_reserved_and_manual_fields() {
    let mut p = paper();
    let doc = attrs(json!({
        "@id": "/publi#0",
        "_source": "database",
        "id": 12,
        "authors": ["A. Turing"],
        "title": "New title",
        "volume": "4"
    }));
    bind_all(&mut p, &doc, &AliasTable::default(), &["authors"]).unwrap();
    assert_eq!(p.title.as_deref(), Some("New title"));
    assert_eq!(p.details.volume.as_deref(), Some("4"));
}

#[test]
fn bind_all_reports_unknown_field() {
    let mut p = Publication::new(PublicationType::PhdThesis);
    let err = bind_all(&mut p, &attrs(json!({"volume": "4"})), &AliasTable::default(), &[])
        .unwrap_err();
    assert_eq!(
        err,
        ModelError::NoMutator {
            kind: EntityKind::Publication,
            field: "volume".into()
        }
    );
}

// ── Custom tables ────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
struct Grade {
    id: Option<DbId>,
    letter: Option<char>,
    weight: Option<f32>,
}

static GRADE_FIELDS: LazyLock<FieldTable<Grade>> = LazyLock::new(|| {
    FieldTable::<Grade>::builder()
        .character("letter", |g| g.letter, |g, v| g.letter = Some(v))
        .float("weight", |g| g.weight, |g, v| g.weight = Some(v))
        .build()
});

impl Entity for Grade {
    const KIND: EntityKind = EntityKind::TeachingActivity;

    fn id(&self) -> Option<DbId> {
        self.id
    }

    fn set_id(&mut self, id: DbId) {
        self.id = Some(id);
    }

    fn fields(&self) -> &'static FieldTable<Self> {
        &GRADE_FIELDS
    }

    fn into_record(self) -> Record {
        unimplemented!("test-only entity")
    }

    fn from_record(_: Record) -> Option<Self> {
        None
    }
}

#[test]
fn character_and_float_fields() {
    let mut g = Grade::default();
    bind_all(
        &mut g,
        &attrs(json!({"letter": "B", "weight": "0.1"})),
        &AliasTable::empty(),
        &[],
    )
    .unwrap();
    assert_eq!(g.letter, Some('B'));
    let out = project(&g, &[]);
    assert_eq!(out.get("letter"), Some(&json!("B")));
    assert_eq!(out.get("weight"), Some(&json!(0.1)));
}
