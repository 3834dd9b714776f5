use std::sync::LazyLock;

use labtransfer_types::DbId;
use serde_json::{json, Value};

use crate::labels::Gender;
use crate::FieldTable;

/// Phone number with its ISO country code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhoneNumber {
    pub country: String,
    pub number: String,
}

impl PhoneNumber {
    #[must_use]
    pub fn to_json(&self) -> Value {
        json!({ "country": self.country, "number": self.number })
    }

    /// Reads either the object form or a plain `"+33 ..."` string.
    #[must_use]
    pub fn from_json(raw: &Value) -> Option<Self> {
        match raw {
            Value::String(s) if !s.trim().is_empty() => Some(Self {
                country: String::new(),
                number: s.trim().to_string(),
            }),
            Value::Object(map) => {
                let number = map.get("number")?.as_str()?.trim();
                if number.is_empty() {
                    return None;
                }
                Some(Self {
                    country: map
                        .get("country")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string(),
                    number: number.to_string(),
                })
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Person {
    pub id: Option<DbId>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Gender,
    pub email: Option<String>,
    pub office_room: Option<String>,
    pub orcid: Option<String>,
    pub researcher_id: Option<String>,
    pub scopus_id: Option<String>,
    pub google_scholar_id: Option<String>,
    pub idhal: Option<String>,
    pub linkedin_id: Option<String>,
    pub github_id: Option<String>,
    pub research_gate_id: Option<String>,
    pub facebook_id: Option<String>,
    pub dblp_url: Option<String>,
    pub academia_url: Option<String>,
    pub cordis_url: Option<String>,
    pub gravatar_id: Option<String>,
    pub google_scholar_hindex: Option<i64>,
    pub wos_hindex: Option<i64>,
    pub scopus_hindex: Option<i64>,
    pub google_scholar_citations: Option<i64>,
    pub wos_citations: Option<i64>,
    pub scopus_citations: Option<i64>,
    pub office_phone: Option<PhoneNumber>,
    pub mobile_phone: Option<PhoneNumber>,
    pub validated: bool,
}

impl Person {
    /// `First Last`, or whichever part is known.
    #[must_use]
    pub fn full_name(&self) -> String {
        [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

static FIELDS: LazyLock<FieldTable<Person>> = LazyLock::new(|| {
    FieldTable::<Person>::builder()
        .text("firstName", |p| p.first_name.clone(), |p, v| p.first_name = v)
        .text("lastName", |p| p.last_name.clone(), |p, v| p.last_name = v)
        .enumeration("gender", |p| p.gender, |p, v| p.gender = v)
        .text("email", |p| p.email.clone(), |p, v| p.email = v)
        .text("officeRoom", |p| p.office_room.clone(), |p, v| p.office_room = v)
        .text("ORCID", |p| p.orcid.clone(), |p, v| p.orcid = v)
        .text("researcherId", |p| p.researcher_id.clone(), |p, v| p.researcher_id = v)
        .text("scopusId", |p| p.scopus_id.clone(), |p, v| p.scopus_id = v)
        .text(
            "googleScholarId",
            |p| p.google_scholar_id.clone(),
            |p, v| p.google_scholar_id = v,
        )
        .text("idhal", |p| p.idhal.clone(), |p, v| p.idhal = v)
        .text("linkedInId", |p| p.linkedin_id.clone(), |p, v| p.linkedin_id = v)
        .text("githubId", |p| p.github_id.clone(), |p, v| p.github_id = v)
        .text(
            "researchGateId",
            |p| p.research_gate_id.clone(),
            |p, v| p.research_gate_id = v,
        )
        .text("facebookId", |p| p.facebook_id.clone(), |p, v| p.facebook_id = v)
        .text("dblpURL", |p| p.dblp_url.clone(), |p, v| p.dblp_url = v)
        .text("academiaURL", |p| p.academia_url.clone(), |p, v| p.academia_url = v)
        .text("cordisURL", |p| p.cordis_url.clone(), |p, v| p.cordis_url = v)
        .text("gravatarId", |p| p.gravatar_id.clone(), |p, v| p.gravatar_id = v)
        .integer(
            "googleScholarHindex",
            |p| p.google_scholar_hindex,
            |p, v| p.google_scholar_hindex = Some(v),
        )
        .integer("wosHindex", |p| p.wos_hindex, |p, v| p.wos_hindex = Some(v))
        .integer("scopusHindex", |p| p.scopus_hindex, |p, v| p.scopus_hindex = Some(v))
        .integer(
            "googleScholarCitations",
            |p| p.google_scholar_citations,
            |p, v| p.google_scholar_citations = Some(v),
        )
        .integer("wosCitations", |p| p.wos_citations, |p, v| p.wos_citations = Some(v))
        .integer(
            "scopusCitations",
            |p| p.scopus_citations,
            |p, v| p.scopus_citations = Some(v),
        )
        .flag("validated", |p| p.validated, |p, v| p.validated = v)
        .build()
});

impl_entity!(Person, Person, FIELDS);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn phone_from_object_and_string() {
        let p = PhoneNumber::from_json(&json!({"country": "FR", "number": "0102030405"})).unwrap();
        assert_eq!(p.country, "FR");
        assert_eq!(p.number, "0102030405");

        let p = PhoneNumber::from_json(&json!("+33 102030405")).unwrap();
        assert_eq!(p.number, "+33 102030405");
        assert!(p.country.is_empty());

        assert_eq!(PhoneNumber::from_json(&json!({"country": "FR"})), None);
        assert_eq!(PhoneNumber::from_json(&json!("  ")), None);
    }

    #[test]
    fn full_name_skips_missing_parts() {
        let mut p = Person {
            last_name: Some("Curie".into()),
            ..Person::default()
        };
        assert_eq!(p.full_name(), "Curie");
        p.first_name = Some("Marie".into());
        assert_eq!(p.full_name(), "Marie Curie");
    }
}
