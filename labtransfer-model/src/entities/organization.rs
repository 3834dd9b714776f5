use std::sync::LazyLock;

use chrono::NaiveDate;
use labtransfer_types::DbId;

use crate::labels::{MemberStatus, ResearchOrganizationType};
use crate::FieldTable;

/// A research organization: team, laboratory, university...
///
/// Only the upward links are stored; sub-organizations are the inverse of
/// `super_organizations` across the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Organization {
    pub id: Option<DbId>,
    pub acronym: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub rnsr: Option<String>,
    pub national_identifier: Option<String>,
    pub organization_url: Option<String>,
    pub country: Option<String>,
    pub organization_type: ResearchOrganizationType,
    pub major_organization: bool,
    pub path_to_logo: Option<String>,
    pub validated: bool,
    pub addresses: Vec<DbId>,
    pub super_organizations: Vec<DbId>,
}

static ORGANIZATION_FIELDS: LazyLock<FieldTable<Organization>> = LazyLock::new(|| {
    FieldTable::<Organization>::builder()
        .text("acronym", |o| o.acronym.clone(), |o, v| o.acronym = v)
        .text("name", |o| o.name.clone(), |o, v| o.name = v)
        .text("description", |o| o.description.clone(), |o, v| o.description = v)
        .text("rnsr", |o| o.rnsr.clone(), |o, v| o.rnsr = v)
        .text(
            "nationalIdentifier",
            |o| o.national_identifier.clone(),
            |o, v| o.national_identifier = v,
        )
        .text(
            "organizationURL",
            |o| o.organization_url.clone(),
            |o, v| o.organization_url = v,
        )
        .text("country", |o| o.country.clone(), |o, v| o.country = v)
        .enumeration("type", |o| o.organization_type, |o, v| o.organization_type = v)
        .flag(
            "majorOrganization",
            |o| o.major_organization,
            |o, v| o.major_organization = v,
        )
        .text("pathToLogo", |o| o.path_to_logo.clone(), |o, v| o.path_to_logo = v)
        .flag("validated", |o| o.validated, |o, v| o.validated = v)
        .build()
});

impl_entity!(Organization, Organization, ORGANIZATION_FIELDS);

/// A person's membership to an organization over a time interval.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Membership {
    pub id: Option<DbId>,
    pub person: Option<DbId>,
    pub organization: Option<DbId>,
    pub super_organization: Option<DbId>,
    pub address: Option<DbId>,
    pub member_since: Option<NaiveDate>,
    pub member_to: Option<NaiveDate>,
    pub status: MemberStatus,
    pub responsibility: Option<String>,
    pub permanent_position: bool,
    pub main_position: bool,
    pub cnu_section: Option<i64>,
    pub scientific_axes: Vec<DbId>,
}

impl Membership {
    /// True when this membership's interval contains `other`'s.
    ///
    /// Open bounds are unbounded: an open start on `self` precedes any
    /// start, and an open end on either side never limits containment.
    #[must_use]
    pub fn contains_interval_of(&self, other: &Membership) -> bool {
        let start_ok = match (self.member_since, other.member_since) {
            (None, _) => true,
            (Some(mine), Some(theirs)) => mine <= theirs,
            (Some(_), None) => false,
        };
        let end_ok = match (self.member_to, other.member_to) {
            (Some(mine), Some(theirs)) => mine >= theirs,
            _ => true,
        };
        start_ok && end_ok
    }
}

static MEMBERSHIP_FIELDS: LazyLock<FieldTable<Membership>> = LazyLock::new(|| {
    FieldTable::<Membership>::builder()
        .date("memberSinceWhen", |m| m.member_since, |m, v| m.member_since = v)
        .date("memberToWhen", |m| m.member_to, |m, v| m.member_to = v)
        .enumeration("memberStatus", |m| m.status, |m, v| m.status = v)
        .text(
            "responsibility",
            |m| m.responsibility.clone(),
            |m, v| m.responsibility = v,
        )
        .flag(
            "permanentPosition",
            |m| m.permanent_position,
            |m, v| m.permanent_position = v,
        )
        .flag("mainPosition", |m| m.main_position, |m, v| m.main_position = v)
        .integer("cnuSection", |m| m.cnu_section, |m, v| m.cnu_section = Some(v))
        .build()
});

impl_entity!(Membership, Membership, MEMBERSHIP_FIELDS);
