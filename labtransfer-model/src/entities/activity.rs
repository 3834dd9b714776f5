use std::sync::LazyLock;

use chrono::NaiveDate;
use labtransfer_types::DbId;

use crate::labels::{DefenseType, FundingScheme, InvitationType, JuryMembershipType, SupervisorType};
use crate::FieldTable;

/// Participation of a person in a defense jury.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JuryMembership {
    pub id: Option<DbId>,
    pub person: Option<DbId>,
    pub candidate: Option<DbId>,
    pub promoters: Vec<DbId>,
    pub title: Option<String>,
    pub date: Option<NaiveDate>,
    pub membership_type: JuryMembershipType,
    pub defense_type: DefenseType,
    pub university: Option<String>,
    pub country: Option<String>,
}

static JURY_FIELDS: LazyLock<FieldTable<JuryMembership>> = LazyLock::new(|| {
    FieldTable::<JuryMembership>::builder()
        .text("title", |j| j.title.clone(), |j, v| j.title = v)
        .date("date", |j| j.date, |j, v| j.date = v)
        .enumeration("type", |j| j.membership_type, |j, v| j.membership_type = v)
        .enumeration("defenseType", |j| j.defense_type, |j, v| j.defense_type = v)
        .text("university", |j| j.university.clone(), |j, v| j.university = v)
        .text("country", |j| j.country.clone(), |j, v| j.country = v)
        .build()
});

impl_entity!(JuryMembership, JuryMembership, JURY_FIELDS);

/// One supervisor of a supervision, with their share.
#[derive(Debug, Clone, PartialEq)]
pub struct Supervisor {
    pub person: DbId,
    pub percent: i64,
    pub supervisor_type: SupervisorType,
}

/// Supervision of a student, attached to the student's membership.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Supervision {
    pub id: Option<DbId>,
    pub supervised: Option<DbId>,
    pub supervisors: Vec<Supervisor>,
    pub title: Option<String>,
    pub abandonment: bool,
    pub defense_date: Option<NaiveDate>,
    pub entrepreneur: bool,
    pub funding: FundingScheme,
    pub funding_details: Option<String>,
    pub joint_position: bool,
    pub number_of_ater_positions: Option<i64>,
    pub position_after_supervision: Option<String>,
}

static SUPERVISION_FIELDS: LazyLock<FieldTable<Supervision>> = LazyLock::new(|| {
    FieldTable::<Supervision>::builder()
        .text("title", |s| s.title.clone(), |s, v| s.title = v)
        .flag("abandonment", |s| s.abandonment, |s, v| s.abandonment = v)
        .date("defenseDate", |s| s.defense_date, |s, v| s.defense_date = v)
        .flag("entrepreneur", |s| s.entrepreneur, |s, v| s.entrepreneur = v)
        .enumeration("funding", |s| s.funding, |s, v| s.funding = v)
        .text(
            "fundingDetails",
            |s| s.funding_details.clone(),
            |s, v| s.funding_details = v,
        )
        .flag("jointPosition", |s| s.joint_position, |s, v| s.joint_position = v)
        .integer(
            "numberOfAterPositions",
            |s| s.number_of_ater_positions,
            |s, v| s.number_of_ater_positions = Some(v),
        )
        .text(
            "positionAfterSupervision",
            |s| s.position_after_supervision.clone(),
            |s, v| s.position_after_supervision = v,
        )
        .build()
});

impl_entity!(Supervision, Supervision, SUPERVISION_FIELDS);

/// Invitation of a guest researcher.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Invitation {
    pub id: Option<DbId>,
    pub guest: Option<DbId>,
    pub inviter: Option<DbId>,
    pub title: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub invitation_type: InvitationType,
    pub university: Option<String>,
    pub country: Option<String>,
}

static INVITATION_FIELDS: LazyLock<FieldTable<Invitation>> = LazyLock::new(|| {
    FieldTable::<Invitation>::builder()
        .text("title", |i| i.title.clone(), |i, v| i.title = v)
        .date("startDate", |i| i.start_date, |i, v| i.start_date = v)
        .date("endDate", |i| i.end_date, |i, v| i.end_date = v)
        .enumeration("type", |i| i.invitation_type, |i, v| i.invitation_type = v)
        .text("university", |i| i.university.clone(), |i, v| i.university = v)
        .text("country", |i| i.country.clone(), |i, v| i.country = v)
        .build()
});

impl_entity!(Invitation, Invitation, INVITATION_FIELDS);
