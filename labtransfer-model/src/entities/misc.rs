use std::sync::LazyLock;

use chrono::NaiveDate;
use labtransfer_types::DbId;

use crate::FieldTable;

/// Singleton record listing the indicators shown on the lab dashboard.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlobalIndicators {
    pub id: Option<DbId>,
    pub visible_indicators: Vec<String>,
}

static GLOBAL_FIELDS: LazyLock<FieldTable<GlobalIndicators>> =
    LazyLock::new(|| FieldTable::<GlobalIndicators>::builder().build());

impl_entity!(GlobalIndicators, GlobalIndicators, GLOBAL_FIELDS);

/// A scientific axis of the lab. Members point to their axes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScientificAxis {
    pub id: Option<DbId>,
    pub acronym: Option<String>,
    pub name: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub validated: bool,
}

static AXIS_FIELDS: LazyLock<FieldTable<ScientificAxis>> = LazyLock::new(|| {
    FieldTable::<ScientificAxis>::builder()
        .text("acronym", |a| a.acronym.clone(), |a, v| a.acronym = v)
        .text("name", |a| a.name.clone(), |a, v| a.name = v)
        .date("startDate", |a| a.start_date, |a, v| a.start_date = v)
        .date("endDate", |a| a.end_date, |a, v| a.end_date = v)
        .flag("validated", |a| a.validated, |a, v| a.validated = v)
        .build()
});

impl_entity!(ScientificAxis, ScientificAxis, AXIS_FIELDS);

/// Login account bound to a person.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplicationUser {
    pub id: Option<DbId>,
    pub person: Option<DbId>,
    pub login: Option<String>,
}

static USER_FIELDS: LazyLock<FieldTable<ApplicationUser>> = LazyLock::new(|| {
    FieldTable::<ApplicationUser>::builder()
        .text("login", |u| u.login.clone(), |u, v| u.login = v)
        .build()
});

impl_entity!(ApplicationUser, ApplicationUser, USER_FIELDS);
