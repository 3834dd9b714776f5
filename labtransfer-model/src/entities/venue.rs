use std::collections::BTreeMap;
use std::sync::LazyLock;

use labtransfer_types::DbId;

use crate::labels::{CoreRanking, QuartileRanking};
use crate::FieldTable;

/// One year of journal rankings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JournalQualityIndicators {
    pub scimago_q_index: Option<QuartileRanking>,
    pub wos_q_index: Option<QuartileRanking>,
    pub impact_factor: Option<f32>,
}

impl JournalQualityIndicators {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scimago_q_index.is_none() && self.wos_q_index.is_none() && self.impact_factor.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Journal {
    pub id: Option<DbId>,
    pub journal_name: Option<String>,
    pub address: Option<String>,
    pub publisher: Option<String>,
    pub isbn: Option<String>,
    pub issn: Option<String>,
    pub open_access: bool,
    pub journal_url: Option<String>,
    pub scimago_id: Option<String>,
    pub scimago_category: Option<String>,
    pub wos_id: Option<String>,
    pub wos_category: Option<String>,
    pub validated: bool,
    /// Rankings keyed by reference year.
    pub quality_indicators: BTreeMap<i32, JournalQualityIndicators>,
}

static JOURNAL_FIELDS: LazyLock<FieldTable<Journal>> = LazyLock::new(|| {
    FieldTable::<Journal>::builder()
        .text("journalName", |j| j.journal_name.clone(), |j, v| j.journal_name = v)
        .text("address", |j| j.address.clone(), |j, v| j.address = v)
        .text("publisher", |j| j.publisher.clone(), |j, v| j.publisher = v)
        .text("ISBN", |j| j.isbn.clone(), |j, v| j.isbn = v)
        .text("ISSN", |j| j.issn.clone(), |j, v| j.issn = v)
        .flag("openAccess", |j| j.open_access, |j, v| j.open_access = v)
        .text("journalURL", |j| j.journal_url.clone(), |j, v| j.journal_url = v)
        .text("scimagoId", |j| j.scimago_id.clone(), |j, v| j.scimago_id = v)
        .text(
            "scimagoCategory",
            |j| j.scimago_category.clone(),
            |j, v| j.scimago_category = v,
        )
        .text("wosId", |j| j.wos_id.clone(), |j, v| j.wos_id = v)
        .text("wosCategory", |j| j.wos_category.clone(), |j, v| j.wos_category = v)
        .flag("validated", |j| j.validated, |j, v| j.validated = v)
        .build()
});

impl_entity!(Journal, Journal, JOURNAL_FIELDS);

/// One year of conference ranking.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConferenceQualityIndicators {
    pub core_index: Option<CoreRanking>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conference {
    pub id: Option<DbId>,
    pub acronym: Option<String>,
    pub name: Option<String>,
    pub publisher: Option<String>,
    pub isbn: Option<String>,
    pub issn: Option<String>,
    pub open_access: bool,
    pub conference_url: Option<String>,
    pub core_id: Option<String>,
    pub validated: bool,
    pub enclosing_conference: Option<DbId>,
    pub quality_indicators: BTreeMap<i32, ConferenceQualityIndicators>,
}

static CONFERENCE_FIELDS: LazyLock<FieldTable<Conference>> = LazyLock::new(|| {
    FieldTable::<Conference>::builder()
        .text("acronym", |c| c.acronym.clone(), |c, v| c.acronym = v)
        .text("name", |c| c.name.clone(), |c, v| c.name = v)
        .text("publisher", |c| c.publisher.clone(), |c, v| c.publisher = v)
        .text("ISBN", |c| c.isbn.clone(), |c, v| c.isbn = v)
        .text("ISSN", |c| c.issn.clone(), |c, v| c.issn = v)
        .flag("openAccess", |c| c.open_access, |c, v| c.open_access = v)
        .text("conferenceURL", |c| c.conference_url.clone(), |c, v| c.conference_url = v)
        .text("coreId", |c| c.core_id.clone(), |c, v| c.core_id = v)
        .flag("validated", |c| c.validated, |c, v| c.validated = v)
        .build()
});

impl_entity!(Conference, Conference, CONFERENCE_FIELDS);
