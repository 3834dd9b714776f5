use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use labtransfer_types::{DbId, EntityKind};

use crate::field::{Entity, FieldTable, TableBuilder};
use crate::labels::Language;
use crate::{ModelError, Record};

/// Publications older than this year are rejected as implausible.
pub const MIN_PUBLICATION_YEAR: i64 = 1980;

labeled_enum! {
    PublicationType default Other {
        InternationalJournalPaper => "INTERNATIONAL_JOURNAL_PAPER",
        NationalJournalPaper => "NATIONAL_JOURNAL_PAPER",
        InternationalJournalPaperWithoutCommittee => "INTERNATIONAL_JOURNAL_PAPER_WITHOUT_COMMITTEE",
        NationalJournalPaperWithoutCommittee => "NATIONAL_JOURNAL_PAPER_WITHOUT_COMMITTEE",
        ScientificCulturePaper => "SCIENTIFIC_CULTURE_PAPER",
        InternationalJournalEdition => "INTERNATIONAL_JOURNAL_EDITION",
        NationalJournalEdition => "NATIONAL_JOURNAL_EDITION",
        InternationalConferencePaper => "INTERNATIONAL_CONFERENCE_PAPER",
        NationalConferencePaper => "NATIONAL_CONFERENCE_PAPER",
        InternationalOralCommunication => "INTERNATIONAL_ORAL_COMMUNICATION",
        NationalOralCommunication => "NATIONAL_ORAL_COMMUNICATION",
        InternationalPoster => "INTERNATIONAL_POSTER",
        NationalPoster => "NATIONAL_POSTER",
        InternationalKeynote => "INTERNATIONAL_KEYNOTE",
        NationalKeynote => "NATIONAL_KEYNOTE",
        InternationalBook => "INTERNATIONAL_BOOK",
        NationalBook => "NATIONAL_BOOK",
        ScientificCultureBook => "SCIENTIFIC_CULTURE_BOOK",
        InternationalBookChapter => "INTERNATIONAL_BOOK_CHAPTER",
        NationalBookChapter => "NATIONAL_BOOK_CHAPTER",
        ScientificCultureBookChapter => "SCIENTIFIC_CULTURE_BOOK_CHAPTER",
        HdrThesis => "HDR_THESIS",
        PhdThesis => "PHD_THESIS",
        MasterThesis => "MASTER_THESIS",
        InternationalPatent => "INTERNATIONAL_PATENT",
        EuropeanPatent => "EUROPEAN_PATENT",
        NationalPatent => "NATIONAL_PATENT",
        ResearchTransfertReport => "RESEARCH_TRANSFERT_REPORT",
        TechnicalReport => "TECHNICAL_REPORT",
        ProjectReport => "PROJECT_REPORT",
        TeachingDocument => "TEACHING_DOCUMENT",
        TutorialDocumentation => "TUTORIAL_DOCUMENTATION",
        ResearchTool => "RESEARCH_TOOL",
        InternationalPresentation => "INTERNATIONAL_PRESENTATION",
        NationalPresentation => "NATIONAL_PRESENTATION",
        ArtisticProduction => "ARTISTIC_PRODUCTION",
        Other => "OTHER",
    }
}

impl PublicationType {
    /// The record shape publications of this type are built with.
    #[must_use]
    pub const fn shape(self) -> PublicationShape {
        use PublicationType::*;
        match self {
            InternationalJournalPaper
            | NationalJournalPaper
            | InternationalJournalPaperWithoutCommittee
            | NationalJournalPaperWithoutCommittee
            | ScientificCulturePaper => PublicationShape::JournalPaper,
            InternationalJournalEdition | NationalJournalEdition => PublicationShape::JournalEdition,
            InternationalConferencePaper
            | NationalConferencePaper
            | InternationalOralCommunication
            | NationalOralCommunication
            | InternationalPoster
            | NationalPoster => PublicationShape::ConferencePaper,
            InternationalKeynote | NationalKeynote => PublicationShape::KeyNote,
            InternationalBook | NationalBook | ScientificCultureBook => PublicationShape::Book,
            InternationalBookChapter | NationalBookChapter | ScientificCultureBookChapter => {
                PublicationShape::BookChapter
            }
            HdrThesis | PhdThesis | MasterThesis => PublicationShape::Thesis,
            InternationalPatent | EuropeanPatent | NationalPatent => PublicationShape::Patent,
            ResearchTransfertReport
            | TechnicalReport
            | ProjectReport
            | TeachingDocument
            | TutorialDocumentation => PublicationShape::Report,
            ResearchTool
            | InternationalPresentation
            | NationalPresentation
            | ArtisticProduction
            | Other => PublicationShape::MiscDocument,
        }
    }
}

/// Record shapes; each accepts its own set of detail fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PublicationShape {
    JournalPaper,
    JournalEdition,
    ConferencePaper,
    KeyNote,
    Book,
    BookChapter,
    Thesis,
    Patent,
    Report,
    MiscDocument,
}

impl PublicationShape {
    pub const ALL: [PublicationShape; 10] = [
        Self::JournalPaper,
        Self::JournalEdition,
        Self::ConferencePaper,
        Self::KeyNote,
        Self::Book,
        Self::BookChapter,
        Self::Thesis,
        Self::Patent,
        Self::Report,
        Self::MiscDocument,
    ];

    /// Journal-based shapes must reference a journal.
    #[must_use]
    pub const fn is_journal_based(self) -> bool {
        matches!(self, Self::JournalPaper | Self::JournalEdition)
    }

    /// Conference-based shapes must reference a conference.
    #[must_use]
    pub const fn is_conference_based(self) -> bool {
        matches!(self, Self::ConferencePaper | Self::KeyNote)
    }

    const fn index(self) -> usize {
        self as usize
    }

    const fn details(self) -> &'static [Detail] {
        use Detail::*;
        match self {
            Self::JournalPaper => &[Volume, Number, Pages, Series],
            Self::JournalEdition => &[Volume, Number, Pages],
            Self::ConferencePaper => &[Volume, Number, Pages, Editors, Series, Organization, Address],
            Self::KeyNote => &[Editors, Organization, Address],
            Self::Book => &[Volume, Number, Pages, Edition, Editors, Series, Address, Publisher],
            Self::BookChapter => &[
                BookTitle,
                ChapterNumber,
                Edition,
                Volume,
                Number,
                Pages,
                Editors,
                Series,
                Address,
                Publisher,
            ],
            Self::Thesis => &[Institution, Address],
            Self::Patent => &[Institution, Address, PatentNumber],
            Self::Report => &[Institution, Address, ReportNumber, ReportType],
            Self::MiscDocument => &[HowPublished, DocumentType, Number, Organization, Address],
        }
    }
}

/// Shape-specific attributes. Which of them a publication accepts is
/// decided by its shape's field table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PublicationDetails {
    pub volume: Option<String>,
    pub number: Option<String>,
    pub pages: Option<String>,
    pub editors: Option<String>,
    pub series: Option<String>,
    pub edition: Option<String>,
    pub publisher: Option<String>,
    pub address: Option<String>,
    pub organization: Option<String>,
    pub book_title: Option<String>,
    pub chapter_number: Option<String>,
    pub institution: Option<String>,
    pub patent_number: Option<String>,
    pub report_number: Option<String>,
    pub report_type: Option<String>,
    pub how_published: Option<String>,
    pub document_type: Option<String>,
}

#[derive(Debug, Clone, Copy)]
enum Detail {
    Volume,
    Number,
    Pages,
    Editors,
    Series,
    Edition,
    Publisher,
    Address,
    Organization,
    BookTitle,
    ChapterNumber,
    Institution,
    PatentNumber,
    ReportNumber,
    ReportType,
    HowPublished,
    DocumentType,
}

impl Detail {
    const fn name(self) -> &'static str {
        match self {
            Self::Volume => "volume",
            Self::Number => "number",
            Self::Pages => "pages",
            Self::Editors => "editors",
            Self::Series => "series",
            Self::Edition => "edition",
            Self::Publisher => "publisher",
            Self::Address => "address",
            Self::Organization => "organization",
            Self::BookTitle => "bookTitle",
            Self::ChapterNumber => "chapterNumber",
            Self::Institution => "institution",
            Self::PatentNumber => "patentNumber",
            Self::ReportNumber => "reportNumber",
            Self::ReportType => "reportType",
            Self::HowPublished => "howPublished",
            Self::DocumentType => "documentType",
        }
    }

    fn slot(self, d: &mut PublicationDetails) -> &mut Option<String> {
        match self {
            Self::Volume => &mut d.volume,
            Self::Number => &mut d.number,
            Self::Pages => &mut d.pages,
            Self::Editors => &mut d.editors,
            Self::Series => &mut d.series,
            Self::Edition => &mut d.edition,
            Self::Publisher => &mut d.publisher,
            Self::Address => &mut d.address,
            Self::Organization => &mut d.organization,
            Self::BookTitle => &mut d.book_title,
            Self::ChapterNumber => &mut d.chapter_number,
            Self::Institution => &mut d.institution,
            Self::PatentNumber => &mut d.patent_number,
            Self::ReportNumber => &mut d.report_number,
            Self::ReportType => &mut d.report_type,
            Self::HowPublished => &mut d.how_published,
            Self::DocumentType => &mut d.document_type,
        }
    }

    fn read(self, d: &PublicationDetails) -> Option<String> {
        let value = match self {
            Self::Volume => &d.volume,
            Self::Number => &d.number,
            Self::Pages => &d.pages,
            Self::Editors => &d.editors,
            Self::Series => &d.series,
            Self::Edition => &d.edition,
            Self::Publisher => &d.publisher,
            Self::Address => &d.address,
            Self::Organization => &d.organization,
            Self::BookTitle => &d.book_title,
            Self::ChapterNumber => &d.chapter_number,
            Self::Institution => &d.institution,
            Self::PatentNumber => &d.patent_number,
            Self::ReportNumber => &d.report_number,
            Self::ReportType => &d.report_type,
            Self::HowPublished => &d.how_published,
            Self::DocumentType => &d.document_type,
        };
        value.clone()
    }
}

/// Author position in a publication; ranks run 0..n.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Authorship {
    pub person: DbId,
    pub rank: u32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Publication {
    pub id: Option<DbId>,
    pub publication_type: Option<PublicationType>,
    pub title: Option<String>,
    pub abstract_text: Option<String>,
    pub keywords: Option<String>,
    pub publication_date: Option<NaiveDate>,
    pub publication_year: Option<i64>,
    pub doi: Option<String>,
    pub isbn: Option<String>,
    pub issn: Option<String>,
    pub hal_id: Option<String>,
    pub dblp_url: Option<String>,
    pub extra_url: Option<String>,
    pub video_url: Option<String>,
    pub path_to_downloadable_pdf: Option<String>,
    pub path_to_downloadable_award_certificate: Option<String>,
    pub major_language: Language,
    pub manual_validation_forced: bool,
    pub validated: bool,
    pub authors: Vec<Authorship>,
    pub journal: Option<DbId>,
    pub conference: Option<DbId>,
    pub details: PublicationDetails,
    pub scientific_axes: Vec<DbId>,
}

impl Publication {
    #[must_use]
    pub fn new(publication_type: PublicationType) -> Self {
        Self {
            publication_type: Some(publication_type),
            ..Self::default()
        }
    }

    /// Shape of this publication; untyped publications are miscellaneous.
    #[must_use]
    pub fn shape(&self) -> PublicationShape {
        self.publication_type
            .map_or(PublicationShape::MiscDocument, PublicationType::shape)
    }

    /// Publication year, falling back on the publication date.
    #[must_use]
    pub fn year(&self) -> Option<i64> {
        self.publication_year
            .or_else(|| self.publication_date.map(|d| i64::from(d.year())))
    }

    /// Sets the publication date to the first day of `month` in the
    /// publication year. Does nothing without a positive year.
    pub fn set_month(&mut self, month: u32) -> bool {
        let Some(year) = self.year().filter(|y| *y > 0) else {
            return false;
        };
        match i32::try_from(year)
            .ok()
            .and_then(|y| NaiveDate::from_ymd_opt(y, month, 1))
        {
            Some(date) => {
                self.publication_date = Some(date);
                true
            }
            None => false,
        }
    }

    /// Minimal consistency rules every persisted publication satisfies.
    pub fn check_sanity(&self) -> Result<(), ModelError> {
        let invalid = |reason: String| ModelError::Invalid {
            kind: EntityKind::Publication,
            reason,
        };
        if self.publication_type.is_none() {
            return Err(invalid("publication type is missing".into()));
        }
        if self.title.as_deref().is_none_or(|t| t.trim().is_empty()) {
            return Err(invalid("publication title is blank".into()));
        }
        match self.year() {
            Some(y) if y > MIN_PUBLICATION_YEAR => Ok(()),
            Some(y) => Err(invalid(format!(
                "publication year {y} is not after {MIN_PUBLICATION_YEAR}"
            ))),
            None => Err(invalid("publication year is missing".into())),
        }
    }

    /// Person ids of the authors in rank order.
    #[must_use]
    pub fn author_ids(&self) -> Vec<DbId> {
        let mut authors = self.authors.clone();
        authors.sort_by_key(|a| a.rank);
        authors.into_iter().map(|a| a.person).collect()
    }
}

/// Three-letter month names used by the `month` document field.
const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// Parses `jan`..`dec` (or a longer name starting with one), or `1`..`12`.
#[must_use]
pub fn parse_month(raw: &str) -> Option<u32> {
    let raw = raw.trim().to_ascii_lowercase();
    if let Ok(n) = raw.parse::<u32>() {
        return (1..=12).contains(&n).then_some(n);
    }
    let prefix = raw.get(..3)?;
    MONTHS
        .iter()
        .position(|m| *m == prefix)
        .and_then(|i| u32::try_from(i + 1).ok())
}

fn common_fields() -> TableBuilder<Publication> {
    FieldTable::<Publication>::builder()
        .text("title", |p| p.title.clone(), |p, v| p.title = v)
        .text("abstractText", |p| p.abstract_text.clone(), |p, v| p.abstract_text = v)
        .text("keywords", |p| p.keywords.clone(), |p, v| p.keywords = v)
        .date("publicationDate", |p| p.publication_date, |p, v| p.publication_date = v)
        .integer(
            "publicationYear",
            |p| p.year(),
            |p, v| p.publication_year = Some(v),
        )
        .text("DOI", |p| p.doi.clone(), |p, v| p.doi = v)
        .text("ISBN", |p| p.isbn.clone(), |p, v| p.isbn = v)
        .text("ISSN", |p| p.issn.clone(), |p, v| p.issn = v)
        .text("halId", |p| p.hal_id.clone(), |p, v| p.hal_id = v)
        .text("dblpURL", |p| p.dblp_url.clone(), |p, v| p.dblp_url = v)
        .text("extraURL", |p| p.extra_url.clone(), |p, v| p.extra_url = v)
        .text("videoURL", |p| p.video_url.clone(), |p, v| p.video_url = v)
        .text(
            "pathToDownloadablePDF",
            |p| p.path_to_downloadable_pdf.clone(),
            |p, v| p.path_to_downloadable_pdf = v,
        )
        .text(
            "pathToDownloadableAwardCertificate",
            |p| p.path_to_downloadable_award_certificate.clone(),
            |p, v| p.path_to_downloadable_award_certificate = v,
        )
        .enumeration("majorLanguage", |p| p.major_language, |p, v| p.major_language = v)
        .flag(
            "manualValidationForced",
            |p| p.manual_validation_forced,
            |p, v| p.manual_validation_forced = v,
        )
        .flag("validated", |p| p.validated, |p, v| p.validated = v)
}

fn shape_fields(shape: PublicationShape) -> FieldTable<Publication> {
    shape
        .details()
        .iter()
        .copied()
        .fold(common_fields(), |builder, detail| {
            builder.text(
                detail.name(),
                move |p| detail.read(&p.details),
                move |p, v| *detail.slot(&mut p.details) = v,
            )
        })
        .build()
}

static SHAPE_FIELDS: LazyLock<Vec<FieldTable<Publication>>> =
    LazyLock::new(|| PublicationShape::ALL.into_iter().map(shape_fields).collect());

impl Entity for Publication {
    const KIND: EntityKind = EntityKind::Publication;

    fn id(&self) -> Option<DbId> {
        self.id
    }

    fn set_id(&mut self, id: DbId) {
        self.id = Some(id);
    }

    fn fields(&self) -> &'static FieldTable<Self> {
        &SHAPE_FIELDS[self.shape().index()]
    }

    fn into_record(self) -> Record {
        Record::Publication(self)
    }

    fn from_record(record: Record) -> Option<Self> {
        match record {
            Record::Publication(inner) => Some(inner),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Labeled;

    #[test]
    fn every_type_maps_to_a_shape() {
        for ty in PublicationType::VARIANTS {
            let shape = ty.shape();
            assert!(PublicationShape::ALL.contains(&shape));
        }
        assert_eq!(
            PublicationType::InternationalPoster.shape(),
            PublicationShape::ConferencePaper
        );
        assert_eq!(PublicationType::EuropeanPatent.shape(), PublicationShape::Patent);
        assert_eq!(
            PublicationType::ScientificCultureBook.shape(),
            PublicationShape::Book
        );
    }

    #[test]
    fn shape_tables_differ_in_details() {
        let paper = Publication::new(PublicationType::InternationalJournalPaper);
        let thesis = Publication::new(PublicationType::PhdThesis);
        assert!(paper.fields().find("volume").is_some());
        assert!(paper.fields().find("institution").is_none());
        assert!(thesis.fields().find("institution").is_some());
        assert!(thesis.fields().find("title").is_some());
    }

    #[test]
    fn months() {
        assert_eq!(parse_month("jan"), Some(1));
        assert_eq!(parse_month("December"), Some(12));
        assert_eq!(parse_month("7"), Some(7));
        assert_eq!(parse_month("13"), None);
        assert_eq!(parse_month("xx"), None);
    }

    #[test]
    fn month_needs_a_year() {
        let mut p = Publication::new(PublicationType::TechnicalReport);
        assert!(!p.set_month(3));
        p.publication_year = Some(2020);
        assert!(p.set_month(3));
        assert_eq!(p.publication_date, NaiveDate::from_ymd_opt(2020, 3, 1));
    }

    #[test]
    fn sanity_rules() {
        let mut p = Publication::new(PublicationType::PhdThesis);
        p.publication_year = Some(2020);
        assert!(p.check_sanity().is_err());
        p.title = Some("  ".into());
        assert!(p.check_sanity().is_err());
        p.title = Some("Thesis".into());
        assert!(p.check_sanity().is_ok());
        p.publication_year = Some(1980);
        assert!(p.check_sanity().is_err());
        p.publication_type = None;
        p.publication_year = Some(2020);
        assert!(p.check_sanity().is_err());
    }
}
