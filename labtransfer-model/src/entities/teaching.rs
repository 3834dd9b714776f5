use std::sync::LazyLock;

use chrono::NaiveDate;
use labtransfer_types::DbId;

use crate::labels::{Language, StudentType, TeachingActivityLevel, TeachingActivityType, TeachingRole};
use crate::FieldTable;

/// Yearly hours for one kind of teaching.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnualWork {
    pub activity_type: TeachingActivityType,
    pub hours: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeachingActivity {
    pub id: Option<DbId>,
    pub person: Option<DbId>,
    pub university: Option<DbId>,
    pub code: Option<String>,
    pub title: Option<String>,
    pub degree: Option<String>,
    pub level: TeachingActivityLevel,
    pub student_type: StudentType,
    pub role: TeachingRole,
    pub language: Language,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub number_of_students: Option<i64>,
    pub activity_url: Option<String>,
    pub source_url: Option<String>,
    pub explanation: Option<String>,
    pub different_hetd_for_td_tp: bool,
    pub path_to_slides: Option<String>,
    /// Entries with non-positive hours are never kept.
    pub annual_work: Vec<AnnualWork>,
}

impl TeachingActivity {
    /// Records `hours` for `activity_type`, ignoring non-positive values.
    pub fn set_annual_hours(&mut self, activity_type: TeachingActivityType, hours: f32) {
        self.annual_work.retain(|w| w.activity_type != activity_type);
        if hours > 0.0 {
            self.annual_work.push(AnnualWork {
                activity_type,
                hours,
            });
        }
    }
}

static FIELDS: LazyLock<FieldTable<TeachingActivity>> = LazyLock::new(|| {
    FieldTable::<TeachingActivity>::builder()
        .text("code", |t| t.code.clone(), |t, v| t.code = v)
        .text("title", |t| t.title.clone(), |t, v| t.title = v)
        .text("degree", |t| t.degree.clone(), |t, v| t.degree = v)
        .enumeration("level", |t| t.level, |t, v| t.level = v)
        .enumeration("studentType", |t| t.student_type, |t, v| t.student_type = v)
        .enumeration("role", |t| t.role, |t, v| t.role = v)
        .enumeration("language", |t| t.language, |t, v| t.language = v)
        .date("startDate", |t| t.start_date, |t, v| t.start_date = v)
        .date("endDate", |t| t.end_date, |t, v| t.end_date = v)
        .integer(
            "numberOfStudents",
            |t| t.number_of_students,
            |t, v| t.number_of_students = Some(v),
        )
        .text("activityUrl", |t| t.activity_url.clone(), |t, v| t.activity_url = v)
        .text("sourceUrl", |t| t.source_url.clone(), |t, v| t.source_url = v)
        .text("explanation", |t| t.explanation.clone(), |t, v| t.explanation = v)
        .flag(
            "differentHetdForTdTp",
            |t| t.different_hetd_for_td_tp,
            |t, v| t.different_hetd_for_td_tp = v,
        )
        .text("pathToSlides", |t| t.path_to_slides.clone(), |t, v| t.path_to_slides = v)
        .build()
});

impl_entity!(TeachingActivity, TeachingActivity, FIELDS);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_positive_hours_are_dropped() {
        let mut t = TeachingActivity::default();
        t.set_annual_hours(TeachingActivityType::Lecture, 12.0);
        t.set_annual_hours(TeachingActivityType::Tutorial, 0.0);
        assert_eq!(t.annual_work.len(), 1);
        t.set_annual_hours(TeachingActivityType::Lecture, -1.0);
        assert!(t.annual_work.is_empty());
    }
}
