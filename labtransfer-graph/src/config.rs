//! Import and export configuration.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use labtransfer_model::AliasTable;
use serde::{Deserialize, Serialize};

/// What the importer does when a record fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Stop at the first failed record. Records committed before it stay.
    #[default]
    FailFast,
    /// Roll back the failed record, remember the failure and continue.
    CollectAll,
}

/// Importer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportOptions {
    /// Import into a scratch overlay; the target store is left untouched.
    pub dry_run: bool,
    pub failure_policy: FailurePolicy,
    /// Extra alias registrations, field name to alternate mutator names.
    pub aliases: BTreeMap<String, Vec<String>>,
    /// Jaro-Winkler score above which first names are considered equal.
    pub name_similarity_threshold: f64,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            failure_policy: FailurePolicy::FailFast,
            aliases: BTreeMap::new(),
            name_similarity_threshold: 0.92,
        }
    }
}

impl ImportOptions {
    /// Default alias registrations followed by the configured ones.
    #[must_use]
    pub fn alias_table(&self) -> AliasTable {
        let mut table = AliasTable::default();
        for (field, aliases) in &self.aliases {
            for alias in aliases {
                table.register(field, alias);
            }
        }
        table
    }
}

/// Exporter configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Date stamped on the document; today when unset.
    pub generation_date: Option<NaiveDate>,
    /// Indent the written JSON.
    pub pretty: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_fail_fast_and_persistent() {
        let options = ImportOptions::default();
        assert!(!options.dry_run);
        assert_eq!(options.failure_policy, FailurePolicy::FailFast);
        assert!((options.name_similarity_threshold - 0.92).abs() < f64::EPSILON);
    }

    #[test]
    fn configured_aliases_come_after_defaults() {
        let mut options = ImportOptions::default();
        options
            .aliases
            .insert("language".into(), vec!["lang".into()]);
        assert_eq!(
            options.alias_table().candidates("language"),
            vec!["language", "majorLanguage", "lang"]
        );
    }

    #[test]
    fn options_from_toml() {
        let options: ImportOptions = toml::from_str(
            r#"
            dry_run = true
            failure_policy = "collect_all"

            [aliases]
            url = ["website"]
            "#,
        )
        .unwrap();
        assert!(options.dry_run);
        assert_eq!(options.failure_policy, FailurePolicy::CollectAll);
        assert_eq!(options.aliases["url"], vec!["website"]);
        assert!((options.name_similarity_threshold - 0.92).abs() < f64::EPSILON);
    }

    #[test]
    fn export_settings_from_toml() {
        let settings: ExportSettings = toml::from_str("generation_date = \"2024-05-01\"").unwrap();
        assert_eq!(settings.generation_date, NaiveDate::from_ymd_opt(2024, 5, 1));
        assert!(!settings.pretty);
    }
}
