use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Canonical document field name to the alternate mutator names tried
/// for it, in registration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AliasTable {
    aliases: BTreeMap<String, Vec<String>>,
}

impl AliasTable {
    /// A table without any registration.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            aliases: BTreeMap::new(),
        }
    }

    /// Registers `alias` as an alternate mutator name for `field`.
    pub fn register(&mut self, field: &str, alias: &str) {
        let entry = self.aliases.entry(field.to_ascii_lowercase()).or_default();
        if !entry.iter().any(|a| a.eq_ignore_ascii_case(alias)) {
            entry.push(alias.to_string());
        }
    }

    /// Merges every registration of `other` after the current ones.
    pub fn extend(&mut self, other: &AliasTable) {
        for (field, aliases) in &other.aliases {
            for alias in aliases {
                self.register(field, alias);
            }
        }
    }

    /// Mutator names to try for a document field: the field itself, the
    /// field without its boolean `is` prefix, then every registered alias.
    #[must_use]
    pub fn candidates(&self, field: &str) -> Vec<String> {
        let mut names = vec![field.to_string()];
        if let Some(stripped) = strip_boolean_prefix(field) {
            names.push(stripped);
        }
        if let Some(aliases) = self.aliases.get(&field.to_ascii_lowercase()) {
            names.extend(aliases.iter().cloned());
        }
        names
    }
}

impl Default for AliasTable {
    fn default() -> Self {
        let mut table = Self::empty();
        table.register("year", "publicationYear");
        table.register("language", "majorLanguage");
        table.register("url", "extraURL");
        table
    }
}

fn strip_boolean_prefix(field: &str) -> Option<String> {
    let rest = field.strip_prefix("is")?;
    let mut chars = rest.chars();
    let first = chars.next()?;
    if !first.is_ascii_uppercase() {
        return None;
    }
    Some(first.to_ascii_lowercase().to_string() + chars.as_str())
}
