//! Reserved document field names.

/// Field holding an element's document-local reference id.
pub const ID_FIELD: &str = "@id";

/// Prefix of fields that carry relationship semantics and are never bound
/// through the generic projector.
pub const SPECIAL_PREFIX: &str = "@";

/// Prefix of diagnostic fields that are never consumed on import.
pub const HIDDEN_PREFIX: &str = "_";

/// Top-level field carrying the export generation date.
pub const GENERATION_DATE_FIELD: &str = "_last-update-date";

/// Hidden marker telling where a publication came from.
pub const SOURCE_FIELD: &str = "_source";
pub const SOURCE_DATABASE: &str = "database";
pub const SOURCE_EXTERNAL: &str = "external";

/// Hidden field carrying the persisted id of a database-sourced record.
pub const DATABASE_ID_FIELD: &str = "_databaseId";

/// Returns true for keys the generic projector must skip on import.
#[must_use]
pub fn is_reserved_key(key: &str) -> bool {
    key.is_empty()
        || key.starts_with(SPECIAL_PREFIX)
        || key.starts_with(HIDDEN_PREFIX)
        || key.eq_ignore_ascii_case("id")
}
