//! Generic scalar bridge between entity instances and flat attribute maps.

use serde_json::{Map, Value};
use tracing::trace;

use labtransfer_types::is_reserved_key;

use crate::field::Entity;
use crate::{AliasTable, ModelError};

/// Reads every generically projectable attribute of `primary`. Missing
/// values are taken from the first fallback that has one. Enumerations
/// are left to kind-specific code.
pub fn project<T: Entity>(primary: &T, fallbacks: &[T]) -> Map<String, Value> {
    let mut attrs = Map::new();
    for field in primary.fields().iter().filter(|f| !f.is_enumeration()) {
        let value = field
            .get(primary)
            .or_else(|| fallbacks.iter().find_map(|fb| field.get(fb)));
        if let Some(value) = value {
            let json = value.to_json();
            if !json.is_null() {
                attrs.insert(field.name().to_string(), json);
            }
        }
    }
    attrs
}

/// Outcome of binding one document field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    /// Applied through the named field.
    Bound(&'static str),
    /// Nothing applied; `null` values land here without touching the entity.
    Absent,
    /// No candidate mutator accepted the value.
    Unbound,
}

/// Binds one field, trying every alias candidate in order.
pub fn bind_field<T: Entity>(
    entity: &mut T,
    field: &str,
    raw: &Value,
    aliases: &AliasTable,
) -> Binding {
    if raw.is_null() {
        return Binding::Absent;
    }
    let table = entity.fields();
    for candidate in aliases.candidates(field) {
        if let Some(def) = table.find(&candidate) {
            if def.set(entity, raw) {
                trace!("Bound {} to {}.{}", field, T::KIND, def.name());
                return Binding::Bound(def.name());
            }
        }
    }
    Binding::Unbound
}

/// Binds every non-reserved field of `attrs`. Fields listed in `manual`
/// are left to the caller; any other field that binds nowhere is an error.
pub fn bind_all<T: Entity>(
    entity: &mut T,
    attrs: &Map<String, Value>,
    aliases: &AliasTable,
    manual: &[&str],
) -> Result<(), ModelError> {
    for (key, raw) in attrs {
        if is_reserved_key(key) || manual.iter().any(|m| m.eq_ignore_ascii_case(key)) {
            continue;
        }
        if bind_field(entity, key, raw, aliases) == Binding::Unbound {
            return Err(ModelError::NoMutator {
                kind: T::KIND,
                field: key.clone(),
            });
        }
    }
    Ok(())
}
