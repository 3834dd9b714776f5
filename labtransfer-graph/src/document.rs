//! Reading and writing the transfer document.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use labtransfer_model::{format_date, Labeled};
use labtransfer_types::{EntityKind, JsonId, GENERATION_DATE_FIELD, ID_FIELD};
use serde_json::{json, Map, Value};

use crate::{ImportError, RecordFault};

/// Inline reference object `{"@id": "..."}`.
#[must_use]
pub fn reference(id: &JsonId) -> Value {
    json!({ ID_FIELD: id.as_str() })
}

/// The id carried by a reference object, if `value` is one.
#[must_use]
pub fn reference_id(value: &Value) -> Option<&str> {
    value.as_object()?.get(ID_FIELD)?.as_str()
}

/// The reference id of a document element.
#[must_use]
pub fn element_id(element: &Map<String, Value>) -> Option<JsonId> {
    element
        .get(ID_FIELD)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(JsonId::from_document)
}

pub(crate) fn put_label<E: Labeled>(node: &mut Map<String, Value>, field: &str, value: E) {
    node.insert(field.to_string(), Value::String(value.label().to_string()));
}

/// In-memory document under construction. Sections keep insertion order;
/// nodes stay mutable until `finish` so deferred edges can be written into
/// already-emitted elements.
#[derive(Debug, Default)]
pub struct DocumentBuilder {
    sections: BTreeMap<EntityKind, Vec<Map<String, Value>>>,
    global: Option<Map<String, Value>>,
}

impl DocumentBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a node and returns its index in the section.
    pub fn push(&mut self, kind: EntityKind, node: Map<String, Value>) -> usize {
        let section = self.sections.entry(kind).or_default();
        section.push(node);
        section.len() - 1
    }

    pub fn node_mut(&mut self, kind: EntityKind, index: usize) -> Option<&mut Map<String, Value>> {
        self.sections.get_mut(&kind)?.get_mut(index)
    }

    pub fn set_global(&mut self, global: Map<String, Value>) {
        self.global = Some(global);
    }

    #[must_use]
    pub fn len(&self, kind: EntityKind) -> usize {
        self.sections.get(&kind).map_or(0, Vec::len)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.global.is_none() && self.sections.values().all(Vec::is_empty)
    }

    /// Builds the root object, or `None` when nothing was emitted. Empty
    /// sections are omitted.
    #[must_use]
    pub fn finish(self, generation_date: NaiveDate) -> Option<Value> {
        if self.is_empty() {
            return None;
        }
        let mut root = Map::new();
        root.insert(
            GENERATION_DATE_FIELD.to_string(),
            Value::String(format_date(generation_date)),
        );
        if let Some(global) = self.global {
            root.insert(EntityKind::GlobalIndicators.section().to_string(), Value::Object(global));
        }
        for (kind, nodes) in self.sections {
            if nodes.is_empty() {
                continue;
            }
            root.insert(
                kind.section().to_string(),
                Value::Array(nodes.into_iter().map(Value::Object).collect()),
            );
        }
        Some(Value::Object(root))
    }
}

/// The elements of one section; an absent section is empty.
pub fn section_elements(root: &Map<String, Value>, kind: EntityKind) -> Result<&[Value], ImportError> {
    match root.get(kind.section()) {
        None | Some(Value::Null) => Ok(&[]),
        Some(Value::Array(elements)) => Ok(elements),
        Some(_) => Err(ImportError::InvalidDocument(format!(
            "section '{}' is not an array",
            kind.section()
        ))),
    }
}

/// Element counts per present section, without importing anything.
#[must_use]
pub fn section_counts(root: &Map<String, Value>) -> Vec<(EntityKind, usize)> {
    EntityKind::ALL
        .iter()
        .filter_map(|kind| match root.get(kind.section()) {
            Some(Value::Array(elements)) => Some((*kind, elements.len())),
            Some(Value::Object(_)) => Some((*kind, 1)),
            _ => None,
        })
        .collect()
}

pub(crate) fn as_object(element: &Value) -> Result<&Map<String, Value>, RecordFault> {
    element.as_object().ok_or(RecordFault::NotAnObject)
}

/// Optional single reference. Absent and `null` read as `None`.
pub(crate) fn optional_ref<'a>(
    element: &'a Map<String, Value>,
    field: &str,
) -> Result<Option<&'a str>, RecordFault> {
    match element.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => reference_id(value)
            .map(Some)
            .ok_or_else(|| RecordFault::MalformedReference {
                field: field.to_string(),
            }),
    }
}

pub(crate) fn required_ref<'a>(
    element: &'a Map<String, Value>,
    field: &str,
) -> Result<&'a str, RecordFault> {
    optional_ref(element, field)?.ok_or_else(|| RecordFault::MissingField(field.to_string()))
}

/// Array of references. Absent reads as empty.
pub(crate) fn ref_list<'a>(
    element: &'a Map<String, Value>,
    field: &str,
) -> Result<Vec<&'a str>, RecordFault> {
    match element.get(field) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(values)) => values
            .iter()
            .map(|v| {
                reference_id(v).ok_or_else(|| RecordFault::MalformedReference {
                    field: field.to_string(),
                })
            })
            .collect(),
        Some(_) => Err(RecordFault::MalformedReference {
            field: field.to_string(),
        }),
    }
}

/// Array of composite objects. Absent reads as empty.
pub(crate) fn object_list<'a>(
    element: &'a Map<String, Value>,
    field: &str,
) -> Result<Vec<&'a Map<String, Value>>, RecordFault> {
    match element.get(field) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(values)) => values
            .iter()
            .map(|v| {
                v.as_object()
                    .ok_or_else(|| RecordFault::invalid(field, "expected an array of objects"))
            })
            .collect(),
        Some(_) => Err(RecordFault::invalid(field, "expected an array of objects")),
    }
}

/// Array of strings. Absent reads as empty; blank strings are skipped.
pub(crate) fn string_list(element: &Map<String, Value>, field: &str) -> Result<Vec<String>, RecordFault> {
    match element.get(field) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(values)) => values
            .iter()
            .filter(|v| !v.as_str().is_some_and(|s| s.trim().is_empty()))
            .map(|v| {
                v.as_str()
                    .map(|s| s.trim().to_string())
                    .ok_or_else(|| RecordFault::invalid(field, "expected an array of strings"))
            })
            .collect(),
        Some(_) => Err(RecordFault::invalid(field, "expected an array of strings")),
    }
}

pub(crate) fn optional_str<'a>(element: &'a Map<String, Value>, field: &str) -> Option<&'a str> {
    element
        .get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Reads an enumeration field; absent and blank select the default member.
pub(crate) fn label_field<E: Labeled>(element: &Map<String, Value>, field: &str) -> Result<E, RecordFault> {
    match element.get(field) {
        None | Some(Value::Null) => Ok(E::default()),
        Some(Value::String(s)) => E::parse_label(s)
            .ok_or_else(|| RecordFault::invalid(field, format!("unknown value '{s}'"))),
        Some(_) => Err(RecordFault::invalid(field, "expected text")),
    }
}
