//! Import-side json-id to persisted-id bindings.

use std::collections::HashMap;

use labtransfer_types::{DbId, EntityKind, JsonId};

use crate::RecordFault;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bound {
    Record(EntityKind, DbId),
    /// The record was folded into another one and never persisted.
    Absorbed(EntityKind),
}

/// Append-only map from document ids to the records created for them.
#[derive(Debug, Default)]
pub struct IdMap {
    bindings: HashMap<JsonId, Bound>,
}

impl IdMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, id: &JsonId) -> bool {
        self.bindings.contains_key(id)
    }

    /// Records the persisted id of a created record. A binding is never
    /// replaced.
    pub fn bind(&mut self, id: JsonId, kind: EntityKind, db_id: DbId) -> Result<(), RecordFault> {
        if self.bindings.contains_key(&id) {
            return Err(RecordFault::DuplicateId(id.to_string()));
        }
        self.bindings.insert(id, Bound::Record(kind, db_id));
        Ok(())
    }

    /// Marks an id whose record was intentionally not persisted.
    pub fn absorb(&mut self, id: JsonId, kind: EntityKind) {
        self.bindings.entry(id).or_insert(Bound::Absorbed(kind));
    }

    /// Resolves a reference found in `field`, checking the target kind.
    pub fn resolve(&self, field: &str, id: &str, expected: EntityKind) -> Result<DbId, RecordFault> {
        let unbound = || RecordFault::UnboundReference {
            field: field.to_string(),
            id: id.to_string(),
        };
        match self.bindings.get(&JsonId::from_document(id)) {
            Some(Bound::Record(kind, db_id)) if *kind == expected => Ok(*db_id),
            Some(Bound::Record(kind, _)) | Some(Bound::Absorbed(kind)) if *kind != expected => {
                Err(RecordFault::ReferenceKind {
                    field: field.to_string(),
                    id: id.to_string(),
                    expected,
                    found: *kind,
                })
            }
            _ => Err(unbound()),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jid(s: &str) -> JsonId {
        JsonId::from_document(s)
    }

    #[test]
    fn bound_reference_resolves() {
        let mut map = IdMap::new();
        map.bind(jid("/pers#0"), EntityKind::Person, DbId::new(7)).unwrap();
        assert_eq!(map.resolve("person", "/pers#0", EntityKind::Person).unwrap(), DbId::new(7));
    }

    #[test]
    fn rebinding_is_rejected() {
        let mut map = IdMap::new();
        map.bind(jid("/pers#0"), EntityKind::Person, DbId::new(7)).unwrap();
        assert!(matches!(
            map.bind(jid("/pers#0"), EntityKind::Person, DbId::new(8)),
            Err(RecordFault::DuplicateId(_))
        ));
        assert_eq!(map.resolve("person", "/pers#0", EntityKind::Person).unwrap(), DbId::new(7));
    }

    #[test]
    fn unbound_and_wrong_kind() {
        let mut map = IdMap::new();
        map.bind(jid("/ro#0"), EntityKind::Organization, DbId::new(1)).unwrap();
        assert!(matches!(
            map.resolve("person", "/pers#9", EntityKind::Person),
            Err(RecordFault::UnboundReference { .. })
        ));
        assert!(matches!(
            map.resolve("person", "/ro#0", EntityKind::Person),
            Err(RecordFault::ReferenceKind { .. })
        ));
    }

    #[test]
    fn absorbed_ids_do_not_resolve() {
        let mut map = IdMap::new();
        map.absorb(jid("/mbr#1"), EntityKind::Membership);
        assert!(map.contains(&jid("/mbr#1")));
        assert!(matches!(
            map.resolve("person", "/mbr#1", EntityKind::Membership),
            Err(RecordFault::UnboundReference { .. })
        ));
    }
}
