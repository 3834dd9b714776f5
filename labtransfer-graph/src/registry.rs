//! Export-side assignment of document-local reference ids.

use std::collections::HashMap;

use labtransfer_types::{DbId, EntityKind, JsonId, TransientId};

/// Identity of a record during one export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistryKey {
    /// A persisted record.
    Stored(EntityKind, DbId),
    /// A record merged in for this export only.
    Transient(EntityKind, TransientId),
}

impl RegistryKey {
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        match self {
            Self::Stored(kind, _) | Self::Transient(kind, _) => *kind,
        }
    }
}

/// Assigns `<prefix><counter>` ids on first sight, one counter per kind
/// starting at 0.
#[derive(Debug, Default)]
pub struct ReferenceRegistry {
    counters: HashMap<EntityKind, u64>,
    ids: HashMap<RegistryKey, JsonId>,
}

impl ReferenceRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id of `key`, allocating it on first call.
    pub fn assign(&mut self, key: RegistryKey) -> JsonId {
        if let Some(id) = self.ids.get(&key) {
            return id.clone();
        }
        let counter = self.counters.entry(key.kind()).or_insert(0);
        let id = JsonId::new(key.kind(), *counter);
        *counter += 1;
        self.ids.insert(key, id.clone());
        id
    }

    #[must_use]
    pub fn lookup(&self, key: &RegistryKey) -> Option<&JsonId> {
        self.ids.get(key)
    }

    /// Number of ids handed out for `kind`.
    #[must_use]
    pub fn assigned(&self, kind: EntityKind) -> u64 {
        self.counters.get(&kind).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_are_per_kind_and_start_at_zero() {
        let mut registry = ReferenceRegistry::new();
        let a = registry.assign(RegistryKey::Stored(EntityKind::Person, DbId::new(10)));
        let b = registry.assign(RegistryKey::Stored(EntityKind::Person, DbId::new(3)));
        let c = registry.assign(RegistryKey::Stored(EntityKind::Journal, DbId::new(10)));
        assert_eq!(a.as_str(), "/pers#0");
        assert_eq!(b.as_str(), "/pers#1");
        assert_eq!(c.as_str(), "/jour#0");
        assert_eq!(registry.assigned(EntityKind::Person), 2);
    }

    #[test]
    fn repeat_assign_returns_same_id() {
        let mut registry = ReferenceRegistry::new();
        let key = RegistryKey::Stored(EntityKind::Organization, DbId::new(1));
        let first = registry.assign(key);
        let second = registry.assign(key);
        assert_eq!(first, second);
        assert_eq!(registry.assigned(EntityKind::Organization), 1);
    }

    #[test]
    fn identity_not_value_equality() {
        let mut registry = ReferenceRegistry::new();
        let a = registry.assign(RegistryKey::Transient(EntityKind::Person, TransientId::new()));
        let b = registry.assign(RegistryKey::Transient(EntityKind::Person, TransientId::new()));
        assert_ne!(a, b);
    }

    #[test]
    fn lookup_of_unseen_key_is_absent() {
        let registry = ReferenceRegistry::new();
        assert!(registry
            .lookup(&RegistryKey::Stored(EntityKind::Address, DbId::new(1)))
            .is_none());
    }
}
