use std::collections::BTreeMap;

use labtransfer_model::Record;
use labtransfer_types::{DbId, EntityKind};

use crate::{EntityStore, MemoryStore, StorageResult};

/// Write overlay over a read-only base store.
///
/// Reads see the overlay first, so records written earlier in a run are
/// found again; ids continue the base sequence. Dropping the overlay
/// discards every write.
pub struct ScratchStore<'a, S: EntityStore + ?Sized> {
    base: &'a S,
    overlay: MemoryStore,
}

impl<'a, S: EntityStore + ?Sized> ScratchStore<'a, S> {
    pub fn new(base: &'a S) -> Self {
        Self {
            overlay: MemoryStore::starting_after(base.last_id()),
            base,
        }
    }

    /// Number of records written to the overlay.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.overlay.len()
    }
}

impl<S: EntityStore + ?Sized> EntityStore for ScratchStore<'_, S> {
    fn begin(&mut self) -> StorageResult<()> {
        self.overlay.begin()
    }

    fn commit(&mut self) -> StorageResult<()> {
        self.overlay.commit()
    }

    fn rollback(&mut self) -> StorageResult<()> {
        self.overlay.rollback()
    }

    fn save(&mut self, record: Record) -> StorageResult<DbId> {
        self.overlay.save(record)
    }

    fn find_by_id(&self, kind: EntityKind, id: DbId) -> StorageResult<Option<Record>> {
        match self.overlay.find_by_id(kind, id)? {
            Some(record) => Ok(Some(record)),
            None => self.base.find_by_id(kind, id),
        }
    }

    fn find_all(&self, kind: EntityKind) -> StorageResult<Vec<Record>> {
        let mut merged: BTreeMap<DbId, Record> = BTreeMap::new();
        for record in self.base.find_all(kind)? {
            if let Some(id) = record.id() {
                merged.insert(id, record);
            }
        }
        for (id, record) in self.overlay.records(kind) {
            merged.insert(*id, record.clone());
        }
        Ok(merged.into_values().collect())
    }

    fn last_id(&self) -> DbId {
        self.overlay.last_id().max(self.base.last_id())
    }
}
