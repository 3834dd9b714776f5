use std::collections::BTreeMap;

use labtransfer_model::Record;
use labtransfer_types::{DbId, EntityKind};
use tracing::trace;

use crate::{EntityStore, StorageError, StorageResult};

#[derive(Debug)]
struct Journal {
    last_id: u64,
    undo: Vec<(EntityKind, DbId, Option<Record>)>,
}

/// In-memory store with one id sequence shared by every kind.
///
/// Writes outside a transaction are applied immediately.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: BTreeMap<EntityKind, BTreeMap<DbId, Record>>,
    last_id: u64,
    journal: Option<Journal>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose first allocated id follows `last_id`.
    #[must_use]
    pub fn starting_after(last_id: DbId) -> Self {
        Self {
            last_id: last_id.get(),
            ..Self::default()
        }
    }

    /// Total number of records over every kind.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.values().map(BTreeMap::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn in_transaction(&self) -> bool {
        self.journal.is_some()
    }

    pub(crate) fn records(&self, kind: EntityKind) -> impl Iterator<Item = (&DbId, &Record)> {
        self.tables.get(&kind).into_iter().flat_map(BTreeMap::iter)
    }
}

impl EntityStore for MemoryStore {
    fn begin(&mut self) -> StorageResult<()> {
        if self.journal.is_some() {
            return Err(StorageError::TransactionActive);
        }
        self.journal = Some(Journal {
            last_id: self.last_id,
            undo: Vec::new(),
        });
        Ok(())
    }

    fn commit(&mut self) -> StorageResult<()> {
        self.journal.take().map(|_| ()).ok_or(StorageError::NoTransaction)
    }

    fn rollback(&mut self) -> StorageResult<()> {
        let journal = self.journal.take().ok_or(StorageError::NoTransaction)?;
        for (kind, id, previous) in journal.undo.into_iter().rev() {
            let table = self.tables.entry(kind).or_default();
            match previous {
                Some(record) => {
                    table.insert(id, record);
                }
                None => {
                    table.remove(&id);
                }
            }
        }
        self.last_id = journal.last_id;
        trace!("Rolled back to id {}", self.last_id);
        Ok(())
    }

    fn save(&mut self, mut record: Record) -> StorageResult<DbId> {
        let kind = record.kind();
        let id = match record.id() {
            Some(id) => {
                self.last_id = self.last_id.max(id.get());
                id
            }
            None => {
                self.last_id += 1;
                let id = DbId::new(self.last_id);
                record.set_id(id);
                id
            }
        };
        let previous = self.tables.entry(kind).or_default().insert(id, record);
        if let Some(journal) = self.journal.as_mut() {
            journal.undo.push((kind, id, previous));
        }
        Ok(id)
    }

    fn find_by_id(&self, kind: EntityKind, id: DbId) -> StorageResult<Option<Record>> {
        Ok(self.tables.get(&kind).and_then(|t| t.get(&id)).cloned())
    }

    fn find_all(&self, kind: EntityKind) -> StorageResult<Vec<Record>> {
        Ok(self.records(kind).map(|(_, r)| r.clone()).collect())
    }

    fn last_id(&self) -> DbId {
        DbId::new(self.last_id)
    }

    fn count(&self, kind: EntityKind) -> StorageResult<usize> {
        Ok(self.tables.get(&kind).map_or(0, BTreeMap::len))
    }
}
