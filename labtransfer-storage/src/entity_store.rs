use labtransfer_model::{Entity, Record};
use labtransfer_types::{DbId, EntityKind};

use crate::{StorageError, StorageResult};

/// The storage collaborator: persistence engine internals stay behind it.
pub trait EntityStore {
    /// Opens a short transactional unit.
    fn begin(&mut self) -> StorageResult<()>;

    fn commit(&mut self) -> StorageResult<()>;

    /// Undoes every write since `begin`.
    fn rollback(&mut self) -> StorageResult<()>;

    /// Inserts a record without id, or updates the record with its id.
    /// Returns the persisted id.
    fn save(&mut self, record: Record) -> StorageResult<DbId>;

    fn find_by_id(&self, kind: EntityKind, id: DbId) -> StorageResult<Option<Record>>;

    /// Every record of `kind`, in stable storage order.
    fn find_all(&self, kind: EntityKind) -> StorageResult<Vec<Record>>;

    /// Highest id allocated so far.
    fn last_id(&self) -> DbId;

    fn count(&self, kind: EntityKind) -> StorageResult<usize> {
        Ok(self.find_all(kind)?.len())
    }
}

/// Typed helpers over any `EntityStore`.
pub trait EntityStoreExt: EntityStore {
    /// Saves `entity` and returns its persisted id.
    fn store<T: Entity>(&mut self, entity: T) -> StorageResult<DbId> {
        self.save(entity.into_record())
    }

    fn load<T: Entity>(&self, id: DbId) -> StorageResult<Option<T>> {
        match self.find_by_id(T::KIND, id)? {
            None => Ok(None),
            Some(record) => {
                let found = record.kind();
                T::from_record(record)
                    .map(Some)
                    .ok_or(StorageError::KindMismatch {
                        expected: T::KIND,
                        found,
                    })
            }
        }
    }

    fn require<T: Entity>(&self, id: DbId) -> StorageResult<T> {
        self.load(id)?
            .ok_or(StorageError::NotFound { kind: T::KIND, id })
    }

    fn all<T: Entity>(&self) -> StorageResult<Vec<T>> {
        self.find_all(T::KIND)?
            .into_iter()
            .map(|record| {
                let found = record.kind();
                T::from_record(record).ok_or(StorageError::KindMismatch {
                    expected: T::KIND,
                    found,
                })
            })
            .collect()
    }
}

impl<S: EntityStore + ?Sized> EntityStoreExt for S {}
