use labtransfer_model::{Address, Person, Record};
use labtransfer_storage::{EntityStore, EntityStoreExt, MemoryStore, ScratchStore, StorageError};
use labtransfer_types::{DbId, EntityKind};
use pretty_assertions::assert_eq;

fn person(last: &str) -> Person {
    Person {
        last_name: Some(last.to_string()),
        ..Person::default()
    }
}

fn make_store() -> MemoryStore {
    let mut store = MemoryStore::new();
    store.store(person("Curie")).unwrap();
    store.store(person("Noether")).unwrap();
    store
}

// ── MemoryStore ──────────────────────────────────────────────────

#[test]
fn ids_are_allocated_in_sequence_across_kinds() {
    let mut store = MemoryStore::new();
    let a = store.store(person("A")).unwrap();
    let b = store.store(Address::default()).unwrap();
    assert_eq!(a, DbId::new(1));
    assert_eq!(b, DbId::new(2));
    assert_eq!(store.last_id(), DbId::new(2));
}

#[test]
fn save_with_id_updates_in_place() {
    let mut store = make_store();
    let mut p: Person = store.require(DbId::new(1)).unwrap();
    p.first_name = Some("Marie".into());
    let id = store.store(p).unwrap();
    assert_eq!(id, DbId::new(1));
    assert_eq!(store.count(EntityKind::Person).unwrap(), 2);
    let p: Person = store.require(id).unwrap();
    assert_eq!(p.first_name.as_deref(), Some("Marie"));
}

#[test]
fn find_all_is_in_id_order() {
    let store = make_store();
    let names: Vec<_> = store
        .all::<Person>()
        .unwrap()
        .into_iter()
        .map(|p| p.last_name.unwrap())
        .collect();
    assert_eq!(names, vec!["Curie", "Noether"]);
}

#[test]
fn load_of_unknown_id_is_none() {
    let store = make_store();
    assert!(store.load::<Person>(DbId::new(99)).unwrap().is_none());
    assert!(matches!(
        store.require::<Person>(DbId::new(99)),
        Err(StorageError::NotFound { .. })
    ));
}

#[test]
fn load_under_another_kind_is_none() {
    let store = make_store();
    assert!(store.load::<Address>(DbId::new(1)).unwrap().is_none());
}

// ── Transactions ─────────────────────────────────────────────────

#[test]
fn rollback_undoes_inserts_updates_and_id_allocation() {
    let mut store = make_store();
    store.begin().unwrap();
    store.store(person("Lovelace")).unwrap();
    let mut p: Person = store.require(DbId::new(1)).unwrap();
    p.first_name = Some("changed".into());
    store.store(p).unwrap();
    store.rollback().unwrap();

    assert_eq!(store.count(EntityKind::Person).unwrap(), 2);
    assert_eq!(store.last_id(), DbId::new(2));
    let p: Person = store.require(DbId::new(1)).unwrap();
    assert_eq!(p.first_name, None);
}

#[test]
fn commit_keeps_writes() {
    let mut store = make_store();
    store.begin().unwrap();
    store.store(person("Lovelace")).unwrap();
    store.commit().unwrap();
    assert_eq!(store.count(EntityKind::Person).unwrap(), 3);
    assert!(!store.in_transaction());
}

#[test]
fn nested_begin_and_stray_commit_are_errors() {
    let mut store = MemoryStore::new();
    assert!(matches!(store.commit(), Err(StorageError::NoTransaction)));
    assert!(matches!(store.rollback(), Err(StorageError::NoTransaction)));
    store.begin().unwrap();
    assert!(matches!(store.begin(), Err(StorageError::TransactionActive)));
}

// ── ScratchStore ─────────────────────────────────────────────────

#[test]
fn scratch_reads_base_and_own_writes() {
    let base = make_store();
    let mut scratch = ScratchStore::new(&base);
    let id = scratch.store(person("Lovelace")).unwrap();
    assert_eq!(id, DbId::new(3));
    assert_eq!(scratch.count(EntityKind::Person).unwrap(), 3);
    assert!(scratch.load::<Person>(DbId::new(1)).unwrap().is_some());
    assert!(scratch.load::<Person>(id).unwrap().is_some());
    assert_eq!(scratch.pending(), 1);
}

#[test]
fn scratch_never_touches_base() {
    let base = make_store();
    {
        let mut scratch = ScratchStore::new(&base);
        let mut p: Person = scratch.require(DbId::new(2)).unwrap();
        p.first_name = Some("Emmy".into());
        scratch.store(p).unwrap();
        let shadowed: Person = scratch.require(DbId::new(2)).unwrap();
        assert_eq!(shadowed.first_name.as_deref(), Some("Emmy"));
        assert_eq!(scratch.count(EntityKind::Person).unwrap(), 2);
    }
    let original: Person = base.require(DbId::new(2)).unwrap();
    assert_eq!(original.first_name, None);
    assert_eq!(base.len(), 2);
}

#[test]
fn scratch_rollback() {
    let base = MemoryStore::new();
    let mut scratch = ScratchStore::new(&base);
    scratch.begin().unwrap();
    scratch.save(Record::Person(person("X"))).unwrap();
    scratch.rollback().unwrap();
    assert_eq!(scratch.pending(), 0);
    assert_eq!(scratch.last_id(), DbId::new(0));
}
