//! Storage layer seen by the transfer engine.
//!
//! The engine only needs a narrow collaborator: save, find-by-id,
//! find-all, and short per-record transactions.
//!
//! # Architecture
//!
//! - `EntityStore` is the collaborator trait; `EntityStoreExt` adds typed helpers
//! - `MemoryStore` keeps records per kind in stable id order, with an undo
//!   journal backing `rollback`
//! - `ScratchStore` overlays a read-only base store for dry runs: every
//!   write stays in the overlay and nothing reaches the base

mod entity_store;
mod error;
mod memory;
mod scratch;

pub use entity_store::{EntityStore, EntityStoreExt};
pub use error::{StorageError, StorageResult};
pub use memory::MemoryStore;
pub use scratch::ScratchStore;
