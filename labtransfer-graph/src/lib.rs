//! Entity-graph transfer between a lab data store and a portable JSON
//! document.
//!
//! # Architecture
//!
//! - `GraphExporter` walks the store in dependency order and writes one
//!   section per kind. Json-ids come from the `ReferenceRegistry`;
//!   same-section edges are deferred until the whole section is emitted
//! - `GraphImporter` reads the sections back in the same order, one storage
//!   transaction per record, resolving references through the `IdMap`
//! - Memberships are reconciled per person before being persisted: an
//!   employer membership implied by a service membership is absorbed
//! - Authors given by name are matched with `NameMatcher` or created as
//!   stub persons
//! - Attachments are moved through a `FileCallback`; progress goes to a
//!   `ProgressSink`

mod config;
pub mod document;
mod error;
mod export;
mod files;
mod id_map;
mod import;
pub mod names;
mod progress;
mod providers;
pub mod reconcile;
mod registry;
mod stats;

pub use config::{ExportSettings, FailurePolicy, ImportOptions};
pub use error::{ExportError, FaultCategory, ImportError, RecordError, RecordFault};
pub use export::{ExportOptions, GraphExporter};
pub use files::{FileCallback, KeepPaths};
pub use id_map::IdMap;
pub use import::GraphImporter;
pub use names::{NameMatcher, PersonName};
pub use progress::{LogProgress, NoProgress, ProgressSink};
pub use providers::{
    ExternalAuthor, ExternalPublication, ExtraPublicationProvider, SimilarPublicationProvider,
};
pub use registry::{ReferenceRegistry, RegistryKey};
pub use stats::{ImportReport, ImportStats};
