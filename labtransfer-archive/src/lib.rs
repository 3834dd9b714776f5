//! Zip container for transfer documents.
//!
//! A container holds the document under `dbcontent.json` and every
//! attachment file the document points to, at the same relative path.
//!
//! - `ContainerBuilder` packs a document, reading attachments through a
//!   `FileManager`
//! - `Container` opens an archive and stages attachments in a temporary
//!   directory
//! - `StagedFiles` is the importer's `FileCallback`: it moves a staged file
//!   to the canonical path of the record that was just created

mod error;
mod file_manager;
mod pack;
mod unpack;

pub use error::{ArchiveError, ArchiveResult};
pub use file_manager::{extension_of, layout, relative_name, DirectoryFileManager, FileManager};
pub use pack::ContainerBuilder;
pub use unpack::{Container, StagedFiles};

use std::io::{Read, Seek};

use labtransfer_graph::{GraphExporter, GraphImporter, ImportReport, ProgressSink};
use labtransfer_storage::EntityStore;
use tracing::info;

/// Name of the document entry, compared case-insensitively on read.
pub const DOCUMENT_ENTRY: &str = "dbcontent.json";

/// Attachment extensions read from a container.
pub const ACCEPTED_EXTENSIONS: [&str; 7] = ["pdf", "jpg", "jpeg", "gif", "png", "ppt", "pptx"];

/// Exports the store into a container. Returns `None` when the store is
/// empty.
pub fn export_container<S: EntityStore + ?Sized>(
    exporter: &GraphExporter<'_, S>,
    files: &dyn FileManager,
) -> ArchiveResult<Option<Vec<u8>>> {
    let Some(document) = exporter.export()? else {
        return Ok(None);
    };
    let builder = ContainerBuilder::new(document).collect_attachments(files);
    info!("Packing document with {} attachments", builder.file_count());
    builder.build().map(Some)
}

/// Imports a container into `store`, installing attachments through
/// `files`. A dry run computes canonical paths without installing files.
/// A container without document imports nothing.
pub fn import_container<S: EntityStore + ?Sized, R: Read + Seek>(
    importer: &GraphImporter,
    store: &mut S,
    reader: R,
    files: &mut dyn FileManager,
    progress: &mut dyn ProgressSink,
) -> ArchiveResult<ImportReport> {
    let mut container = Container::open(reader)?;
    let Some(document) = container.take_document() else {
        return Ok(ImportReport {
            dry_run: importer.options().dry_run,
            ..ImportReport::default()
        });
    };
    let mut callback = if importer.options().dry_run {
        container.preview(files)
    } else {
        container.installer(files)
    };
    let report = importer.import_with(store, &document, &mut callback, progress)?;
    Ok(report)
}
