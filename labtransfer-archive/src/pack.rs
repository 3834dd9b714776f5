//! Container writing.

use std::collections::BTreeMap;
use std::io::Write;

use labtransfer_types::AttachmentSlot;
use serde_json::Value;
use tracing::{debug, info, warn};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::file_manager::{relative_name, FileManager};
use crate::{ArchiveResult, DOCUMENT_ENTRY};

/// Fluent builder for a container: the document plus the files it points to.
pub struct ContainerBuilder {
    document: Value,
    files: BTreeMap<String, Vec<u8>>,
}

impl ContainerBuilder {
    pub fn new(document: Value) -> Self {
        Self {
            document,
            files: BTreeMap::new(),
        }
    }

    /// Adds a file under `name`. A name added twice is written once.
    pub fn add_file(mut self, name: &str, data: Vec<u8>) -> Self {
        self.files.insert(name.to_string(), data);
        self
    }

    /// Reads every attachment the document points to through `files`.
    /// Paths that cannot be read are removed from the document.
    pub fn collect_attachments(mut self, files: &dyn FileManager) -> Self {
        let mut dropped = 0;
        for slot in AttachmentSlot::ALL {
            let Some(Value::Array(nodes)) = self.document.get_mut(slot.kind().section()) else {
                continue;
            };
            for node in nodes.iter_mut().filter_map(Value::as_object_mut) {
                let field = slot.field();
                if slot.is_indexed() {
                    let Some(Value::Array(paths)) = node.get_mut(field) else {
                        continue;
                    };
                    paths.retain(|path| {
                        let kept = path
                            .as_str()
                            .is_some_and(|p| read_into(&mut self.files, files, slot, p));
                        dropped += usize::from(!kept);
                        kept
                    });
                    if paths.is_empty() {
                        node.remove(field);
                    }
                } else if let Some(path) = node.get(field).and_then(Value::as_str).map(str::to_string) {
                    if !read_into(&mut self.files, files, slot, &path) {
                        node.remove(field);
                        dropped += 1;
                    }
                }
            }
        }
        info!(
            "Collected {} attachment files, {} unreadable paths removed",
            self.files.len(),
            dropped
        );
        self
    }

    #[must_use]
    pub fn document(&self) -> &Value {
        &self.document
    }

    /// Number of files that will be written next to the document.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Builds the zip archive and returns the raw bytes.
    pub fn build(self) -> ArchiveResult<Vec<u8>> {
        let buf = std::io::Cursor::new(Vec::new());
        let mut zip = ZipWriter::new(buf);
        let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        zip.start_file(DOCUMENT_ENTRY, options)?;
        serde_json::to_writer(&mut zip, &self.document)?;

        for (name, data) in &self.files {
            zip.start_file(name.as_str(), options)?;
            zip.write_all(data)?;
        }

        let finished = zip.finish()?;
        Ok(finished.into_inner())
    }
}

/// Reads one attachment unless it was read already. Returns whether the
/// path can stay in the document.
fn read_into(
    collected: &mut BTreeMap<String, Vec<u8>>,
    files: &dyn FileManager,
    slot: AttachmentSlot,
    path: &str,
) -> bool {
    if path.trim().is_empty() {
        return false;
    }
    let Some(name) = relative_name(path) else {
        warn!("Attachment path '{}' of {} is not relative, removed", path, slot.kind());
        return false;
    };
    if collected.contains_key(&name) {
        return true;
    }
    match files.read(path) {
        Ok(data) => {
            debug!("Packing {} ({} bytes)", name, data.len());
            collected.insert(name, data);
            true
        }
        Err(err) => {
            warn!("Cannot read attachment '{}' of {}: {}, removed", path, slot.kind(), err);
            false
        }
    }
}
