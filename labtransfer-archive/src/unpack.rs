//! Container reading and attachment staging.

use std::collections::BTreeSet;
use std::fs;
use std::io::{self, Read, Seek};
use std::path::{Path, PathBuf};

use labtransfer_graph::FileCallback;
use labtransfer_types::{AttachmentSlot, DbId};
use serde_json::Value;
use tempfile::TempDir;
use tracing::{debug, info, warn};
use zip::ZipArchive;

use crate::file_manager::{extension_of, relative_name, FileManager};
use crate::{ArchiveError, ArchiveResult, ACCEPTED_EXTENSIONS, DOCUMENT_ENTRY};

/// An opened container. Attachments are staged in a temporary directory
/// that is removed when the container is dropped.
pub struct Container {
    document: Option<Value>,
    staging: TempDir,
    staged: BTreeSet<String>,
}

impl Container {
    /// Reads a container, parsing the document and staging every accepted
    /// attachment. Other entries are ignored.
    pub fn open<R: Read + Seek>(reader: R) -> ArchiveResult<Self> {
        let mut archive = ZipArchive::new(reader)?;
        let staging = tempfile::tempdir()?;
        let mut document = None;
        let mut staged = BTreeSet::new();

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            if file.is_dir() {
                continue;
            }
            let raw = file.name().to_string();
            if raw.eq_ignore_ascii_case(DOCUMENT_ENTRY) {
                if document.is_some() {
                    return Err(ArchiveError::DuplicateDocument(raw));
                }
                let mut text = String::new();
                file.read_to_string(&mut text)?;
                document = Some(serde_json::from_str(&text)?);
                debug!("Read document entry {}", raw);
                continue;
            }
            if !is_accepted(&raw) {
                debug!("Ignored container entry {}", raw);
                continue;
            }
            let name = relative_name(&raw).ok_or_else(|| ArchiveError::UnsafeEntry(raw.clone()))?;
            let target = staging.path().join(&name);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut out = fs::File::create(&target)?;
            io::copy(&mut file, &mut out)?;
            staged.insert(name);
        }

        match &document {
            Some(_) => info!("Opened container with {} staged attachments", staged.len()),
            None => info!("Container has no document entry"),
        }
        Ok(Self {
            document,
            staging,
            staged,
        })
    }

    #[must_use]
    pub fn document(&self) -> Option<&Value> {
        self.document.as_ref()
    }

    /// Takes the document out, leaving the staged files in place.
    pub fn take_document(&mut self) -> Option<Value> {
        self.document.take()
    }

    /// Relative names of the staged attachments.
    pub fn staged(&self) -> impl Iterator<Item = &str> {
        self.staged.iter().map(String::as_str)
    }

    #[must_use]
    pub fn staging_root(&self) -> &Path {
        self.staging.path()
    }

    /// Staged file for a document path, if one was staged under that name.
    #[must_use]
    pub fn staged_file(&self, path: &str) -> Option<PathBuf> {
        let name = relative_name(path)?;
        self.staged
            .contains(&name)
            .then(|| self.staging.path().join(name))
    }

    /// File callback moving staged attachments into `files`.
    pub fn installer<'a>(&'a self, files: &'a mut dyn FileManager) -> StagedFiles<'a> {
        StagedFiles {
            container: self,
            files,
            install: true,
            moved: 0,
        }
    }

    /// File callback computing canonical paths without installing anything.
    pub fn preview<'a>(&'a self, files: &'a mut dyn FileManager) -> StagedFiles<'a> {
        StagedFiles {
            container: self,
            files,
            install: false,
            moved: 0,
        }
    }
}

fn is_accepted(name: &str) -> bool {
    let extension = extension_of(name);
    ACCEPTED_EXTENSIONS.contains(&extension.as_str())
}

/// Relocates staged attachments to their canonical paths.
pub struct StagedFiles<'a> {
    container: &'a Container,
    files: &'a mut dyn FileManager,
    install: bool,
    moved: usize,
}

impl FileCallback for StagedFiles<'_> {
    fn relocate(&mut self, slot: AttachmentSlot, id: DbId, index: usize, path: &str) -> Option<String> {
        let source = self.container.staged_file(path)?;
        let target = self.files.canonical_path(slot, id, index, &extension_of(path));
        if self.install {
            if let Err(err) = self.files.install(&target, &source) {
                warn!("Cannot install attachment '{}' as '{}': {}", path, target, err);
                return None;
            }
        }
        self.moved += 1;
        Some(target)
    }

    fn relocated(&self) -> usize {
        self.moved
    }
}
