//! Where attachment files live outside the container.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use labtransfer_types::{AttachmentSlot, DbId};
use tracing::debug;

/// Reads attachments for export and installs them at their canonical
/// place on import.
pub trait FileManager {
    /// Content of the attachment a document path points to.
    fn read(&self, path: &str) -> io::Result<Vec<u8>>;

    /// Canonical document path of the attachment of record `id` in `slot`.
    /// `index` is only meaningful for indexed slots. `extension` is
    /// lower-case, without the dot, possibly empty.
    fn canonical_path(&self, slot: AttachmentSlot, id: DbId, index: usize, extension: &str) -> String;

    /// Copies `source` to the canonical document path `target`.
    fn install(&mut self, target: &str, source: &Path) -> io::Result<()>;
}

/// Folder and file prefix of each slot.
#[must_use]
pub const fn layout(slot: AttachmentSlot) -> (&'static str, &'static str) {
    match slot {
        AttachmentSlot::PublicationPdf => ("PDFs", "PDF"),
        AttachmentSlot::PublicationAward => ("Awards", "Award"),
        AttachmentSlot::AddressBackground => ("AddressBgs", "AddressBg"),
        AttachmentSlot::OrganizationLogo => ("OrganizationLogos", "OrgLogo"),
        AttachmentSlot::ProjectLogo => ("ProjectLogos", "ProjectLogo"),
        AttachmentSlot::ProjectImage => ("ProjectImages", "ProjectImg"),
        AttachmentSlot::ProjectScientificRequirements => ("ProjectRequirements", "ProjectRequirement"),
        AttachmentSlot::ProjectPressDocument => ("ProjectPressDocs", "ProjectPress"),
        AttachmentSlot::ProjectPowerpoint => ("ProjectPowerpoints", "ProjectPowerpoint"),
        AttachmentSlot::TeachingSlides => ("TeachingSlides", "Slides"),
    }
}

/// Normalizes a document path or entry name to a relative `/`-separated
/// name. Returns `None` for absolute names, names escaping the root and
/// empty names.
#[must_use]
pub fn relative_name(raw: &str) -> Option<String> {
    let raw = raw.trim().replace('\\', "/");
    if raw.starts_with('/') || raw.get(1..2) == Some(":") {
        return None;
    }
    let mut parts = Vec::new();
    for part in raw.split('/') {
        match part {
            "" | "." => {}
            ".." => return None,
            part => parts.push(part),
        }
    }
    if parts.is_empty() {
        return None;
    }
    Some(parts.join("/"))
}

/// Lower-case extension of a path, without the dot.
#[must_use]
pub fn extension_of(path: &str) -> String {
    Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default()
}

/// File manager rooted at a directory. Document paths are relative to the
/// root.
#[derive(Debug, Clone)]
pub struct DirectoryFileManager {
    root: PathBuf,
}

impl DirectoryFileManager {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File system location of a document path.
    pub fn resolve(&self, path: &str) -> io::Result<PathBuf> {
        let name = relative_name(path).ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, format!("'{path}' is not a relative path"))
        })?;
        Ok(self.root.join(name))
    }
}

impl FileManager for DirectoryFileManager {
    fn read(&self, path: &str) -> io::Result<Vec<u8>> {
        fs::read(self.resolve(path)?)
    }

    fn canonical_path(&self, slot: AttachmentSlot, id: DbId, index: usize, extension: &str) -> String {
        let (folder, prefix) = layout(slot);
        let mut name = format!("{folder}/{prefix}{id}");
        if slot.is_indexed() {
            name.push_str(&format!("_{index}"));
        }
        if !extension.is_empty() {
            name.push('.');
            name.push_str(extension);
        }
        name
    }

    fn install(&mut self, target: &str, source: &Path) -> io::Result<()> {
        let destination = self.resolve(target)?;
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(source, &destination)?;
        debug!("Installed {}", destination.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_paths() {
        let files = DirectoryFileManager::new("/srv/lab");
        let id = DbId::new(12);
        assert_eq!(files.canonical_path(AttachmentSlot::PublicationPdf, id, 0, "pdf"), "PDFs/PDF12.pdf");
        assert_eq!(
            files.canonical_path(AttachmentSlot::ProjectImage, id, 3, "png"),
            "ProjectImages/ProjectImg12_3.png"
        );
        assert_eq!(
            files.canonical_path(AttachmentSlot::TeachingSlides, id, 3, ""),
            "TeachingSlides/Slides12"
        );
    }

    #[test]
    fn relative_names() {
        assert_eq!(relative_name("a/./b.pdf").as_deref(), Some("a/b.pdf"));
        assert_eq!(relative_name("a\\b.pdf").as_deref(), Some("a/b.pdf"));
        assert_eq!(relative_name("/etc/passwd"), None);
        assert_eq!(relative_name("C:/x.pdf"), None);
        assert_eq!(relative_name("a/../../b.pdf"), None);
        assert_eq!(relative_name("  "), None);
    }

    #[test]
    fn extensions() {
        assert_eq!(extension_of("Dir/File.PDF"), "pdf");
        assert_eq!(extension_of("noext"), "");
    }

    #[test]
    fn resolve_rejects_escaping_paths() {
        let files = DirectoryFileManager::new("/srv/lab");
        assert!(files.resolve("../x.pdf").is_err());
        assert_eq!(files.resolve("PDFs/a.pdf").unwrap(), Path::new("/srv/lab/PDFs/a.pdf"));
    }
}
