use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

use anyhow::{bail, Context, Result};
use labtransfer_archive::{export_container, import_container, Container, DirectoryFileManager};
use labtransfer_graph::document::section_counts;
use labtransfer_graph::{
    ExportOptions, FailurePolicy, GraphExporter, GraphImporter, ImportOptions, ImportReport, KeepPaths,
    LogProgress,
};
use labtransfer_storage::MemoryStore;
use labtransfer_types::EntityKind;
use serde_json::Value;
use tracing::{info, warn};

use crate::CliConfig;

/// Document format, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Zip,
}

impl Format {
    pub fn of(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("zip") => Ok(Self::Zip),
            _ => bail!("{} is neither a .json nor a .zip file", path.display()),
        }
    }
}

/// Outcome of `normalize`.
#[derive(Debug)]
pub struct NormalizeOutcome {
    pub report: ImportReport,
    /// False when nothing was imported, in which case no output is written.
    pub written: bool,
}

/// Dry-run import of `input` into an empty store.
pub fn check(config: &CliConfig, input: &Path, collect_all: bool) -> Result<ImportReport> {
    let mut options = import_options(config, collect_all);
    options.dry_run = true;
    let scratch = tempfile::tempdir().context("cannot create scratch directory")?;
    let mut files = DirectoryFileManager::new(scratch.path());
    let mut store = MemoryStore::new();
    import_file(&GraphImporter::new(options), &mut store, input, &mut files)
}

/// Imports `input` into an empty store and exports it again to `output`.
///
/// Attachments of a JSON input are read next to the input file. Those of a
/// container are installed at their canonical paths in a scratch directory,
/// so only a container output carries them over.
pub fn normalize(config: &CliConfig, input: &Path, output: &Path, collect_all: bool) -> Result<NormalizeOutcome> {
    let output_format = Format::of(output)?;
    let mut options = import_options(config, collect_all);
    options.dry_run = false;

    let scratch = tempfile::tempdir().context("cannot create scratch directory")?;
    let mut files = DirectoryFileManager::new(scratch.path());
    let mut store = MemoryStore::new();
    let report = import_file(&GraphImporter::new(options), &mut store, input, &mut files)?;

    let source = match Format::of(input)? {
        Format::Json => DirectoryFileManager::new(input.parent().unwrap_or_else(|| Path::new("."))),
        Format::Zip => files,
    };
    let exporter = GraphExporter::new(&store, ExportOptions::new(&config.export));
    let bytes = match output_format {
        Format::Json => exporter.export_json()?.map(String::into_bytes),
        Format::Zip => export_container(&exporter, &source)?,
    };
    let Some(bytes) = bytes else {
        warn!("Nothing imported from {}, {} not written", input.display(), output.display());
        return Ok(NormalizeOutcome { report, written: false });
    };
    fs::write(output, bytes).with_context(|| format!("cannot write {}", output.display()))?;
    info!("Wrote {}", output.display());
    Ok(NormalizeOutcome { report, written: true })
}

/// Element counts per section of `input`, without importing it.
pub fn stats(input: &Path) -> Result<Vec<(EntityKind, usize)>> {
    let document = match Format::of(input)? {
        Format::Json => read_json(input)?,
        Format::Zip => {
            let mut container = Container::open(open(input)?)
                .with_context(|| format!("cannot open container {}", input.display()))?;
            match container.take_document() {
                Some(document) => document,
                None => return Ok(Vec::new()),
            }
        }
    };
    let Some(root) = document.as_object() else {
        bail!("{} does not hold a JSON object", input.display());
    };
    Ok(section_counts(root))
}

fn import_options(config: &CliConfig, collect_all: bool) -> ImportOptions {
    let mut options = config.import.clone();
    if collect_all {
        options.failure_policy = FailurePolicy::CollectAll;
    }
    options
}

fn import_file(
    importer: &GraphImporter,
    store: &mut MemoryStore,
    input: &Path,
    files: &mut DirectoryFileManager,
) -> Result<ImportReport> {
    let mut progress = LogProgress::new();
    let report = match Format::of(input)? {
        Format::Json => {
            let document = read_json(input)?;
            importer.import_with(store, &document, &mut KeepPaths, &mut progress)?
        }
        Format::Zip => import_container(importer, store, open(input)?, files, &mut progress)?,
    };
    Ok(report)
}

fn open(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    Ok(BufReader::new(file))
}

fn read_json(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("{} is not valid JSON", path.display()))
}
