use std::fs;
use std::io::{Cursor, Write};

use chrono::NaiveDate;
use labtransfer_archive::{
    export_container, import_container, ArchiveError, Container, ContainerBuilder,
    DirectoryFileManager, FileManager,
};
use labtransfer_graph::{
    ExportOptions, ExportSettings, GraphExporter, GraphImporter, ImportOptions, NoProgress,
};
use labtransfer_model::{Authorship, Person, Project, Publication, PublicationType};
use labtransfer_storage::{EntityStore, EntityStoreExt, MemoryStore};
use labtransfer_types::EntityKind;
use pretty_assertions::assert_eq;
use serde_json::json;
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

fn entry_names(bytes: &[u8]) -> Vec<String> {
    let archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
    names.sort();
    names
}

fn raw_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, data) in entries {
        zip.start_file(*name, SimpleFileOptions::default()).unwrap();
        zip.write_all(data).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

/// A source directory holding the files named in `files`.
fn source_dir(files: &[&str]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    for name in files {
        let path = dir.path().join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, format!("content of {name}")).unwrap();
    }
    dir
}

fn publication_store(pdf: &str) -> MemoryStore {
    let mut store = MemoryStore::new();
    let ada = store
        .store(Person {
            first_name: Some("Ada".into()),
            last_name: Some("Lovelace".into()),
            ..Person::default()
        })
        .unwrap();
    let mut publication = Publication::new(PublicationType::PhdThesis);
    publication.title = Some("Notes".into());
    publication.publication_year = Some(2020);
    publication.path_to_downloadable_pdf = Some(pdf.into());
    publication.authors = vec![Authorship { person: ada, rank: 0 }];
    store.store(publication).unwrap();
    store
}

// ── Packing ──────────────────────────────────────────────────────

#[test]
fn document_and_attachments_are_packed() {
    let dir = source_dir(&["PDFs/PDF2.pdf"]);
    let files = DirectoryFileManager::new(dir.path());
    let document = json!({
        "publications": [{ "@id": "/publi#0", "pathToDownloadablePDF": "PDFs/PDF2.pdf" }]
    });
    let bytes = ContainerBuilder::new(document.clone())
        .collect_attachments(&files)
        .build()
        .unwrap();

    assert_eq!(entry_names(&bytes), vec!["PDFs/PDF2.pdf", "dbcontent.json"]);
    let container = Container::open(Cursor::new(bytes)).unwrap();
    assert_eq!(container.document(), Some(&document));
}

#[test]
fn unreadable_paths_are_removed() {
    let dir = source_dir(&["ProjectImages/a.png"]);
    let files = DirectoryFileManager::new(dir.path());
    let document = json!({
        "organizationAddresses": [{ "@id": "/adr#0", "pathToBackgroundImage": "AddressBgs/missing.jpg" }],
        "projects": [{ "@id": "/prj#0", "pathsToImages": ["ProjectImages/a.png", "ProjectImages/gone.png"] }]
    });
    let builder = ContainerBuilder::new(document).collect_attachments(&files);

    assert_eq!(
        builder.document(),
        &json!({
            "organizationAddresses": [{ "@id": "/adr#0" }],
            "projects": [{ "@id": "/prj#0", "pathsToImages": ["ProjectImages/a.png"] }]
        })
    );
    assert_eq!(builder.file_count(), 1);
}

#[test]
fn shared_attachment_is_written_once() {
    let dir = source_dir(&["shared/logo.png"]);
    let files = DirectoryFileManager::new(dir.path());
    let document = json!({
        "researchOrganizations": [
            { "@id": "/ro#0", "pathToLogo": "shared/logo.png" },
            { "@id": "/ro#1", "pathToLogo": "shared/logo.png" }
        ]
    });
    let bytes = ContainerBuilder::new(document)
        .collect_attachments(&files)
        .build()
        .unwrap();
    assert_eq!(entry_names(&bytes), vec!["dbcontent.json", "shared/logo.png"]);
}

// ── Opening ──────────────────────────────────────────────────────

#[test]
fn accepted_entries_are_staged() {
    let bytes = raw_zip(&[
        ("DBContent.JSON", b"{}"),
        ("PDFs/a.pdf", b"pdf"),
        ("Slides/deck.PPTX", b"pptx"),
        ("notes.txt", b"ignored"),
    ]);
    let container = Container::open(Cursor::new(bytes)).unwrap();

    assert_eq!(container.document(), Some(&json!({})));
    let staged: Vec<&str> = container.staged().collect();
    assert_eq!(staged, vec!["PDFs/a.pdf", "Slides/deck.PPTX"]);
    let file = container.staged_file("./PDFs/a.pdf").unwrap();
    assert_eq!(fs::read(file).unwrap(), b"pdf");
    assert!(container.staged_file("notes.txt").is_none());
}

#[test]
fn staging_is_removed_with_the_container() {
    let bytes = raw_zip(&[("a.pdf", b"pdf")]);
    let container = Container::open(Cursor::new(bytes)).unwrap();
    let root = container.staging_root().to_path_buf();
    assert!(root.join("a.pdf").exists());
    drop(container);
    assert!(!root.exists());
}

#[test]
fn escaping_entry_is_rejected() {
    let bytes = raw_zip(&[("../evil.pdf", b"x")]);
    let error = Container::open(Cursor::new(bytes)).err().unwrap();
    assert!(matches!(error, ArchiveError::UnsafeEntry(name) if name == "../evil.pdf"));
}

#[test]
fn absolute_entry_is_rejected() {
    let bytes = raw_zip(&[("/tmp/evil.pdf", b"x")]);
    assert!(matches!(
        Container::open(Cursor::new(bytes)),
        Err(ArchiveError::UnsafeEntry(_))
    ));
}

#[test]
fn second_document_is_rejected() {
    let bytes = raw_zip(&[("dbcontent.json", b"{}"), ("DBCONTENT.json", b"{}")]);
    assert!(matches!(
        Container::open(Cursor::new(bytes)),
        Err(ArchiveError::DuplicateDocument(_))
    ));
}

#[test]
fn invalid_document_is_a_json_error() {
    let bytes = raw_zip(&[("dbcontent.json", b"{ nope")]);
    assert!(matches!(Container::open(Cursor::new(bytes)), Err(ArchiveError::Json(_))));
}

// ── End to end ───────────────────────────────────────────────────

#[test]
fn export_then_import_relocates_attachments() {
    let source = source_dir(&["old/thesis.PDF"]);
    let store = publication_store("old/thesis.PDF");
    let settings = ExportSettings {
        generation_date: NaiveDate::from_ymd_opt(2024, 1, 2),
        pretty: false,
    };
    let exporter = GraphExporter::new(&store, ExportOptions::new(&settings));
    let bytes = export_container(&exporter, &DirectoryFileManager::new(source.path()))
        .unwrap()
        .unwrap();

    let target_dir = tempfile::tempdir().unwrap();
    let mut target_files = DirectoryFileManager::new(target_dir.path());
    let mut target = MemoryStore::new();
    let report = import_container(
        &GraphImporter::default(),
        &mut target,
        Cursor::new(bytes),
        &mut target_files,
        &mut NoProgress,
    )
    .unwrap();

    assert_eq!(report.stats.publications, 1);
    assert_eq!(report.stats.attachments, 1);
    let publication = target.all::<Publication>().unwrap().remove(0);
    let id = publication.id.unwrap();
    let expected = format!("PDFs/PDF{id}.pdf");
    assert_eq!(publication.path_to_downloadable_pdf.as_deref(), Some(expected.as_str()));
    assert_eq!(
        fs::read_to_string(target_dir.path().join(&expected)).unwrap(),
        "content of old/thesis.PDF"
    );
}

#[test]
fn missing_attachment_path_is_dropped_on_import() {
    let document = json!({
        "organizationAddresses": [
            { "@id": "/adr#0", "name": "Campus", "pathToBackgroundImage": "bg/campus.jpg" }
        ],
        "researchOrganizations": [{ "@id": "/ro#0", "acronym": "LAB" }],
        "projects": [{
            "@id": "/prj#0",
            "acronym": "GRAPH",
            "coordinator": { "@id": "/ro#0" },
            "localOrganization": { "@id": "/ro#0" },
            "superOrganization": { "@id": "/ro#0" },
            "learOrganization": { "@id": "/ro#0" },
            "pathsToImages": ["img/one.png", "img/two.png"]
        }]
    });
    let bytes = ContainerBuilder::new(document)
        .add_file("img/two.png", b"png".to_vec())
        .build()
        .unwrap();

    let target_dir = tempfile::tempdir().unwrap();
    let mut files = DirectoryFileManager::new(target_dir.path());
    let mut store = MemoryStore::new();
    let report = import_container(&GraphImporter::default(), &mut store, Cursor::new(bytes), &mut files, &mut NoProgress)
        .unwrap();

    assert_eq!(report.stats.attachments, 1);
    let project = store.all::<Project>().unwrap().remove(0);
    let id = project.id.unwrap();
    assert_eq!(project.paths_to_images, vec![format!("ProjectImages/ProjectImg{id}_1.png")]);
    assert!(target_dir.path().join(&project.paths_to_images[0]).exists());
    let address = store.all::<labtransfer_model::Address>().unwrap().remove(0);
    assert_eq!(address.path_to_background_image, None);
}

#[test]
fn dry_run_installs_nothing() {
    let bytes = ContainerBuilder::new(json!({
        "organizationAddresses": [{ "@id": "/adr#0", "pathToBackgroundImage": "bg.jpg" }]
    }))
    .add_file("bg.jpg", b"jpg".to_vec())
    .build()
    .unwrap();

    let target_dir = tempfile::tempdir().unwrap();
    let mut files = DirectoryFileManager::new(target_dir.path());
    let mut store = MemoryStore::new();
    let importer = GraphImporter::new(ImportOptions {
        dry_run: true,
        ..ImportOptions::default()
    });
    let report = import_container(&importer, &mut store, Cursor::new(bytes), &mut files, &mut NoProgress).unwrap();

    assert!(report.dry_run);
    assert_eq!(report.stats.addresses, 1);
    assert_eq!(report.stats.attachments, 1);
    assert_eq!(store.count(EntityKind::Address).unwrap(), 0);
    assert_eq!(fs::read_dir(target_dir.path()).unwrap().count(), 0);
}

#[test]
fn container_without_document_imports_nothing() {
    let bytes = raw_zip(&[("a.pdf", b"pdf")]);
    let mut files = DirectoryFileManager::new(tempfile::tempdir().unwrap().path());
    let mut store = MemoryStore::new();
    let report = import_container(&GraphImporter::default(), &mut store, Cursor::new(bytes), &mut files, &mut NoProgress)
        .unwrap();
    assert_eq!(report.stats.total(), 0);
    assert!(store.is_empty());
}

#[test]
fn empty_store_exports_no_container() {
    let store = MemoryStore::new();
    let settings = ExportSettings::default();
    let exporter = GraphExporter::new(&store, ExportOptions::new(&settings));
    let files = DirectoryFileManager::new(".");
    assert!(export_container(&exporter, &files).unwrap().is_none());
}

#[test]
fn directory_manager_reads_relative_paths_only() {
    let dir = source_dir(&["a/b.pdf"]);
    let files = DirectoryFileManager::new(dir.path());
    assert_eq!(files.read("a/b.pdf").unwrap(), b"content of a/b.pdf");
    assert!(files.read("../b.pdf").is_err());
}
