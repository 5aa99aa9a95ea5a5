use chrono::{TimeZone, Utc};
use folioapp::api::FolioApi;
use folioapp::clock::ManualClock;
use folioapp::model::{Author, DocumentPatch};
use folioapp::store::backend::StorageBackend;
use folioapp::store::fs_backend::FsBackend;
use folioapp::store::local::LocalStore;
use folioapp::store::StoreKey;
use std::fs;
use tempfile::TempDir;

fn setup() -> (TempDir, FsBackend) {
    let dir = TempDir::new().unwrap();
    let backend = FsBackend::new(dir.path().to_path_buf());
    (dir, backend)
}

#[test]
fn test_fs_backend_basic_io() {
    let (_dir, backend) = setup();

    // 1. Missing key
    assert_eq!(backend.read(StoreKey::Documents).unwrap(), None);

    // 2. Write + read
    backend.write(StoreKey::Documents, "[]").unwrap();
    assert_eq!(
        backend.read(StoreKey::Documents).unwrap(),
        Some("[]".to_string())
    );

    // 3. Remove, twice
    backend.remove(StoreKey::Documents).unwrap();
    backend.remove(StoreKey::Documents).unwrap();
    assert_eq!(backend.read(StoreKey::Documents).unwrap(), None);
}

#[test]
fn test_fs_backend_atomic_write_artifacts() {
    let (dir, backend) = setup();
    backend.write(StoreKey::Collections, "[1]").unwrap();
    backend.write(StoreKey::Collections, "[2]").unwrap();

    let expected_path = dir.path().join("collections.json");
    assert_eq!(backend.location(StoreKey::Collections), expected_path);
    assert_eq!(fs::read_to_string(&expected_path).unwrap(), "[2]");

    for entry in fs::read_dir(dir.path()).unwrap() {
        let path = entry.unwrap().path();
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(!name.ends_with(".tmp"), "Found leftover tmp file: {}", name);
    }
}

#[test]
fn test_fs_backend_creates_missing_root() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("a").join("b");
    let backend = FsBackend::new(nested.clone());
    backend.write(StoreKey::Preferences, "{}").unwrap();
    assert!(nested.join("preferences.json").exists());
}

#[test]
fn test_corrupt_file_reads_as_empty_overlay() {
    let (dir, backend) = setup();
    fs::write(dir.path().join("documents.json"), "{{ not json").unwrap();

    let store = LocalStore::with_backend(backend);
    let docs: Vec<folioapp::model::Document> = store.load(StoreKey::Documents);
    assert!(docs.is_empty());
    assert!(store
        .try_load::<folioapp::model::Document>(StoreKey::Documents)
        .is_err());
}

#[test]
fn test_overlay_survives_reopen() {
    let (dir, backend) = setup();
    let now = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
    let author = Author::new("Dana Kim", "DK");

    let mut api = FolioApi::new(backend, ManualClock::new(now), author.clone());
    let doc = api.create_local_document(DocumentPatch::titled("Persisted"));
    drop(api);

    let reopened = FolioApi::new(
        FsBackend::new(dir.path().to_path_buf()),
        ManualClock::new(now),
        author,
    );
    assert_eq!(reopened.get_local_document(doc.id), Some(doc));
    assert_eq!(reopened.list_local_activities().len(), 1);

    let raw = fs::read_to_string(dir.path().join("documents.json")).unwrap();
    assert!(raw.contains("\"authorInitials\": \"DK\""));
    assert!(raw.contains("\"status\": \"Draft\""));
}
