//! Persistence Integration Tests
//!
//! Tests the store against real storage:
//! - Resuming the active project across store instances
//! - Multi-project switching on disk
//! - Legacy record migration
//! - Debounced writes and save-status feedback

use std::sync::Arc;
use std::time::Duration;

use sketch_core::persist::{ACTIVE_KEY, LEGACY_KEY};
use sketch_core::{
    ElementType, FsStorage, MemoryStorage, Project, ProjectRepository, ProjectStore, SaveStatus,
    Storage, StoreConfig,
};

fn fs_store(dir: &std::path::Path) -> ProjectStore {
    let storage = FsStorage::open(dir).expect("open storage");
    ProjectStore::open(Arc::new(storage), StoreConfig::default())
}

#[test]
fn test_resume_active_project_from_disk() {
    let dir = tempfile::tempdir().expect("tempdir");

    let id = {
        let mut store = fs_store(dir.path());
        store.set_project_name("Checkout");
        store.add_element(ElementType::Cta, 24.0, 24.0, false);
        store.dispose();
        store.project().id.clone()
    };

    let store = fs_store(dir.path());
    assert_eq!(store.project().id, id);
    assert_eq!(store.project().name, "Checkout");
    assert_eq!(store.project().element_count(), 1);
    // History does not survive a restart
    assert!(!store.snapshot().can_undo);
}

#[test]
fn test_switching_persists_outgoing_project() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = fs_store(dir.path());
    let first = store.project().id.clone();
    store.set_project_name("First");

    let second = store.create_new_project();
    store.set_project_name("Second");

    let list = store.get_project_list();
    assert_eq!(list.len(), 2);
    assert!(list.iter().any(|e| e.id == first && e.name == "First"));
    assert!(list.iter().any(|e| e.id == second && e.name == "Second"));
    assert!(list[0].updated_at >= list[1].updated_at);

    store.switch_project(&first).expect("switch");
    drop(store);

    let store = fs_store(dir.path());
    assert_eq!(store.project().id, first);
}

#[test]
fn test_corrupt_active_record_falls_back_to_index() {
    let dir = tempfile::tempdir().expect("tempdir");
    let storage = FsStorage::open(dir.path()).expect("open");
    let repo = ProjectRepository::new(Arc::new(storage.clone()));

    let mut older = Project::new();
    older.name = "Survivor".to_string();
    repo.save(&older).expect("save");
    storage.set(ACTIVE_KEY, "does-not-exist").expect("seed");

    let store = ProjectStore::open(Arc::new(storage), StoreConfig::default());
    assert_eq!(store.project().name, "Survivor");
}

#[test]
fn test_legacy_record_is_migrated() {
    let storage = MemoryStorage::new();
    storage
        .set(
            LEGACY_KEY,
            r#"{"id":"legacy-1","name":"Old App","device":"tablet","screens":[{"id":"s1","name":"Home","elements":[{"id":"e1","type":"heading","x":10,"y":10}]}]}"#,
        )
        .expect("seed");

    let store = ProjectStore::open(Arc::new(storage.clone()), StoreConfig::default());
    assert_eq!(store.project().id.as_str(), "legacy-1");
    assert_eq!(store.project().name, "Old App");
    assert_eq!(store.project().screens[0].elements[0].label, "Heading");
    assert!(storage.get(LEGACY_KEY).expect("get").is_none());
    assert!(storage
        .get("sketchflow-project-legacy-1")
        .expect("get")
        .is_some());
}

#[test]
fn test_empty_storage_starts_fresh() {
    let store = ProjectStore::in_memory();
    assert_eq!(store.project().screens.len(), 1);
    assert_eq!(store.project().name, "Untitled Project");
}

#[tokio::test(start_paused = true)]
async fn test_rapid_edits_coalesce_into_one_write() {
    let storage = MemoryStorage::new();
    let repo = ProjectRepository::new(Arc::new(storage.clone()));
    let mut store = ProjectStore::open(Arc::new(storage), StoreConfig::default());
    let id = store.project().id.clone();

    for i in 0..5 {
        store.add_element(ElementType::Body, 0.0, f64::from(i) * 64.0, false);
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    assert_eq!(repo.load(&id).expect("stored").element_count(), 0);

    tokio::time::sleep(Duration::from_millis(800)).await;
    assert_eq!(repo.load(&id).expect("stored").element_count(), 5);
}

#[tokio::test(start_paused = true)]
async fn test_save_status_cycles_back_to_idle() {
    let mut store = ProjectStore::in_memory();
    let mut status = store.subscribe_save_status();

    store.set_project_name("Status");
    status.changed().await.expect("saving");
    assert_eq!(*status.borrow_and_update(), SaveStatus::Saving);
    assert_eq!(store.save_status(), SaveStatus::Saving);

    status.changed().await.expect("saved");
    assert_eq!(*status.borrow_and_update(), SaveStatus::Saved);

    status.changed().await.expect("idle");
    assert_eq!(*status.borrow_and_update(), SaveStatus::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_dispose_flushes_pending_write() {
    let storage = MemoryStorage::new();
    let repo = ProjectRepository::new(Arc::new(storage.clone()));
    let mut store = ProjectStore::open(Arc::new(storage), StoreConfig::default());

    store.set_project_name("Flushed");
    store.dispose();
    let stored = repo.load(&store.project().id).expect("stored");
    assert_eq!(stored.name, "Flushed");
}
