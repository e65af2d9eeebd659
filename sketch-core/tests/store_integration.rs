//! Store Integration Tests
//!
//! Exercises the command engine through its public API:
//! - Placement, removal, and import scenarios
//! - Undo/redo laws over random command sequences
//! - Screen-count invariants
//! - Snapping properties

use proptest::prelude::*;
use sketch_core::{
    snap, DeviceType, ElementId, ElementPatch, ElementType, HistoryEntry, MemoryStorage,
    ProjectStore, ScreenId, ScreenState, StoreConfig, Tool, GRID_SIZE, MIN_ELEMENT_SIZE,
};
use std::sync::Arc;

fn content(store: &ProjectStore) -> HistoryEntry {
    HistoryEntry::capture(store.project())
}

#[test]
fn test_default_project_place_button() {
    let mut store = ProjectStore::in_memory();
    let project = store.project();
    assert_eq!(project.name, "Untitled Project");
    assert_eq!(project.device, DeviceType::Mobile);
    assert_eq!(project.screens.len(), 1);

    let id = store
        .add_element(ElementType::Cta, 100.0, 100.0, false)
        .expect("element added");

    let screen = store.active_screen().expect("active screen");
    assert_eq!(screen.elements.len(), 1);
    let el = &screen.elements[0];
    assert_eq!(el.kind, ElementType::Cta);
    assert_eq!(el.label, "Button");
    assert!((el.width - 200.0).abs() < f64::EPSILON);
    assert!((el.height - 48.0).abs() < f64::EPSILON);
    assert!((el.x - 104.0).abs() < f64::EPSILON);
    assert!((el.y - 104.0).abs() < f64::EPSILON);

    let snapshot = store.snapshot();
    assert_eq!(snapshot.selected_element_ids.len(), 1);
    assert_eq!(snapshot.selected_element_id(), Some(&id));
    assert_eq!(snapshot.active_tool, Tool::Select);
}

#[test]
fn test_remove_only_screen_keeps_it() {
    let mut store = ProjectStore::in_memory();
    let only = store.project().screens[0].id.clone();
    store.remove_screen(&only);
    assert_eq!(store.project().screens.len(), 1);
    assert_eq!(store.project().screens[0].id, only);
}

#[test]
fn test_undo_on_empty_history_is_noop() {
    let mut store = ProjectStore::in_memory();
    let before = store.snapshot();
    store.undo();
    let after = store.snapshot();
    assert!(!after.can_undo);
    assert!(Arc::ptr_eq(&before, &after));
}

#[test]
fn test_import_without_screens_is_rejected() {
    let mut store = ProjectStore::in_memory();
    store.set_project_name("Keep Me");
    store.add_element(ElementType::Heading, 0.0, 0.0, false);
    let before = store.project().clone();

    let result = store.import_project_json(r#"{"screens":[]}"#);
    assert!(result.is_err());
    assert_eq!(store.project(), &before);
}

#[test]
fn test_import_defaults_missing_fields() {
    let mut store = ProjectStore::in_memory();
    let id = store
        .import_project_json(r#"{"name":"Partial","device":"watch","screens":[{"name":"Only"}]}"#)
        .expect("imported");

    let project = store.project();
    assert_eq!(project.id, id);
    assert_eq!(project.name, "Partial");
    assert_eq!(project.device, DeviceType::Mobile);
    assert_eq!(project.screens[0].name, "Only");
    assert_eq!(project.screens[0].active_state, ScreenState::Default);
    assert!(!store.snapshot().can_undo);
}

#[test]
fn test_redo_cleared_by_new_command() {
    let mut store = ProjectStore::in_memory();
    store.add_element(ElementType::Cta, 0.0, 0.0, false);
    store.add_element(ElementType::Body, 0.0, 64.0, false);
    store.undo();
    assert!(store.snapshot().can_redo);

    store.add_element(ElementType::Image, 0.0, 200.0, false);
    assert!(!store.snapshot().can_redo);

    let before = content(&store);
    store.redo();
    assert_eq!(content(&store), before);
}

#[test]
fn test_undo_limit_evicts_oldest() {
    let storage = Arc::new(MemoryStorage::new());
    let mut store = ProjectStore::open(storage, StoreConfig::default().with_undo_limit(3));
    for i in 0..5 {
        store.add_element(ElementType::Body, 0.0, f64::from(i) * 80.0, false);
    }
    let mut undone = 0;
    while store.snapshot().can_undo {
        store.undo();
        undone += 1;
    }
    assert_eq!(undone, 3);
    assert_eq!(store.active_screen().expect("screen").elements.len(), 2);
}

#[test]
fn test_undo_resets_missing_active_screen() {
    let mut store = ProjectStore::in_memory();
    let first = store.project().screens[0].id.clone();
    let added = store.add_screen();
    assert_eq!(store.snapshot().active_screen_id, added);

    store.undo();
    assert_eq!(store.snapshot().active_screen_id, first);
}

#[test]
fn test_undo_clears_selection() {
    let mut store = ProjectStore::in_memory();
    let id = store
        .add_element(ElementType::Card, 0.0, 0.0, false)
        .expect("added");
    store.update_element(&id, ElementPatch::label("Promo"));
    assert!(!store.snapshot().selected_element_ids.is_empty());
    store.undo();
    assert!(store.snapshot().selected_element_ids.is_empty());
    assert_eq!(store.active_screen().expect("screen").elements[0].label, "Card");
}

#[derive(Debug, Clone)]
enum Command {
    AddElement(usize, f64, f64),
    AddScreen,
    RemoveScreen(usize),
    DeleteElement(usize),
    Duplicate(usize),
    BringToFront(usize),
    SendToBack(usize),
    AddArrow(usize, usize),
    Relabel(usize, String),
}

fn arb_command() -> impl Strategy<Value = Command> {
    prop_oneof![
        (0usize..11, -50.0f64..500.0, -50.0f64..900.0)
            .prop_map(|(k, x, y)| Command::AddElement(k, x, y)),
        Just(Command::AddScreen),
        (0usize..8).prop_map(Command::RemoveScreen),
        (0usize..8).prop_map(Command::DeleteElement),
        (0usize..8).prop_map(Command::Duplicate),
        (0usize..8).prop_map(Command::BringToFront),
        (0usize..8).prop_map(Command::SendToBack),
        (0usize..8, 0usize..8).prop_map(|(a, b)| Command::AddArrow(a, b)),
        (0usize..8, "[a-z]{1,8}").prop_map(|(i, s)| Command::Relabel(i, s)),
    ]
}

fn element_at(store: &ProjectStore, index: usize) -> Option<ElementId> {
    let elements = &store.active_screen()?.elements;
    if elements.is_empty() {
        return None;
    }
    Some(elements[index % elements.len()].id.clone())
}

fn screen_at(store: &ProjectStore, index: usize) -> ScreenId {
    let screens = &store.project().screens;
    screens[index % screens.len()].id.clone()
}

fn apply(store: &mut ProjectStore, command: &Command) {
    match command {
        Command::AddElement(kind, x, y) => {
            store.add_element(ElementType::ALL[*kind], *x, *y, false);
        }
        Command::AddScreen => {
            store.add_screen();
        }
        Command::RemoveScreen(i) => {
            let id = screen_at(store, *i);
            store.remove_screen(&id);
        }
        Command::DeleteElement(i) => {
            if let Some(id) = element_at(store, *i) {
                store.delete_element(&id);
            }
        }
        Command::Duplicate(i) => {
            if let Some(id) = element_at(store, *i) {
                store.select_element(Some(&id));
                store.duplicate_selected();
            }
        }
        Command::BringToFront(i) => {
            if let Some(id) = element_at(store, *i) {
                store.bring_to_front(&id);
            }
        }
        Command::SendToBack(i) => {
            if let Some(id) = element_at(store, *i) {
                store.send_to_back(&id);
            }
        }
        Command::AddArrow(a, b) => {
            let from = screen_at(store, *a);
            let to = screen_at(store, *b);
            store.add_arrow(&from, &to, "tap");
        }
        Command::Relabel(i, label) => {
            if let Some(id) = element_at(store, *i) {
                store.update_element(&id, ElementPatch::label(label.clone()));
            }
        }
    }
}

proptest! {
    #[test]
    fn prop_undo_all_restores_initial_content(
        commands in prop::collection::vec(arb_command(), 0..20)
    ) {
        let mut store = ProjectStore::in_memory();
        let initial = content(&store);

        for command in &commands {
            apply(&mut store, command);
        }
        while store.snapshot().can_undo {
            store.undo();
        }

        prop_assert_eq!(content(&store), initial);
    }

    #[test]
    fn prop_redo_all_restores_final_content(
        commands in prop::collection::vec(arb_command(), 0..20)
    ) {
        let mut store = ProjectStore::in_memory();
        for command in &commands {
            apply(&mut store, command);
        }
        let last = content(&store);

        while store.snapshot().can_undo {
            store.undo();
        }
        while store.snapshot().can_redo {
            store.redo();
        }

        prop_assert_eq!(content(&store), last);
    }

    #[test]
    fn prop_screens_never_empty_and_arrows_resolve(
        commands in prop::collection::vec(arb_command(), 0..30)
    ) {
        let mut store = ProjectStore::in_memory();
        for command in &commands {
            apply(&mut store, command);
            let project = store.project();
            prop_assert!(!project.screens.is_empty());
            prop_assert_eq!(project.live_arrows().count(), project.arrows.len());
            prop_assert!(project.arrows.iter().all(|a| !a.is_self_loop()));
            prop_assert!(project.has_screen(&store.snapshot().active_screen_id));
        }
    }

    #[test]
    fn prop_remove_screen_drops_one(extra in 1usize..5, victim in 0usize..6) {
        let mut store = ProjectStore::in_memory();
        for _ in 0..extra {
            store.add_screen();
        }
        let first = screen_at(&store, 0);
        let last = screen_at(&store, extra);
        store.add_arrow(&first, &last, "next");

        let before = store.project().screens.len();
        let id = screen_at(&store, victim);
        store.remove_screen(&id);

        prop_assert_eq!(store.project().screens.len(), before - 1);
        prop_assert!(!store.project().arrows.iter().any(|a| a.touches(&id)));
    }

    #[test]
    fn prop_snap_idempotent(v in -1.0e6f64..1.0e6) {
        let once = snap(v, true);
        prop_assert_eq!(snap(once, true), once);
        prop_assert_eq!(snap(v, false), v);
        prop_assert!((once / GRID_SIZE).fract().abs() < 1e-9);
    }

    #[test]
    fn prop_resize_never_below_floor(w in -100.0f64..100.0, h in -100.0f64..100.0) {
        let mut store = ProjectStore::in_memory();
        let id = store.add_element(ElementType::Card, 0.0, 0.0, false).expect("added");
        store.update_element(&id, ElementPatch::size(w, h));
        let el = &store.active_screen().expect("screen").elements[0];
        prop_assert!(el.width >= MIN_ELEMENT_SIZE);
        prop_assert!(el.height >= MIN_ELEMENT_SIZE);
    }
}
