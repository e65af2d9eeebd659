//! The project command engine.
//!
//! [`ProjectStore`] owns the live project and every piece of editor state
//! around it. Each command runs to completion, then publishes a fresh
//! [`StoreSnapshot`] and queues a debounced write. Commands whose
//! preconditions fail (no target, empty selection, last screen) leave the
//! store untouched and publish nothing.

use std::collections::BTreeSet;
use std::sync::Arc;

use tokio::sync::{broadcast, watch};

use crate::config::StoreConfig;
use crate::element::{Element, ElementId, ElementPatch, ElementType, ScreenState};
use crate::error::{CoreError, CoreResult};
use crate::history::{HistoryEntry, UndoHistory};
use crate::id::{ArrowId, ProjectId, ScreenId, VersionId};
use crate::persist::{DebouncedSaver, IndexEntry, MemoryStorage, ProjectRepository, Storage};
use crate::project::{
    current_timestamp_ms, DeviceType, FlowArrow, Project, Screen, VersionSnapshot, FLOW_SPACING,
};
use crate::sanitize::validate_import;
use crate::snap::snap_to;
use crate::state::{SaveStatus, StoreSnapshot, Tool, ViewMode};

/// Offset applied to duplicated and pasted elements.
pub const PASTE_OFFSET: f64 = 16.0;

/// Capacity of the snapshot broadcast channel.
const SNAPSHOT_CHANNEL_CAPACITY: usize = 64;

/// Single-owner store for one open project plus its editor state.
///
/// Multiple stores can coexist; each owns its own history, clipboard, and
/// saver. Dropping a store flushes any pending write.
#[derive(Debug)]
pub struct ProjectStore {
    config: StoreConfig,
    project: Arc<Project>,
    history: UndoHistory,
    selected_element_ids: BTreeSet<ElementId>,
    selected_arrow_id: Option<ArrowId>,
    active_screen_id: ScreenId,
    active_tool: Tool,
    view_mode: ViewMode,
    snap_enabled: bool,
    clipboard: Vec<Element>,
    saver: DebouncedSaver,
    snapshot: Arc<StoreSnapshot>,
    snapshot_tx: broadcast::Sender<Arc<StoreSnapshot>>,
}

impl ProjectStore {
    /// Open the store over `storage`, resuming the last-active project.
    ///
    /// The resumed project is written back immediately so the index and
    /// active pointer always describe it.
    #[must_use]
    pub fn open(storage: Arc<dyn Storage>, config: StoreConfig) -> Self {
        let repo = ProjectRepository::new(storage);
        let project = repo.load_initial();
        tracing::info!(project = %project.id, name = %project.name, "Opened project");

        let mut saver = DebouncedSaver::new(repo, config.save_debounce, config.saved_linger);
        let project = Arc::new(project);
        saver.save_now(Arc::clone(&project));

        let active_screen_id = first_screen_id(&project);
        let snapshot = Arc::new(StoreSnapshot {
            project: Arc::clone(&project),
            selected_element_ids: BTreeSet::new(),
            selected_arrow_id: None,
            active_screen_id: active_screen_id.clone(),
            active_tool: Tool::Select,
            view_mode: ViewMode::Screen,
            can_undo: false,
            can_redo: false,
            snap_enabled: config.snap_enabled,
            has_clipboard: false,
        });
        let (snapshot_tx, _) = broadcast::channel(SNAPSHOT_CHANNEL_CAPACITY);

        Self {
            history: UndoHistory::with_limit(config.undo_limit),
            snap_enabled: config.snap_enabled,
            config,
            project,
            selected_element_ids: BTreeSet::new(),
            selected_arrow_id: None,
            active_screen_id,
            active_tool: Tool::Select,
            view_mode: ViewMode::Screen,
            clipboard: Vec::new(),
            saver,
            snapshot,
            snapshot_tx,
        }
    }

    /// A store over fresh in-memory storage with default settings.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::open(Arc::new(MemoryStorage::new()), StoreConfig::default())
    }

    // ─── Reading ──────────────────────────────────────────────

    /// The latest published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<StoreSnapshot> {
        Arc::clone(&self.snapshot)
    }

    /// The live project.
    #[must_use]
    pub fn project(&self) -> &Project {
        &self.project
    }

    /// The screen being edited.
    #[must_use]
    pub fn active_screen(&self) -> Option<&Screen> {
        self.project.screen(&self.active_screen_id)
    }

    /// Receive every snapshot published after this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<StoreSnapshot>> {
        self.snapshot_tx.subscribe()
    }

    /// Watch save-status transitions.
    #[must_use]
    pub fn subscribe_save_status(&self) -> watch::Receiver<SaveStatus> {
        self.saver.subscribe_status()
    }

    /// Current save status.
    #[must_use]
    pub fn save_status(&self) -> SaveStatus {
        self.saver.status()
    }

    /// The configuration this store was opened with.
    #[must_use]
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    // ─── Undo / Redo ──────────────────────────────────────────

    /// Restore the content before the last checkpointed command.
    pub fn undo(&mut self) {
        let current = HistoryEntry::capture(&self.project);
        let Some(previous) = self.history.undo(current) else {
            return;
        };
        tracing::debug!("undo");
        self.restore(previous);
    }

    /// Re-apply the last undone command.
    pub fn redo(&mut self) {
        let current = HistoryEntry::capture(&self.project);
        let Some(next) = self.history.redo(current) else {
            return;
        };
        tracing::debug!("redo");
        self.restore(next);
    }

    fn restore(&mut self, entry: HistoryEntry) {
        entry.restore_into(Arc::make_mut(&mut self.project));
        if !self.project.has_screen(&self.active_screen_id) {
            self.active_screen_id = first_screen_id(&self.project);
        }
        self.selected_element_ids.clear();
        let arrow_gone = self
            .selected_arrow_id
            .as_ref()
            .is_some_and(|id| !self.project.arrows.iter().any(|a| &a.id == id));
        if arrow_gone {
            self.selected_arrow_id = None;
        }
        self.commit();
    }

    // ─── Project metadata ─────────────────────────────────────

    /// Rename the project.
    pub fn set_project_name(&mut self, name: impl Into<String>) {
        Arc::make_mut(&mut self.project).name = name.into();
        self.commit();
    }

    /// Set the project's design intent.
    pub fn set_project_goal(&mut self, goal: impl Into<String>) {
        Arc::make_mut(&mut self.project).goal = goal.into();
        self.commit();
    }

    /// Change the target device.
    pub fn set_device(&mut self, device: DeviceType) {
        Arc::make_mut(&mut self.project).device = device;
        self.commit();
    }

    // ─── Editor state ─────────────────────────────────────────

    /// Change the active tool. The arrow tool is only accepted in flow view.
    pub fn set_active_tool(&mut self, tool: Tool) {
        if tool == Tool::Arrow && self.view_mode != ViewMode::Flow {
            return;
        }
        self.active_tool = tool;
        self.publish();
    }

    /// Switch between the screen canvas and the flow graph.
    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
        if mode == ViewMode::Screen && self.active_tool == Tool::Arrow {
            self.active_tool = Tool::Select;
        }
        self.publish();
    }

    /// Toggle grid snapping for subsequent placements and moves.
    pub fn set_snap_enabled(&mut self, enabled: bool) {
        self.snap_enabled = enabled;
        self.publish();
    }

    /// Make another screen the editing target. Clears element selection.
    pub fn set_active_screen(&mut self, id: &ScreenId) {
        if !self.project.has_screen(id) {
            return;
        }
        self.active_screen_id = id.clone();
        self.selected_element_ids.clear();
        self.publish();
    }

    /// Show a different state of the active screen. Clears element selection.
    pub fn set_active_state(&mut self, state: ScreenState) {
        let Some(screen) = self.active_screen_mut() else {
            return;
        };
        screen.active_state = state;
        self.selected_element_ids.clear();
        self.commit();
    }

    // ─── Screens ──────────────────────────────────────────────

    /// Append an empty screen and make it active.
    pub fn add_screen(&mut self) -> ScreenId {
        self.checkpoint();
        let project = Arc::make_mut(&mut self.project);
        let index = project.screens.len();
        #[allow(clippy::cast_precision_loss)]
        let screen =
            Screen::new(format!("Screen {}", index + 1)).at_flow(index as f64 * FLOW_SPACING, 0.0);
        let id = screen.id.clone();
        project.screens.push(screen);
        tracing::debug!(screen = %id, "add screen");

        self.active_screen_id = id.clone();
        self.selected_element_ids.clear();
        self.commit();
        id
    }

    /// Remove a screen and every arrow touching it. The last screen stays.
    pub fn remove_screen(&mut self, id: &ScreenId) {
        if self.project.screens.len() <= 1 || !self.project.has_screen(id) {
            return;
        }
        self.checkpoint();
        let project = Arc::make_mut(&mut self.project);
        project.screens.retain(|s| &s.id != id);
        project.arrows.retain(|a| !a.touches(id));
        tracing::debug!(screen = %id, "remove screen");

        if &self.active_screen_id == id {
            self.active_screen_id = first_screen_id(&self.project);
            self.selected_element_ids.clear();
        }
        self.drop_stale_arrow_selection();
        self.commit();
    }

    /// Rename a screen.
    pub fn rename_screen(&mut self, id: &ScreenId, name: impl Into<String>) {
        let Some(screen) = Arc::make_mut(&mut self.project).screen_mut(id) else {
            return;
        };
        screen.name = name.into();
        self.commit();
    }

    /// Set a screen's user goal.
    pub fn set_screen_goal(&mut self, id: &ScreenId, goal: impl Into<String>) {
        let Some(screen) = Arc::make_mut(&mut self.project).screen_mut(id) else {
            return;
        };
        screen.user_goal = goal.into();
        self.commit();
    }

    /// Move a screen card on the flow canvas. Not snapped.
    pub fn update_screen_flow_position(&mut self, id: &ScreenId, x: f64, y: f64) {
        let Some(screen) = Arc::make_mut(&mut self.project).screen_mut(id) else {
            return;
        };
        screen.flow_x = x;
        screen.flow_y = y;
        self.commit();
    }

    /// Replace all screens with empty ones named `names`, each given
    /// `overall_goal`.
    pub fn scaffold_screens(&mut self, names: &[String], overall_goal: &str) {
        let screens = names
            .iter()
            .map(|name| (name.clone(), overall_goal.to_string()))
            .collect::<Vec<_>>();
        self.replace_screens(&screens);
    }

    /// Replace all screens with empty ones built from `(name, goal)` pairs.
    /// An empty goal falls back to the project goal.
    pub fn scaffold_screens_with_goals(&mut self, screens: &[(String, String)]) {
        let fallback = self.project.goal.clone();
        let screens = screens
            .iter()
            .map(|(name, goal)| {
                let goal = if goal.trim().is_empty() {
                    fallback.clone()
                } else {
                    goal.clone()
                };
                (name.clone(), goal)
            })
            .collect::<Vec<_>>();
        self.replace_screens(&screens);
    }

    fn replace_screens(&mut self, screens: &[(String, String)]) {
        if screens.is_empty() {
            return;
        }
        self.checkpoint();
        #[allow(clippy::cast_precision_loss)]
        let scaffolded: Vec<Screen> = screens
            .iter()
            .enumerate()
            .map(|(i, (name, goal))| {
                Screen::new(name.clone())
                    .with_goal(goal.clone())
                    .at_flow(i as f64 * FLOW_SPACING, 0.0)
            })
            .collect();
        let project = Arc::make_mut(&mut self.project);
        project.screens = scaffolded;
        project.prune_arrows();
        tracing::debug!(count = screens.len(), "scaffold screens");

        self.active_screen_id = first_screen_id(&self.project);
        self.selected_element_ids.clear();
        self.drop_stale_arrow_selection();
        self.commit();
    }

    // ─── Elements ─────────────────────────────────────────────

    /// Place a new element on the active screen, in its visible state.
    ///
    /// The new element becomes the only selection. The tool reverts to
    /// select unless `keep_tool` is set.
    pub fn add_element(
        &mut self,
        kind: ElementType,
        x: f64,
        y: f64,
        keep_tool: bool,
    ) -> Option<ElementId> {
        let state = self.active_screen()?.active_state;
        let x = self.snap(x);
        let y = self.snap(y);

        self.checkpoint();
        let element = Element::new(kind, x, y, state);
        let id = element.id.clone();
        self.active_screen_mut()?.elements.push(element);
        tracing::debug!(element = %id, kind = %kind, x, y, "add element");

        self.selected_element_ids = BTreeSet::from([id.clone()]);
        self.selected_arrow_id = None;
        if !keep_tool {
            self.active_tool = Tool::Select;
        }
        self.commit();
        Some(id)
    }

    /// Apply a partial update to an element on the active screen.
    ///
    /// Content edits are checkpointed; geometry edits are not (call
    /// [`begin_drag`](Self::begin_drag) before a gesture).
    pub fn update_element(&mut self, id: &ElementId, patch: ElementPatch) {
        if self.active_screen().and_then(|s| s.element(id)).is_none() {
            return;
        }
        if patch.is_discrete() {
            self.checkpoint();
        }
        let patch = ElementPatch {
            x: patch.x.map(|x| self.snap(x)),
            y: patch.y.map(|y| self.snap(y)),
            ..patch
        };
        if let Some(element) = self.active_screen_mut().and_then(|s| s.element_mut(id)) {
            element.apply(&patch);
        }
        self.commit();
    }

    /// Checkpoint once before a continuous drag or resize.
    pub fn begin_drag(&mut self) {
        self.checkpoint();
        self.publish();
    }

    /// Delete one element from the active screen.
    pub fn delete_element(&mut self, id: &ElementId) {
        if self.active_screen().and_then(|s| s.element(id)).is_none() {
            return;
        }
        self.checkpoint();
        if let Some(screen) = self.active_screen_mut() {
            screen.elements.retain(|el| &el.id != id);
        }
        self.selected_element_ids.remove(id);
        tracing::debug!(element = %id, "delete element");
        self.commit();
    }

    /// Delete every selected element.
    pub fn delete_selected_elements(&mut self) {
        let selected = std::mem::take(&mut self.selected_element_ids);
        let any_present = self
            .active_screen()
            .is_some_and(|s| s.elements.iter().any(|el| selected.contains(&el.id)));
        if !any_present {
            self.selected_element_ids = selected;
            return;
        }
        self.checkpoint();
        if let Some(screen) = self.active_screen_mut() {
            screen.elements.retain(|el| !selected.contains(&el.id));
        }
        tracing::debug!(count = selected.len(), "delete selected elements");
        self.commit();
    }

    // ─── Selection ────────────────────────────────────────────

    /// Select exactly one element, or clear the selection with `None`.
    pub fn select_element(&mut self, id: Option<&ElementId>) {
        match id {
            Some(id) => {
                if self.active_screen().and_then(|s| s.element(id)).is_none() {
                    return;
                }
                self.selected_element_ids = BTreeSet::from([id.clone()]);
                self.selected_arrow_id = None;
            }
            None => self.selected_element_ids.clear(),
        }
        self.publish();
    }

    /// Add or remove one element from the selection.
    pub fn toggle_select_element(&mut self, id: &ElementId) {
        if !self.selected_element_ids.remove(id) {
            if self.active_screen().and_then(|s| s.element(id)).is_none() {
                return;
            }
            self.selected_element_ids.insert(id.clone());
            self.selected_arrow_id = None;
        }
        self.publish();
    }

    /// Select every element visible in the active screen's current state.
    pub fn select_all(&mut self) {
        let Some(screen) = self.active_screen() else {
            return;
        };
        self.selected_element_ids = screen.visible_elements().map(|el| el.id.clone()).collect();
        self.selected_arrow_id = None;
        self.publish();
    }

    // ─── Duplicate / Clipboard ────────────────────────────────

    /// Clone the selection in place, offset, and select the clones.
    pub fn duplicate_selected(&mut self) {
        let clones = self.selected_elements(|el| el.duplicate(PASTE_OFFSET, PASTE_OFFSET));
        if clones.is_empty() {
            return;
        }
        self.insert_and_select(clones);
    }

    /// Copy the selection to the clipboard.
    pub fn copy_selected(&mut self) {
        let copied = self.selected_elements(Element::clone);
        if copied.is_empty() {
            return;
        }
        tracing::debug!(count = copied.len(), "copy");
        self.clipboard = copied;
        self.publish();
    }

    /// Paste the clipboard onto the active screen's visible state.
    ///
    /// Each paste lands one offset further from the original copy.
    pub fn paste(&mut self) {
        if self.clipboard.is_empty() {
            return;
        }
        let Some(state) = self.active_screen().map(|s| s.active_state) else {
            return;
        };
        let clones = self
            .clipboard
            .iter()
            .map(|el| Element {
                screen_state: state,
                ..el.duplicate(PASTE_OFFSET, PASTE_OFFSET)
            })
            .collect::<Vec<_>>();
        for el in &mut self.clipboard {
            el.x += PASTE_OFFSET;
            el.y += PASTE_OFFSET;
        }
        self.insert_and_select(clones);
    }

    fn selected_elements(&self, f: impl Fn(&Element) -> Element) -> Vec<Element> {
        self.active_screen()
            .map(|s| {
                s.elements
                    .iter()
                    .filter(|el| self.selected_element_ids.contains(&el.id))
                    .map(f)
                    .collect()
            })
            .unwrap_or_default()
    }

    fn insert_and_select(&mut self, elements: Vec<Element>) {
        if self.active_screen().is_none() {
            return;
        }
        self.checkpoint();
        let ids: BTreeSet<ElementId> = elements.iter().map(|el| el.id.clone()).collect();
        if let Some(screen) = self.active_screen_mut() {
            screen.elements.extend(elements);
        }
        self.selected_element_ids = ids;
        self.selected_arrow_id = None;
        self.commit();
    }

    // ─── Layering ─────────────────────────────────────────────

    /// Paint an element above all others on its screen.
    pub fn bring_to_front(&mut self, id: &ElementId) {
        self.move_in_paint_order(id, true);
    }

    /// Paint an element below all others on its screen.
    pub fn send_to_back(&mut self, id: &ElementId) {
        self.move_in_paint_order(id, false);
    }

    fn move_in_paint_order(&mut self, id: &ElementId, to_front: bool) {
        let Some(screen) = self.active_screen() else {
            return;
        };
        let Some(index) = screen.element_index(id) else {
            return;
        };
        let target = if to_front { screen.elements.len() - 1 } else { 0 };
        if index == target {
            return;
        }
        self.checkpoint();
        if let Some(screen) = self.active_screen_mut() {
            let element = screen.elements.remove(index);
            if to_front {
                screen.elements.push(element);
            } else {
                screen.elements.insert(0, element);
            }
        }
        self.commit();
    }

    // ─── Arrows ───────────────────────────────────────────────

    /// Connect two distinct live screens.
    pub fn add_arrow(
        &mut self,
        from: &ScreenId,
        to: &ScreenId,
        trigger: impl Into<String>,
    ) -> Option<ArrowId> {
        if from == to || !self.project.has_screen(from) || !self.project.has_screen(to) {
            return None;
        }
        self.checkpoint();
        let arrow = FlowArrow::new(from.clone(), to.clone(), trigger);
        let id = arrow.id.clone();
        Arc::make_mut(&mut self.project).arrows.push(arrow);
        tracing::debug!(arrow = %id, from = %from, to = %to, "add arrow");
        self.commit();
        Some(id)
    }

    /// Change an arrow's trigger text.
    pub fn update_arrow(&mut self, id: &ArrowId, trigger: impl Into<String>) {
        let project = Arc::make_mut(&mut self.project);
        let Some(arrow) = project.arrows.iter_mut().find(|a| &a.id == id) else {
            return;
        };
        arrow.trigger = trigger.into();
        self.commit();
    }

    /// Delete an arrow.
    pub fn remove_arrow(&mut self, id: &ArrowId) {
        if !self.project.arrows.iter().any(|a| &a.id == id) {
            return;
        }
        self.checkpoint();
        Arc::make_mut(&mut self.project)
            .arrows
            .retain(|a| &a.id != id);
        if self.selected_arrow_id.as_ref() == Some(id) {
            self.selected_arrow_id = None;
        }
        tracing::debug!(arrow = %id, "remove arrow");
        self.commit();
    }

    /// Select an arrow (clearing element selection), or clear with `None`.
    pub fn select_arrow(&mut self, id: Option<&ArrowId>) {
        match id {
            Some(id) => {
                if !self.project.arrows.iter().any(|a| &a.id == id) {
                    return;
                }
                self.selected_arrow_id = Some(id.clone());
                self.selected_element_ids.clear();
            }
            None => self.selected_arrow_id = None,
        }
        self.publish();
    }

    /// Delete the selected arrow.
    pub fn delete_selected_arrow(&mut self) {
        if let Some(id) = self.selected_arrow_id.clone() {
            self.remove_arrow(&id);
        }
    }

    fn drop_stale_arrow_selection(&mut self) {
        let stale = self
            .selected_arrow_id
            .as_ref()
            .is_some_and(|id| !self.project.arrows.iter().any(|a| &a.id == id));
        if stale {
            self.selected_arrow_id = None;
        }
    }

    // ─── Versions ─────────────────────────────────────────────

    /// Store a labeled copy of the current screens and arrows.
    ///
    /// Versions are not undoable.
    pub fn save_version(&mut self, label: impl Into<String>) -> VersionId {
        let project = Arc::make_mut(&mut self.project);
        let version = VersionSnapshot {
            id: VersionId::new(),
            timestamp: current_timestamp_ms(),
            label: label.into(),
            screens: project.screens.clone(),
            arrows: project.arrows.clone(),
        };
        let id = version.id.clone();
        project.versions.insert(0, version);
        tracing::info!(version = %id, "Saved version");
        self.commit();
        id
    }

    /// Replace screens and arrows with a saved version's copy.
    pub fn restore_version(&mut self, id: &VersionId) {
        let Some(version) = self.project.version(id).cloned() else {
            return;
        };
        self.checkpoint();
        HistoryEntry {
            screens: version.screens,
            arrows: version.arrows,
        }
        .restore_into(Arc::make_mut(&mut self.project));
        tracing::info!(version = %id, "Restored version");

        self.active_screen_id = first_screen_id(&self.project);
        self.selected_element_ids.clear();
        self.selected_arrow_id = None;
        self.commit();
    }

    // ─── Projects ─────────────────────────────────────────────

    /// Every stored project, most recently updated first.
    #[must_use]
    pub fn get_project_list(&mut self) -> Vec<IndexEntry> {
        self.saver.flush();
        self.saver.repository().list()
    }

    /// Save the current project, then open another stored one.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ProjectNotFound`] if `id` has no readable record.
    pub fn switch_project(&mut self, id: &ProjectId) -> CoreResult<()> {
        if id == &self.project.id {
            return Ok(());
        }
        let project = self
            .saver
            .repository()
            .load(id)
            .ok_or_else(|| CoreError::ProjectNotFound(id.to_string()))?;
        tracing::info!(project = %id, "Switching project");
        self.replace_project(project);
        Ok(())
    }

    /// Save the current project, then start a fresh one.
    pub fn create_new_project(&mut self) -> ProjectId {
        let project = Project::new();
        let id = project.id.clone();
        tracing::info!(project = %id, "Creating project");
        self.replace_project(project);
        id
    }

    /// Delete a stored project other than the open one.
    ///
    /// Returns whether a stored project was removed.
    pub fn delete_project(&mut self, id: &ProjectId) -> bool {
        if id == &self.project.id {
            return false;
        }
        match self.saver.repository().delete(id) {
            Ok(true) => {
                tracing::info!(project = %id, "Deleted project");
                true
            }
            Ok(false) => {
                tracing::debug!(project = %id, "No stored project to delete");
                false
            }
            Err(e) => {
                tracing::warn!(project = %id, "Failed to delete project: {e}");
                false
            }
        }
    }

    /// The whole project, versions included, as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn export_project_json(&self) -> CoreResult<String> {
        Ok(self.project.to_json()?)
    }

    /// Import a project from untrusted JSON and open it.
    ///
    /// Missing fields are defaulted. An id that collides with a stored
    /// project is replaced with a fresh one.
    ///
    /// # Errors
    ///
    /// Returns an error without touching the store if the text is not JSON
    /// or lacks a non-empty `screens` array.
    pub fn import_project_json(&mut self, json: &str) -> CoreResult<ProjectId> {
        let mut project = validate_import(json)?;
        if project.id == self.project.id || self.saver.repository().contains(&project.id) {
            project.id = ProjectId::new();
        }
        let id = project.id.clone();
        tracing::info!(project = %id, name = %project.name, "Imported project");
        self.replace_project(project);
        Ok(id)
    }

    fn replace_project(&mut self, project: Project) {
        self.saver.save_now(Arc::clone(&self.project));

        self.project = Arc::new(project);
        self.active_screen_id = first_screen_id(&self.project);
        self.selected_element_ids.clear();
        self.selected_arrow_id = None;
        self.active_tool = Tool::Select;
        self.view_mode = ViewMode::Screen;
        self.clipboard.clear();
        self.history.clear();

        self.saver.save_now(Arc::clone(&self.project));
        self.publish();
    }

    /// Write any pending change now. The store stays usable.
    pub fn dispose(&mut self) {
        tracing::debug!("dispose");
        self.saver.flush();
    }

    // ─── Internals ────────────────────────────────────────────

    fn snap(&self, value: f64) -> f64 {
        snap_to(value, self.config.grid_size, self.snap_enabled)
    }

    fn checkpoint(&mut self) {
        self.history.checkpoint(HistoryEntry::capture(&self.project));
    }

    fn active_screen_mut(&mut self) -> Option<&mut Screen> {
        Arc::make_mut(&mut self.project).screen_mut(&self.active_screen_id)
    }

    /// Queue a write, then publish.
    fn commit(&mut self) {
        self.saver.schedule(Arc::clone(&self.project));
        self.publish();
    }

    fn publish(&mut self) {
        self.snapshot = Arc::new(self.build_snapshot());
        // No subscribers is fine
        let _ = self.snapshot_tx.send(Arc::clone(&self.snapshot));
    }

    fn build_snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            project: Arc::clone(&self.project),
            selected_element_ids: self.selected_element_ids.clone(),
            selected_arrow_id: self.selected_arrow_id.clone(),
            active_screen_id: self.active_screen_id.clone(),
            active_tool: self.active_tool,
            view_mode: self.view_mode,
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
            snap_enabled: self.snap_enabled,
            has_clipboard: !self.clipboard.is_empty(),
        }
    }
}

fn first_screen_id(project: &Project) -> ScreenId {
    project.first_screen_id().cloned().unwrap_or_default()
}
