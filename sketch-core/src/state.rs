//! Editor state published alongside the project.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::element::{ElementId, ElementType};
use crate::id::{ArrowId, ScreenId};
use crate::project::Project;

/// The active canvas tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// Select and manipulate elements.
    #[default]
    Select,
    /// Draw navigation arrows between screens (flow view only).
    Arrow,
    /// Place an element of the given type.
    Element(ElementType),
}

impl std::fmt::Display for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Select => f.write_str("select"),
            Self::Arrow => f.write_str("arrow"),
            Self::Element(kind) => write!(f, "{kind}"),
        }
    }
}

/// Which view the editor is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Single-screen element canvas.
    #[default]
    Screen,
    /// Navigation graph of screen cards.
    Flow,
}

/// Persistence feedback for the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveStatus {
    /// Nothing in flight.
    #[default]
    Idle,
    /// A write is queued or in progress.
    Saving,
    /// A write just completed.
    Saved,
}

/// Immutable view of the store after a command completes.
///
/// Snapshots are shared behind an [`Arc`]; the project inside is the same
/// allocation the store holds until the next mutation. Save status changes
/// on its own timers and is watched separately.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreSnapshot {
    /// The live project.
    pub project: Arc<Project>,
    /// Selected elements on the active screen.
    pub selected_element_ids: BTreeSet<ElementId>,
    /// Selected arrow, exclusive with element selection.
    pub selected_arrow_id: Option<ArrowId>,
    /// The screen being edited.
    pub active_screen_id: ScreenId,
    /// Current tool.
    pub active_tool: Tool,
    /// Current view.
    pub view_mode: ViewMode,
    /// Whether `undo` would do anything.
    pub can_undo: bool,
    /// Whether `redo` would do anything.
    pub can_redo: bool,
    /// Whether coordinates snap to the grid.
    pub snap_enabled: bool,
    /// Whether `paste` would do anything.
    pub has_clipboard: bool,
}

impl StoreSnapshot {
    /// The single selected element, if exactly one is selected.
    #[must_use]
    pub fn selected_element_id(&self) -> Option<&ElementId> {
        if self.selected_element_ids.len() == 1 {
            self.selected_element_ids.iter().next()
        } else {
            None
        }
    }

    /// Whether `id` is selected.
    #[must_use]
    pub fn is_selected(&self, id: &ElementId) -> bool {
        self.selected_element_ids.contains(id)
    }
}
