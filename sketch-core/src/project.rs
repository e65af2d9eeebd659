//! Project model: screens, navigation arrows, and version history.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::element::{Element, ElementId, ScreenState};
use crate::id::{ArrowId, ProjectId, ScreenId, VersionId};

/// Horizontal spacing between screen cards on the flow canvas.
pub const FLOW_SPACING: f64 = 450.0;

/// Name given to a fresh project.
pub const DEFAULT_PROJECT_NAME: &str = "Untitled Project";

/// Target device frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    /// Phone viewport (baseline).
    #[default]
    Mobile,
    /// Tablet viewport.
    Tablet,
    /// Desktop viewport.
    Desktop,
}

impl DeviceType {
    /// All devices.
    pub const ALL: [Self; 3] = [Self::Mobile, Self::Tablet, Self::Desktop];

    /// Viewport `(width, height)` in device units.
    #[must_use]
    pub const fn dimensions(self) -> (u32, u32) {
        match self {
            Self::Mobile => (375, 812),
            Self::Tablet => (768, 1024),
            Self::Desktop => (1440, 900),
        }
    }

    /// The serialized name of this device.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mobile => "mobile",
            Self::Tablet => "tablet",
            Self::Desktop => "desktop",
        }
    }

    /// Capitalized name, e.g. `"Tablet"`.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Mobile => "Mobile",
            Self::Tablet => "Tablet",
            Self::Desktop => "Desktop",
        }
    }

    /// Parse a serialized device name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.as_str() == name)
    }
}

impl std::fmt::Display for DeviceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A design surface owning its elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Screen {
    /// Unique identifier.
    pub id: ScreenId,
    /// Display name.
    pub name: String,
    /// What the user should accomplish here.
    pub user_goal: String,
    /// Elements in paint order (later = on top).
    pub elements: Vec<Element>,
    /// The state currently shown and edited.
    pub active_state: ScreenState,
    /// Card position on the flow canvas.
    pub flow_x: f64,
    /// Card position on the flow canvas.
    pub flow_y: f64,
}

impl Screen {
    /// Create an empty screen.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ScreenId::new(),
            name: name.into(),
            user_goal: String::new(),
            elements: Vec::new(),
            active_state: ScreenState::Default,
            flow_x: 0.0,
            flow_y: 0.0,
        }
    }

    /// Set the flow canvas position.
    #[must_use]
    pub fn at_flow(mut self, x: f64, y: f64) -> Self {
        self.flow_x = x;
        self.flow_y = y;
        self
    }

    /// Set the user goal.
    #[must_use]
    pub fn with_goal(mut self, goal: impl Into<String>) -> Self {
        self.user_goal = goal.into();
        self
    }

    /// Elements that belong to `state`, in paint order.
    pub fn elements_in(&self, state: ScreenState) -> impl Iterator<Item = &Element> {
        self.elements
            .iter()
            .filter(move |el| el.screen_state == state)
    }

    /// Elements visible in the active state.
    pub fn visible_elements(&self) -> impl Iterator<Item = &Element> {
        self.elements_in(self.active_state)
    }

    /// Get an element by id.
    #[must_use]
    pub fn element(&self, id: &ElementId) -> Option<&Element> {
        self.elements.iter().find(|el| &el.id == id)
    }

    /// Get a mutable element by id.
    pub fn element_mut(&mut self, id: &ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|el| &el.id == id)
    }

    /// Position of an element in the paint order.
    #[must_use]
    pub fn element_index(&self, id: &ElementId) -> Option<usize> {
        self.elements.iter().position(|el| &el.id == id)
    }
}

/// Directed navigation edge between two screens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowArrow {
    /// Unique identifier.
    pub id: ArrowId,
    /// Source screen.
    pub from_screen_id: ScreenId,
    /// Destination screen.
    pub to_screen_id: ScreenId,
    /// What the user does to navigate.
    pub trigger: String,
}

impl FlowArrow {
    /// Create an arrow.
    #[must_use]
    pub fn new(from: ScreenId, to: ScreenId, trigger: impl Into<String>) -> Self {
        Self {
            id: ArrowId::new(),
            from_screen_id: from,
            to_screen_id: to,
            trigger: trigger.into(),
        }
    }

    /// Whether the arrow points back at its own screen.
    #[must_use]
    pub fn is_self_loop(&self) -> bool {
        self.from_screen_id == self.to_screen_id
    }

    /// Whether either endpoint is `screen`.
    #[must_use]
    pub fn touches(&self, screen: &ScreenId) -> bool {
        &self.from_screen_id == screen || &self.to_screen_id == screen
    }
}

/// Immutable historical copy of a project's content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionSnapshot {
    /// Unique identifier.
    pub id: VersionId,
    /// Creation time in milliseconds since the Unix epoch.
    pub timestamp: u64,
    /// User-provided label.
    pub label: String,
    /// Screens at the time of the snapshot.
    pub screens: Vec<Screen>,
    /// Arrows at the time of the snapshot.
    pub arrows: Vec<FlowArrow>,
}

/// A complete wireframe project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Unique identifier.
    pub id: ProjectId,
    /// Display name.
    pub name: String,
    /// Overall design intent.
    pub goal: String,
    /// Target device.
    pub device: DeviceType,
    /// Screens; never empty.
    pub screens: Vec<Screen>,
    /// Navigation arrows.
    pub arrows: Vec<FlowArrow>,
    /// Saved versions, newest first.
    pub versions: Vec<VersionSnapshot>,
}

impl Default for Project {
    fn default() -> Self {
        Self::new()
    }
}

impl Project {
    /// Create a fresh project with a single empty screen.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: ProjectId::new(),
            name: DEFAULT_PROJECT_NAME.to_string(),
            goal: String::new(),
            device: DeviceType::Mobile,
            screens: vec![Screen::new("Screen 1")],
            arrows: Vec::new(),
            versions: Vec::new(),
        }
    }

    /// Get a screen by id.
    #[must_use]
    pub fn screen(&self, id: &ScreenId) -> Option<&Screen> {
        self.screens.iter().find(|s| &s.id == id)
    }

    /// Get a mutable screen by id.
    pub fn screen_mut(&mut self, id: &ScreenId) -> Option<&mut Screen> {
        self.screens.iter_mut().find(|s| &s.id == id)
    }

    /// Whether a screen with this id exists.
    #[must_use]
    pub fn has_screen(&self, id: &ScreenId) -> bool {
        self.screen(id).is_some()
    }

    /// Id of the first screen.
    #[must_use]
    pub fn first_screen_id(&self) -> Option<&ScreenId> {
        self.screens.first().map(|s| &s.id)
    }

    /// Arrows whose endpoints both resolve to live screens.
    pub fn live_arrows(&self) -> impl Iterator<Item = &FlowArrow> {
        self.arrows
            .iter()
            .filter(|a| self.has_screen(&a.from_screen_id) && self.has_screen(&a.to_screen_id))
    }

    /// Drop arrows that reference screens no longer in the project.
    pub fn prune_arrows(&mut self) {
        let screens = &self.screens;
        self.arrows.retain(|a| {
            screens.iter().any(|s| s.id == a.from_screen_id)
                && screens.iter().any(|s| s.id == a.to_screen_id)
        });
    }

    /// Get a version by id.
    #[must_use]
    pub fn version(&self, id: &VersionId) -> Option<&VersionSnapshot> {
        self.versions.iter().find(|v| &v.id == id)
    }

    /// Total number of elements across all screens.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.screens.iter().map(|s| s.elements.len()).sum()
    }

    /// Serialize to pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Current Unix timestamp in milliseconds.
#[must_use]
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |d| {
        // Timestamp will not exceed u64 max for millennia
        #[allow(clippy::cast_possible_truncation)]
        {
            d.as_millis() as u64
        }
    })
}
