//! Canvas elements - the UI primitives placed on a screen.

use serde::{Deserialize, Serialize};

pub use crate::id::ElementId;

/// Smallest width or height an element may have after a resize.
pub const MIN_ELEMENT_SIZE: f64 = 24.0;

/// The kind of UI primitive an element represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    /// Generic layout section.
    Container,
    /// Heading text.
    Heading,
    /// Body copy.
    Body,
    /// Call-to-action button.
    Cta,
    /// Single-line text input.
    Textfield,
    /// Image placeholder.
    Image,
    /// Card surface.
    Card,
    /// Top navigation bar.
    Topnav,
    /// Bottom tab bar.
    Tabbar,
    /// Slide-up bottom sheet.
    Bottomsheet,
    /// List or feed.
    List,
}

impl ElementType {
    /// Every element type, in toolbar order.
    pub const ALL: [Self; 11] = [
        Self::Container,
        Self::Card,
        Self::Heading,
        Self::Body,
        Self::Cta,
        Self::Textfield,
        Self::Image,
        Self::Topnav,
        Self::Tabbar,
        Self::Bottomsheet,
        Self::List,
    ];

    /// The serialized name of this type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Container => "container",
            Self::Heading => "heading",
            Self::Body => "body",
            Self::Cta => "cta",
            Self::Textfield => "textfield",
            Self::Image => "image",
            Self::Card => "card",
            Self::Topnav => "topnav",
            Self::Tabbar => "tabbar",
            Self::Bottomsheet => "bottomsheet",
            Self::List => "list",
        }
    }

    /// Parse a serialized type name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }

    /// Default `(width, height)` for a freshly placed element.
    #[must_use]
    pub const fn default_size(self) -> (f64, f64) {
        match self {
            Self::Container => (335.0, 200.0),
            Self::Heading => (200.0, 36.0),
            Self::Body => (300.0, 60.0),
            Self::Cta => (200.0, 48.0),
            Self::Textfield => (300.0, 44.0),
            Self::Image => (300.0, 200.0),
            Self::Card => (300.0, 160.0),
            Self::Topnav | Self::Tabbar => (375.0, 56.0),
            Self::Bottomsheet => (375.0, 300.0),
            Self::List => (300.0, 240.0),
        }
    }

    /// Default label for a freshly placed element.
    #[must_use]
    pub const fn default_label(self) -> &'static str {
        match self {
            Self::Container => "Container",
            Self::Heading => "Heading",
            Self::Body => "Body Text",
            Self::Cta => "Button",
            Self::Textfield => "Text Field",
            Self::Image => "Image",
            Self::Card => "Card",
            Self::Topnav => "Top Nav",
            Self::Tabbar => "Tab Bar",
            Self::Bottomsheet => "Bottom Sheet",
            Self::List => "List",
        }
    }

    /// Whether elements of this type may host nested children.
    #[must_use]
    pub const fn is_container(self) -> bool {
        matches!(self, Self::Container | Self::Card | Self::Bottomsheet)
    }
}

impl std::fmt::Display for ElementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Semantic role annotation attached to an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SemanticTag {
    /// The screen's primary call to action.
    PrimaryCta,
    /// An action that destroys data.
    DestructiveAction,
    /// Builds user trust (badges, guarantees).
    TrustSignal,
    /// Testimonials, ratings, counts.
    SocialProof,
    /// Hero / above-the-fold section.
    HeroSection,
    /// Secondary utility navigation.
    UtilityNav,
    /// No semantic role.
    #[default]
    None,
}

impl SemanticTag {
    /// Every tag, with `None` last.
    pub const ALL: [Self; 7] = [
        Self::PrimaryCta,
        Self::DestructiveAction,
        Self::TrustSignal,
        Self::SocialProof,
        Self::HeroSection,
        Self::UtilityNav,
        Self::None,
    ];

    /// The serialized name of this tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PrimaryCta => "primary-cta",
            Self::DestructiveAction => "destructive-action",
            Self::TrustSignal => "trust-signal",
            Self::SocialProof => "social-proof",
            Self::HeroSection => "hero-section",
            Self::UtilityNav => "utility-nav",
            Self::None => "none",
        }
    }

    /// Parse a serialized tag name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }

    /// Whether a semantic role is set.
    #[must_use]
    pub const fn is_set(self) -> bool {
        !matches!(self, Self::None)
    }
}

impl std::fmt::Display for SemanticTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named visibility variant of a screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScreenState {
    /// Regular content.
    #[default]
    Default,
    /// Nothing to show yet.
    Empty,
    /// Something went wrong.
    Error,
    /// Content is loading.
    Loading,
}

impl ScreenState {
    /// All states in export order.
    pub const ALL: [Self; 4] = [Self::Default, Self::Empty, Self::Error, Self::Loading];

    /// The serialized name of this state.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Empty => "empty",
            Self::Error => "error",
            Self::Loading => "loading",
        }
    }

    /// Parse a serialized state name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == name)
    }

    /// Capitalized name, e.g. `"Loading"`.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Default => "Default",
            Self::Empty => "Empty",
            Self::Error => "Error",
            Self::Loading => "Loading",
        }
    }
}

/// A UI primitive with absolute position and size inside a screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    /// Unique identifier.
    pub id: ElementId,
    /// Primitive kind.
    #[serde(rename = "type")]
    pub kind: ElementType,
    /// Left edge in device units.
    pub x: f64,
    /// Top edge in device units.
    pub y: f64,
    /// Width in device units.
    pub width: f64,
    /// Height in device units.
    pub height: f64,
    /// Visible label.
    pub label: String,
    /// Free-form designer note.
    pub annotation: String,
    /// Semantic role.
    pub semantic_tag: SemanticTag,
    /// The screen state this element belongs to.
    pub screen_state: ScreenState,
}

impl Element {
    /// Create an element of the given kind with its default size and label.
    #[must_use]
    pub fn new(kind: ElementType, x: f64, y: f64, screen_state: ScreenState) -> Self {
        let (width, height) = kind.default_size();
        Self {
            id: ElementId::new(),
            kind,
            x,
            y,
            width,
            height,
            label: kind.default_label().to_string(),
            annotation: String::new(),
            semantic_tag: SemanticTag::None,
            screen_state,
        }
    }

    /// Set the size.
    #[must_use]
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Bounding-box area.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Whether `other`'s bounding box lies entirely within this one (edges inclusive).
    #[must_use]
    pub fn contains(&self, other: &Element) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.x + other.width <= self.x + self.width
            && other.y + other.height <= self.y + self.height
    }

    /// Clone with a fresh id, shifted by `(dx, dy)`.
    #[must_use]
    pub fn duplicate(&self, dx: f64, dy: f64) -> Self {
        Self {
            id: ElementId::new(),
            x: self.x + dx,
            y: self.y + dy,
            ..self.clone()
        }
    }

    /// Apply the present fields of `patch`. Sizes are clamped to [`MIN_ELEMENT_SIZE`].
    pub fn apply(&mut self, patch: &ElementPatch) {
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(x) = patch.x {
            self.x = x;
        }
        if let Some(y) = patch.y {
            self.y = y;
        }
        if let Some(width) = patch.width {
            self.width = width.max(MIN_ELEMENT_SIZE);
        }
        if let Some(height) = patch.height {
            self.height = height.max(MIN_ELEMENT_SIZE);
        }
        if let Some(ref label) = patch.label {
            self.label.clone_from(label);
        }
        if let Some(ref annotation) = patch.annotation {
            self.annotation.clone_from(annotation);
        }
        if let Some(tag) = patch.semantic_tag {
            self.semantic_tag = tag;
        }
        if let Some(state) = patch.screen_state {
            self.screen_state = state;
        }
    }
}

/// Partial update for an [`Element`]; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementPatch {
    /// New kind.
    pub kind: Option<ElementType>,
    /// New left edge.
    pub x: Option<f64>,
    /// New top edge.
    pub y: Option<f64>,
    /// New width.
    pub width: Option<f64>,
    /// New height.
    pub height: Option<f64>,
    /// New label.
    pub label: Option<String>,
    /// New annotation.
    pub annotation: Option<String>,
    /// New semantic tag.
    pub semantic_tag: Option<SemanticTag>,
    /// New screen state.
    pub screen_state: Option<ScreenState>,
}

impl ElementPatch {
    /// Patch that moves an element.
    #[must_use]
    pub fn position(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    /// Patch that resizes an element.
    #[must_use]
    pub fn size(width: f64, height: f64) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Self::default()
        }
    }

    /// Patch that relabels an element.
    #[must_use]
    pub fn label(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::default()
        }
    }

    /// Patch that sets an annotation.
    #[must_use]
    pub fn annotation(annotation: impl Into<String>) -> Self {
        Self {
            annotation: Some(annotation.into()),
            ..Self::default()
        }
    }

    /// Patch that sets a semantic tag.
    #[must_use]
    pub fn semantic_tag(tag: SemanticTag) -> Self {
        Self {
            semantic_tag: Some(tag),
            ..Self::default()
        }
    }

    /// Patch that moves an element to another screen state.
    #[must_use]
    pub fn screen_state(state: ScreenState) -> Self {
        Self {
            screen_state: Some(state),
            ..Self::default()
        }
    }

    /// Whether the patch edits content rather than geometry.
    ///
    /// Content edits are checkpointed individually; geometry edits rely on a
    /// drag checkpoint taken by the caller.
    #[must_use]
    pub fn is_discrete(&self) -> bool {
        self.kind.is_some()
            || self.label.is_some()
            || self.annotation.is_some()
            || self.semantic_tag.is_some()
            || self.screen_state.is_some()
    }
}
