//! # SketchFlow Core
//!
//! Project model and command engine for a multi-screen wireframing tool.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                 sketch-core                 │
//! ├─────────────────────────────────────────────┤
//! │  Model           │  ProjectStore            │
//! │  - Elements      │  - Commands              │
//! │  - Screens       │  - Undo / redo           │
//! │  - Arrows        │  - Selection, clipboard  │
//! │  - Versions      │  - Snapshot publishing   │
//! ├─────────────────────────────────────────────┤
//! │  Persistence     │  Sanitizer               │
//! │  - Storage trait │  - Load / import repair  │
//! │  - Index, legacy │  - Import validation     │
//! │  - Debounced I/O │                          │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use sketch_core::{ElementType, ProjectStore};
//!
//! let mut store = ProjectStore::in_memory();
//! let id = store.add_element(ElementType::Cta, 100.0, 100.0, false).unwrap();
//!
//! let snapshot = store.snapshot();
//! assert_eq!(snapshot.selected_element_id(), Some(&id));
//! assert!(snapshot.can_undo);
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod element;
pub mod error;
pub mod history;
pub mod id;
pub mod persist;
pub mod project;
pub mod sanitize;
pub mod scaffold;
pub mod snap;
pub mod state;
pub mod store;

pub use config::StoreConfig;
pub use element::{
    Element, ElementPatch, ElementType, ScreenState, SemanticTag, MIN_ELEMENT_SIZE,
};
pub use error::{CoreError, CoreResult};
pub use history::{HistoryEntry, UndoHistory};
pub use id::{ArrowId, ElementId, ProjectId, ScreenId, VersionId};
pub use persist::{
    DebouncedSaver, FsStorage, IndexEntry, MemoryStorage, ProjectRepository, Storage,
    StorageError,
};
pub use project::{DeviceType, FlowArrow, Project, Screen, VersionSnapshot};
pub use sanitize::{sanitize_project, validate_import};
pub use scaffold::{parse_screens_from_goal, screen_goal_fragments};
pub use snap::{snap, GRID_SIZE};
pub use state::{SaveStatus, StoreSnapshot, Tool, ViewMode};
pub use store::ProjectStore;

/// Core library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
