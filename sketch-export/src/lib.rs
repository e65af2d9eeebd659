//! # SketchFlow Export
//!
//! Turns a project into a Markdown blueprint for code generators.
//!
//! ## Pipeline
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────────────┐
//! │ Screen state │──▶│ Layout tree  │──▶│ ASCII glyphs         │
//! │ elements     │   │ (containment)│   │ Inventory, JSON tree │
//! └──────────────┘   └──────────────┘   └──────────┬───────────┘
//!                                                  ▼
//!                    ┌─────────────────────────────────────────┐
//!                    │ Blueprint: header, breakpoints, screens, │
//!                    │ navigation, notes, target instructions   │
//!                    └─────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use sketch_core::Project;
//! use sketch_export::{generate_blueprint, ExportTarget};
//!
//! let project = Project::new();
//! let text = generate_blueprint(&project, ExportTarget::HtmlCss);
//! assert!(text.starts_with("# Untitled Project — UI Blueprint"));
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod blueprint;
pub mod error;
pub mod glyph;
pub mod layout;
pub mod target;

pub use blueprint::generate_blueprint;
pub use error::{ExportError, ExportResult};
pub use glyph::{render_forest, type_label};
pub use layout::{build_layout_tree, layout_for_state, LayoutNode};
pub use target::ExportTarget;

/// Export library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
