//! # Undo / Redo history
//!
//! Bounded linear history of project content.
//!
//! ```text
//! 1. Before a checkpointed command mutates: push the current content
//! 2. Undo: pop the newest entry, push the current content onto redo
//! 3. Redo: the mirror image
//! 4. Any new checkpoint clears redo (no branching)
//! ```
//!
//! Entries own deep copies of screens and arrows, so later mutation of the
//! live project never reaches into history.

use std::collections::VecDeque;

use crate::project::{FlowArrow, Project, Screen};

/// Default maximum number of undo steps.
pub const DEFAULT_UNDO_LIMIT: usize = 50;

/// The undoable part of a project.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    /// Screens, including all elements.
    pub screens: Vec<Screen>,
    /// Navigation arrows.
    pub arrows: Vec<FlowArrow>,
}

impl HistoryEntry {
    /// Capture a deep copy of the project's content.
    #[must_use]
    pub fn capture(project: &Project) -> Self {
        Self {
            screens: project.screens.clone(),
            arrows: project.arrows.clone(),
        }
    }

    /// Write this content back into `project`, leaving metadata untouched.
    pub fn restore_into(self, project: &mut Project) {
        project.screens = self.screens;
        project.arrows = self.arrows;
    }
}

/// Undo and redo stacks with FIFO eviction at capacity.
#[derive(Debug, Clone)]
pub struct UndoHistory {
    undo: VecDeque<HistoryEntry>,
    redo: Vec<HistoryEntry>,
    limit: usize,
}

impl Default for UndoHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl UndoHistory {
    /// Create an empty history with the default depth.
    #[must_use]
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_UNDO_LIMIT)
    }

    /// Create an empty history holding at most `limit` undo steps.
    #[must_use]
    pub fn with_limit(limit: usize) -> Self {
        Self {
            undo: VecDeque::with_capacity(limit.min(DEFAULT_UNDO_LIMIT)),
            redo: Vec::new(),
            limit: limit.max(1),
        }
    }

    /// Record the pre-mutation content and invalidate redo.
    pub fn checkpoint(&mut self, entry: HistoryEntry) {
        self.undo.push_back(entry);
        while self.undo.len() > self.limit {
            self.undo.pop_front();
        }
        self.redo.clear();
    }

    /// Step back: returns the content to restore, stashing `current` for redo.
    pub fn undo(&mut self, current: HistoryEntry) -> Option<HistoryEntry> {
        let previous = self.undo.pop_back()?;
        self.redo.push(current);
        Some(previous)
    }

    /// Step forward: returns the content to restore, stashing `current` for undo.
    pub fn redo(&mut self, current: HistoryEntry) -> Option<HistoryEntry> {
        let next = self.redo.pop()?;
        self.undo.push_back(current);
        while self.undo.len() > self.limit {
            self.undo.pop_front();
        }
        Some(next)
    }

    /// Whether an undo step is available.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    /// Whether a redo step is available.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Number of undo steps held.
    #[must_use]
    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    /// Drop all history.
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}
