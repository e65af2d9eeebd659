//! Store configuration.

use std::time::Duration;

use crate::history::DEFAULT_UNDO_LIMIT;
use crate::snap::GRID_SIZE;

/// Quiet period before a pending project write is flushed.
pub const DEFAULT_SAVE_DEBOUNCE: Duration = Duration::from_millis(800);

/// How long the "saved" status lingers before reverting to idle.
pub const DEFAULT_SAVED_LINGER: Duration = Duration::from_millis(1500);

/// Tunables for a [`ProjectStore`](crate::store::ProjectStore).
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    /// Maximum undo depth.
    pub undo_limit: usize,
    /// Snap grid unit.
    pub grid_size: f64,
    /// Whether snapping starts enabled.
    pub snap_enabled: bool,
    /// Persistence debounce window.
    pub save_debounce: Duration,
    /// Saved-status linger.
    pub saved_linger: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            undo_limit: DEFAULT_UNDO_LIMIT,
            grid_size: GRID_SIZE,
            snap_enabled: true,
            save_debounce: DEFAULT_SAVE_DEBOUNCE,
            saved_linger: DEFAULT_SAVED_LINGER,
        }
    }
}

impl StoreConfig {
    /// Set whether snapping starts enabled.
    #[must_use]
    pub fn with_snap(mut self, enabled: bool) -> Self {
        self.snap_enabled = enabled;
        self
    }

    /// Set the undo depth.
    #[must_use]
    pub fn with_undo_limit(mut self, limit: usize) -> Self {
        self.undo_limit = limit;
        self
    }

    /// Set the persistence debounce window.
    #[must_use]
    pub fn with_save_debounce(mut self, debounce: Duration) -> Self {
        self.save_debounce = debounce;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StoreConfig::default();
        assert_eq!(config.undo_limit, 50);
        assert!((config.grid_size - 8.0).abs() < f64::EPSILON);
        assert!(config.snap_enabled);
        assert_eq!(config.save_debounce, Duration::from_millis(800));
        assert_eq!(config.saved_linger, Duration::from_millis(1500));
    }

    #[test]
    fn test_builders() {
        let config = StoreConfig::default()
            .with_snap(false)
            .with_undo_limit(3)
            .with_save_debounce(Duration::ZERO);
        assert!(!config.snap_enabled);
        assert_eq!(config.undo_limit, 3);
        assert_eq!(config.save_debounce, Duration::ZERO);
    }
}
