//! Error types for core operations.

use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can surface from the core.
///
/// Store commands swallow precondition failures; only import and the
/// persistence boundary report errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Project JSON could not be parsed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Imported data is structurally unsalvageable.
    #[error("Invalid import: {0}")]
    InvalidImport(String),

    /// The persistence medium failed.
    #[error("Storage error: {0}")]
    Storage(#[from] crate::persist::StorageError),

    /// A requested project is not in storage.
    #[error("Project not found: {0}")]
    ProjectNotFound(String),
}
