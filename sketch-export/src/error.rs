//! Export error types.

use thiserror::Error;

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Errors that can occur while preparing an export.
///
/// Rendering itself never fails; only caller input is validated.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExportError {
    /// The requested target profile is not supported.
    #[error("Unknown export target: {0} (expected react-tailwind, html-css, or nextjs)")]
    UnknownTarget(String),
}
