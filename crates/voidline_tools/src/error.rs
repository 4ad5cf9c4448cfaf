//! Error type for the development tools.

use std::path::PathBuf;

use thiserror::Error;
use voidline_core::error::GameError;

/// Result type alias using [`ToolError`].
pub type Result<T> = std::result::Result<T, ToolError>;

/// Errors reported by the tools.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Error from the game core.
    #[error(transparent)]
    Core(#[from] GameError),

    /// Directory could not be listed.
    #[error("Cannot read directory '{path}': {source}")]
    Io {
        /// Directory path.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Refused to overwrite an existing template file.
    #[error("Template file already exists: {0}")]
    AlreadyExists(PathBuf),

    /// Requested template is not loaded.
    #[error("Unknown template '{0}'")]
    UnknownTemplate(String),

    /// One or more template files are invalid.
    #[error("{invalid} of {total} template files failed validation")]
    ValidationFailed {
        /// Number of invalid files.
        invalid: usize,
        /// Number of files checked.
        total: usize,
    },

    /// Report could not be serialized.
    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] ron::Error),
}
