//! Error types for the game core.

use thiserror::Error;

use crate::component::ComponentType;

/// Result type alias using [`GameError`].
pub type Result<T> = std::result::Result<T, GameError>;

/// Top-level error type for all game core errors.
///
/// Pool exhaustion is deliberately absent: allocation in a frame never
/// fails, it evicts or drops with a log line instead.
#[derive(Debug, Error)]
pub enum GameError {
    /// Component type ordinal outside the known range.
    #[error("Invalid component type ordinal: {0}")]
    InvalidComponentType(usize),

    /// Component type known but no constructor registered for it.
    #[error("No constructor registered for component type {0}")]
    ComponentNotRegistered(ComponentType),

    /// Component type name not known to the factory.
    #[error("Unknown component type name: '{0}'")]
    UnknownComponentName(String),

    /// Two components of different concrete types were paired.
    #[error("Component type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// Type of the receiving component.
        expected: ComponentType,
        /// Type of the offered component.
        found: ComponentType,
    },

    /// A required field is absent from a component document.
    #[error("Component {component} is missing required field '{field}'")]
    MissingField {
        /// Component being read.
        component: ComponentType,
        /// Name of the absent field.
        field: String,
    },

    /// A field is present but holds the wrong kind of value.
    #[error("Component {component} field '{field}' is not a {expected}")]
    InvalidField {
        /// Component being read.
        component: ComponentType,
        /// Name of the malformed field.
        field: String,
        /// Expected value kind.
        expected: &'static str,
    },

    /// Document schema version is newer than this build understands.
    #[error("Component {component} version {found} is newer than supported version {supported}")]
    UnsupportedVersion {
        /// Component being read.
        component: ComponentType,
        /// Version found in the document.
        found: u32,
        /// Highest version this build reads.
        supported: u32,
    },

    /// No template registered under this name.
    #[error("Template not found: '{0}'")]
    TemplateNotFound(String),

    /// Failed to read or write a template file.
    #[error("Template IO failed for '{path}': {source}")]
    TemplateIo {
        /// Path to the template file or directory.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse a template file.
    #[error("Failed to parse template '{path}': {source}")]
    TemplateParse {
        /// Path to the template file.
        path: String,
        /// Underlying parse error.
        #[source]
        source: ron::error::SpannedError,
    },

    /// Failed to serialize a template document.
    #[error("Failed to serialize template: {0}")]
    TemplateSerialize(#[from] ron::Error),

    /// Caller broke an argument contract.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Engine configuration could not be loaded or is inconsistent.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}
