//! Error types for layout planning and manual generation.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for layout operations.
pub type LayoutResult<T> = Result<T, LayoutError>;

/// Fatal errors that abort a layout run.
///
/// Degenerate geometry never shows up here: zero-length arrows, flat parts and
/// unframeable views are recovered locally and only logged.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// The part list is empty, so there is nothing to assemble.
    #[error("Cannot lay out an assembly with no parts")]
    EmptyPartList,

    /// The scene host could not import the model.
    #[error("Failed to import model '{path}': {source}")]
    ModelImport {
        /// The model file that was requested.
        path: PathBuf,
        /// The scene host's failure.
        #[source]
        source: SceneError,
    },

    /// A configuration value is out of range.
    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidConfig {
        /// Dotted path of the offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// A configuration document could not be parsed.
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[source] serde_json::Error),

    /// The manifest could not be serialized.
    #[error("Failed to serialize manifest: {0}")]
    Serialize(#[source] serde_json::Error),

    /// I/O error during file operations.
    #[error("I/O error at '{path}': {source}")]
    Io {
        /// The path where the error occurred.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Failures reported by a [`Scene`](crate::Scene) implementation.
#[derive(Debug, Error)]
pub enum SceneError {
    /// The model file could not be read or decomposed into parts.
    #[error("import failed: {0}")]
    Import(String),

    /// A mesh, material or other backend resource could not be created.
    #[error("resource creation failed: {0}")]
    Resource(String),

    /// The backend failed to produce an image.
    #[error("render to '{path}' failed: {reason}")]
    Render {
        /// Requested output file.
        path: PathBuf,
        /// Backend-specific description.
        reason: String,
    },

    /// The scene has no object for the given part id.
    #[error("no scene object for part '{0}'")]
    UnknownPart(String),
}
