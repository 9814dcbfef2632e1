//! Error handling for Fieldmap
//!
//! Provides error types for all layers of the editor:
//! - Geometry errors (shape construction and GeoJSON import)
//! - Editor errors (shape lookup and workflow transitions)
//! - Command errors (inbound host messages)
//! - Export errors (rasterization, PDF packaging and upload)
//! - Lookup errors (farm location queries)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

use crate::data::{ShapeId, ShapeKind};

/// Geometry error type
///
/// Raised when coordinates cannot form a shape at all. Degenerate but
/// well-formed shapes are not errors; metric derivation reports those as
/// warnings instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// No coordinates were supplied
    #[error("{kind} has no coordinates")]
    Empty {
        /// The kind of shape being built.
        kind: ShapeKind,
    },

    /// A coordinate is not a usable latitude/longitude pair
    #[error("Invalid coordinate at index {index}: ({lat}, {lng})")]
    InvalidCoordinate {
        /// Position of the offending coordinate.
        index: usize,
        /// The latitude as received.
        lat: f64,
        /// The longitude as received.
        lng: f64,
    },

    /// The geometry type has no shape counterpart
    #[error("Unsupported geometry type: {geometry_type}")]
    UnsupportedGeometry {
        /// The GeoJSON geometry type name.
        geometry_type: String,
    },

    /// A GeoJSON position has fewer than two ordinates
    #[error("Malformed position: {reason}")]
    MalformedPosition {
        /// What was wrong with the position.
        reason: String,
    },

    /// The text is not a GeoJSON document at all
    #[error("Malformed GeoJSON document: {reason}")]
    MalformedDocument {
        /// The parser's complaint.
        reason: String,
    },
}

/// Editor error type
///
/// Represents errors related to the shape collection and the annotation
/// workflow state machine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditorError {
    /// Shape does not exist (never created or already deleted)
    #[error("Shape {id} not found")]
    ShapeNotFound {
        /// The requested shape id.
        id: ShapeId,
    },

    /// The workflow does not allow this action in the current state
    #[error("Shape {id}: cannot {action} while {state}")]
    InvalidTransition {
        /// The shape the action targeted.
        id: ShapeId,
        /// The current workflow state name.
        state: String,
        /// The rejected action name.
        action: String,
    },

    /// The draw tool for this kind of shape is disabled
    #[error("Drawing {kind} shapes is disabled")]
    ToolDisabled {
        /// The kind of shape that was drawn.
        kind: ShapeKind,
    },

    /// Editing or removal through the edit toolbar is disabled
    #[error("Edit tool '{tool}' is disabled")]
    EditDisabled {
        /// The edit tool name.
        tool: String,
    },

    /// Shape geometry was rejected
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// Command error type
///
/// Represents errors decoding or applying inbound host messages.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommandError {
    /// Message is not valid JSON or misses required fields
    #[error("Malformed message: {reason}")]
    Malformed {
        /// The decoder's explanation.
        reason: String,
    },

    /// Message type is not one the editor understands
    #[error("Unknown message type: {message_type}")]
    UnknownType {
        /// The received `type` field.
        message_type: String,
    },

    /// Color string is empty or unusable
    #[error("Invalid color: {color:?}")]
    InvalidColor {
        /// The received color.
        color: String,
    },

    /// Location outside the valid latitude/longitude range
    #[error("Invalid location: ({latitude}, {longitude})")]
    InvalidLocation {
        /// The received latitude.
        latitude: f64,
        /// The received longitude.
        longitude: f64,
    },

    /// Applying the command failed in the editor
    #[error(transparent)]
    Editor(#[from] EditorError),
}

/// Export error type
///
/// Represents failures of the report export pipeline.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExportError {
    /// Another export has not finished yet
    #[error("An export is already in progress")]
    AlreadyInProgress,

    /// Rasterizing the view failed
    #[error("Rasterization failed: {reason}")]
    Rasterization {
        /// The reason rasterization failed.
        reason: String,
    },

    /// Packaging the image into a document failed
    #[error("PDF encoding failed: {reason}")]
    Encoding {
        /// The reason encoding failed.
        reason: String,
    },

    /// Uploading the document failed
    #[error("Upload of {path} failed: {reason}")]
    Upload {
        /// The storage path the document was destined for.
        path: String,
        /// The reason the upload failed.
        reason: String,
    },

    /// Recording the metadata row failed
    #[error("Recording report metadata failed: {reason}")]
    Record {
        /// The reason the insert failed.
        reason: String,
    },

    /// Writing the local download failed
    #[error("Saving report to {path} failed: {reason}")]
    Save {
        /// The destination path.
        path: String,
        /// The reason the write failed.
        reason: String,
    },
}

/// Lookup error type
///
/// Represents failures to resolve a farm record into a map location.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LookupError {
    /// No farm record with this id
    #[error("Farm {farm_id} not found")]
    NotFound {
        /// The requested farm id.
        farm_id: String,
    },

    /// Farm record exists but has no usable coordinates
    #[error("Farm {farm_id} has no location")]
    MissingLocation {
        /// The requested farm id.
        farm_id: String,
    },

    /// The backing store could not be queried
    #[error("Farm lookup failed: {reason}")]
    Backend {
        /// The reason the query failed.
        reason: String,
    },
}

/// Main error type for Fieldmap
///
/// A unified error type that can represent any error from all layers.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Geometry error
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// Editor error
    #[error(transparent)]
    Editor(#[from] EditorError),

    /// Command error
    #[error(transparent)]
    Command(#[from] CommandError),

    /// Export error
    #[error(transparent)]
    Export(#[from] ExportError),

    /// Lookup error
    #[error(transparent)]
    Lookup(#[from] LookupError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is an export error
    pub fn is_export_error(&self) -> bool {
        matches!(self, Error::Export(_))
    }

    /// Check if this is a lookup error
    pub fn is_lookup_error(&self) -> bool {
        matches!(self, Error::Lookup(_))
    }

    /// Check if this is an editor error
    pub fn is_editor_error(&self) -> bool {
        matches!(self, Error::Editor(_))
    }

    /// Check if this is a command error
    pub fn is_command_error(&self) -> bool {
        matches!(self, Error::Command(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EditorError::ShapeNotFound { id: ShapeId(7) };
        assert_eq!(err.to_string(), "Shape #7 not found");

        let err = EditorError::InvalidTransition {
            id: ShapeId(3),
            state: "Drafting".to_string(),
            action: "toggle selection".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Shape #3: cannot toggle selection while Drafting"
        );

        let err = CommandError::UnknownType {
            message_type: "zoomIn".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown message type: zoomIn");
    }

    #[test]
    fn test_error_conversion() {
        let err: Error = ExportError::AlreadyInProgress.into();
        assert!(err.is_export_error());

        let err: Error = LookupError::NotFound {
            farm_id: "abc".to_string(),
        }
        .into();
        assert!(err.is_lookup_error());

        let cmd: CommandError = EditorError::ShapeNotFound { id: ShapeId(1) }.into();
        assert!(matches!(cmd, CommandError::Editor(_)));
    }
}
