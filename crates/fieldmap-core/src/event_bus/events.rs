//! Event type definitions for the event bus.
//!
//! This module defines all editor events organized by category.
//! Events are designed to be cloneable and serializable for logging/replay.

use serde::{Deserialize, Serialize};

use crate::data::{LatLng, ShapeId, ShapeKind};

/// Root event enum for all editor events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AppEvent {
    /// Shape lifecycle events
    Shape(ShapeEvent),
    /// Selection changes
    Selection(SelectionEvent),
    /// Basemap layer events
    Basemap(BasemapEvent),
    /// Map view events
    View(ViewEvent),
    /// Report export events
    Export(ExportEvent),
    /// User-visible notices
    Notice(Notice),
}

impl AppEvent {
    /// Get the category of this event
    pub fn category(&self) -> EventCategory {
        match self {
            AppEvent::Shape(_) => EventCategory::Shape,
            AppEvent::Selection(_) => EventCategory::Selection,
            AppEvent::Basemap(_) => EventCategory::Basemap,
            AppEvent::View(_) => EventCategory::View,
            AppEvent::Export(_) => EventCategory::Export,
            AppEvent::Notice(_) => EventCategory::Notice,
        }
    }

    /// Get a short description of this event for logging
    pub fn description(&self) -> String {
        match self {
            AppEvent::Shape(e) => e.description(),
            AppEvent::Selection(e) => e.description(),
            AppEvent::Basemap(e) => e.description(),
            AppEvent::View(e) => e.description(),
            AppEvent::Export(e) => e.description(),
            AppEvent::Notice(n) => format!("{}: {}", n.level, n.message),
        }
    }
}

/// Event category for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    /// Shape lifecycle events.
    Shape,
    /// Selection events.
    Selection,
    /// Basemap layer events.
    Basemap,
    /// Map view events.
    View,
    /// Report export events.
    Export,
    /// User-visible notices.
    Notice,
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventCategory::Shape => write!(f, "Shape"),
            EventCategory::Selection => write!(f, "Selection"),
            EventCategory::Basemap => write!(f, "Basemap"),
            EventCategory::View => write!(f, "View"),
            EventCategory::Export => write!(f, "Export"),
            EventCategory::Notice => write!(f, "Notice"),
        }
    }
}

/// Shape lifecycle events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ShapeEvent {
    /// A draw completed and the shape entered the collection.
    Created {
        /// Id assigned to the shape.
        id: ShapeId,
        /// Polygon or line.
        kind: ShapeKind,
    },
    /// Metadata was attached.
    Annotated {
        /// The annotated shape.
        id: ShapeId,
        /// The name that was attached.
        name: String,
        /// Whether the name is the `Block <id>` fallback.
        defaulted: bool,
    },
    /// Color or label changed by a styling command.
    Restyled {
        /// The restyled shape.
        id: ShapeId,
        /// The new color.
        color: String,
    },
    /// Geometry was replaced by an edit and metrics recomputed.
    Edited {
        /// The edited shape.
        id: ShapeId,
    },
    /// Shape was removed from the collection.
    Deleted {
        /// The deleted shape.
        id: ShapeId,
    },
}

impl ShapeEvent {
    fn description(&self) -> String {
        match self {
            ShapeEvent::Created { id, kind } => format!("Created {} {}", kind, id),
            ShapeEvent::Annotated {
                id,
                name,
                defaulted,
            } => {
                if *defaulted {
                    format!("Annotated {} with default name '{}'", id, name)
                } else {
                    format!("Annotated {} as '{}'", id, name)
                }
            }
            ShapeEvent::Restyled { id, color } => format!("Restyled {} to {}", id, color),
            ShapeEvent::Edited { id } => format!("Edited {}", id),
            ShapeEvent::Deleted { id } => format!("Deleted {}", id),
        }
    }
}

/// Selection events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SelectionEvent {
    /// A click toggled selection.
    Toggled {
        /// The clicked shape.
        id: ShapeId,
        /// Selection after the toggle.
        selected: bool,
    },
    /// Every shape was deselected.
    Cleared,
}

impl SelectionEvent {
    fn description(&self) -> String {
        match self {
            SelectionEvent::Toggled { id, selected } => {
                format!(
                    "{} {}",
                    id,
                    if *selected { "selected" } else { "deselected" }
                )
            }
            SelectionEvent::Cleared => "Selection cleared".to_string(),
        }
    }
}

/// Basemap layer events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum BasemapEvent {
    /// Tile layer attached to the view.
    Attached {
        /// Name of the active tile source.
        source: String,
    },
    /// Tile layer detached from the view.
    Detached {
        /// Name of the active tile source.
        source: String,
    },
    /// Active tile source switched.
    SourceChanged {
        /// Name of the new tile source.
        source: String,
    },
}

impl BasemapEvent {
    fn description(&self) -> String {
        match self {
            BasemapEvent::Attached { source } => format!("Basemap {} attached", source),
            BasemapEvent::Detached { source } => format!("Basemap {} detached", source),
            BasemapEvent::SourceChanged { source } => format!("Basemap switched to {}", source),
        }
    }
}

/// Map view events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ViewEvent {
    /// View recentered.
    Recentered {
        /// New center.
        center: LatLng,
        /// New zoom level.
        zoom: u8,
    },
}

impl ViewEvent {
    fn description(&self) -> String {
        match self {
            ViewEvent::Recentered { center, zoom } => {
                format!("View centered at ({}) zoom {}", center, zoom)
            }
        }
    }
}

/// Report export events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ExportEvent {
    /// Export started.
    Started {
        /// Block the report is for.
        block_name: String,
    },
    /// Export finished and the document was delivered.
    Completed {
        /// Where the document ended up (path or URL).
        location: String,
    },
    /// Export failed.
    Failed {
        /// Error message.
        reason: String,
    },
}

impl ExportEvent {
    fn description(&self) -> String {
        match self {
            ExportEvent::Started { block_name } => format!("Export started for {}", block_name),
            ExportEvent::Completed { location } => format!("Export saved to {}", location),
            ExportEvent::Failed { reason } => format!("Export failed: {}", reason),
        }
    }
}

/// Severity of a user-visible notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeLevel {
    /// Informational, e.g. the computed area after a draw.
    Info,
    /// Something fell back to a default.
    Warning,
    /// An operation failed.
    Error,
}

impl std::fmt::Display for NoticeLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NoticeLevel::Info => write!(f, "Info"),
            NoticeLevel::Warning => write!(f, "Warning"),
            NoticeLevel::Error => write!(f, "Error"),
        }
    }
}

/// A message the host should show to the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    /// Severity.
    pub level: NoticeLevel,
    /// Text to display.
    pub message: String,
}

impl Notice {
    /// Informational notice
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    /// Warning notice
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    /// Error notice
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}
