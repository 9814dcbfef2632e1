//! # Fieldmap Core
//!
//! Core types, errors, unit conversions and the event bus shared by every
//! Fieldmap crate. Nothing in here knows about shapes being edited or reports
//! being exported; those live in `fieldmap-designer` and `fieldmap-report`.

pub mod data;
pub mod error;
pub mod event_bus;
pub mod types;
pub mod units;

pub use data::{LatLng, ShapeId, ShapeKind};

pub use error::{
    CommandError, EditorError, Error, ExportError, GeometryError, LookupError, Result,
};

// Re-export event bus for convenience
pub use event_bus::{
    AppEvent, BasemapEvent, EventBus, EventBusConfig, EventCategory, EventFilter, ExportEvent,
    Notice, NoticeLevel, SelectionEvent, ShapeEvent, SubscriptionId, ViewEvent,
};

pub use types::{thread_safe, DataCallback, ThreadSafe};

pub use units::{AreaUnit, ACRES_PER_HECTARE, SQ_METERS_PER_HECTARE};
