//! # Fieldmap Designer
//!
//! Shape editing for farm field maps: drawn polygons and lines, their
//! geodesic metrics, the annotation workflow, selection styling, the
//! basemap layer and the commands an embedding host sends.
//!
//! ## Core Components
//!
//! - **Model**: immutable [`Shape`]s in geographic coordinates
//! - **Metrics**: geodesic area, perimeter/length and centroid
//! - **Workflow**: `Drafting` → `AwaitingInput` → `Annotated` → `Deleted`
//! - **Presentation**: popup HTML, tooltip, floating label and path style
//! - **Host commands**: JSON messages in, acknowledgements out
//! - **GeoJSON**: feature export and import
//!
//! ## Architecture
//!
//! ```text
//! EditorSession (async, shared)
//!   └── EditorState (dispatch)
//!         ├── MapFeature (Shape + ShapeMetrics + ShapeState + Annotation)
//!         ├── Basemap (tile layer)
//!         ├── MapView (center/zoom)
//!         └── EventBus (notices and change events)
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use fieldmap_designer::{EditorAction, EditorState};
//! use fieldmap_core::{LatLng, ShapeKind};
//!
//! let mut editor = EditorState::new();
//! editor.dispatch(EditorAction::DrawCompleted {
//!     kind: ShapeKind::Polygon,
//!     coords: vec![
//!         LatLng::new(-23.5, -46.6),
//!         LatLng::new(-23.5, -46.599),
//!         LatLng::new(-23.501, -46.599),
//!     ],
//! })?;
//! let ack = editor.handle_host_message(r#"{"type":"toggleBaseMap"}"#);
//! ```

pub mod annotation;
pub mod basemap;
pub mod editor_state;
pub mod geojson_io;
pub mod host;
pub mod metrics;
pub mod model;
pub mod popup;
pub mod prompt;
pub mod scene;
pub mod session;
pub mod style;
pub mod tools;
pub mod view;
pub mod workflow;

pub use annotation::{Annotation, FieldDates, MetadataInput, Palette, DEFAULT_PALETTE};
pub use basemap::{Basemap, BasemapKind, TileSource};
pub use editor_state::{
    ActionOutcome, EditorAction, EditorOptions, EditorState, ImportReport, MapFeature,
};
pub use host::{HostCommand, HostResponse};
pub use metrics::{MetricWarning, ShapeMetrics};
pub use model::Shape;
pub use popup::FloatingLabel;
pub use prompt::{DismissingPrompt, FixedPrompt, MetadataPrompt, MetadataRequest};
pub use scene::{Scene, SceneShape};
pub use session::EditorSession;
pub use style::ShapeStyle;
pub use tools::DrawSettings;
pub use view::{
    resolve_initial_view, FarmLocator, InitialView, MapView, StaticFarmLocator, ViewDefaults,
};
pub use workflow::ShapeState;
