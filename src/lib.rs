//! # Fieldmap
//!
//! A headless editor for farm field maps:
//! - Field boundaries (polygons) and drainage lines (polylines) in lat/lng
//! - Geodesic area, perimeter, length and centroid for every shape
//! - Name, color, label and crop dates attached through an annotation workflow
//! - JSON commands from an embedding host, acknowledged one by one
//! - PDF reports of the current view, downloaded or uploaded
//!
//! ## Architecture
//!
//! Fieldmap is organized as a workspace with multiple crates:
//!
//! 1. **fieldmap-core** - Coordinates, errors, units, event bus
//! 2. **fieldmap-designer** - Shapes, metrics, workflow, host commands, GeoJSON
//! 3. **fieldmap-report** - Rasterization, PDF packaging, storage
//! 4. **fieldmap-settings** - Configuration file
//! 5. **fieldmap** - This crate: logging setup and the command line

pub mod cli;

pub use fieldmap_core::{
    AppEvent, CommandError, EditorError, Error, EventBus, ExportError, GeometryError, LatLng,
    LookupError, Notice, NoticeLevel, Result, ShapeId, ShapeKind,
};

pub use fieldmap_designer::{
    resolve_initial_view, ActionOutcome, EditorAction, EditorOptions, EditorSession,
    EditorState, HostCommand, HostResponse, MapFeature, MetadataInput, MetadataPrompt, Shape,
    ShapeMetrics, ShapeState,
};

pub use fieldmap_report::{
    ExportOptions, ExportRequest, ExportTarget, JsonlReportTable, LocalReportStorage,
    ReportExporter, ShapeRasterizer,
};

pub use fieldmap_settings::Config;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Pretty console output on stderr
/// - RUST_LOG environment variable support, `info` otherwise
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {}", e))?;

    Ok(())
}
