//! # Fieldmap Report
//!
//! Exports the editor view as a one-page PDF. The editor's tile layer is
//! detached for the capture and restored afterwards; the document is either
//! written to a local directory or uploaded through [`ReportStorage`] with a
//! metadata row recorded through [`ReportTable`].
//!
//! ```rust,ignore
//! let exporter = ReportExporter::new(editor, Arc::new(ShapeRasterizer::default()), ExportOptions::default());
//! let outcome = exporter
//!     .export(&ExportRequest::new(farm_id, "Block 1"), &ExportTarget::Download { dir })
//!     .await?;
//! ```

pub mod exporter;
pub mod pdf;
pub mod projection;
pub mod raster;
pub mod storage;

pub use exporter::{
    ExportFailure, ExportOptions, ExportOutcome, ExportRequest, ExportTarget, ReportExporter,
};
pub use pdf::{build_report_pdf, ReportPage};
pub use projection::Projection;
pub use raster::{parse_css_color, Rasterizer, ShapeRasterizer};
pub use storage::{
    report_path, sanitize_segment, JsonlReportTable, LocalReportStorage, ReportRecord,
    ReportStorage, ReportTable,
};
