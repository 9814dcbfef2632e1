//! Command line front end.
//!
//! `fieldmap <FEATURES> [--farm <ID>] [--block <NAME>] [--out <DIR>] [--config <FILE>]`
//!
//! Imports the features into a fresh editor, logs their metrics and writes
//! a PDF report of the result.

use anyhow::{bail, Context};
use clap::Parser;
use fieldmap_core::units::{format_area, format_length_km};
use fieldmap_core::{AreaUnit, EventBus, ShapeKind};
use fieldmap_designer::EditorState;
use fieldmap_report::{ExportOptions, ExportRequest, ExportTarget, ReportExporter, ShapeRasterizer};
use fieldmap_settings::Config;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Farm id used when none is given
pub const DEFAULT_FARM_ID: &str = "local";

/// Import field boundaries and drainage lines, then write a PDF report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Parser)]
#[command(
    name = "fieldmap",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("BUILD_DATE"), ")")
)]
pub struct CliArgs {
    /// GeoJSON file with polygon and line features.
    #[arg(value_name = "FEATURES")]
    pub input: PathBuf,
    /// Farm the report is filed under.
    #[arg(long = "farm", value_name = "ID")]
    pub farm_id: Option<String>,
    /// Block name printed in the report title.
    #[arg(long = "block", value_name = "NAME")]
    pub block_name: Option<String>,
    /// Directory for the PDF (defaults to the configured output directory).
    #[arg(long = "out", value_name = "DIR")]
    pub out_dir: Option<PathBuf>,
    /// JSON or TOML config file (defaults to the platform config file).
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Result of a run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub imported: usize,
    pub skipped: usize,
    pub report: PathBuf,
}

/// Imports, measures and exports.
pub async fn run(args: &CliArgs) -> anyhow::Result<RunSummary> {
    let config = match &args.config {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::load_or_default().context("loading default config")?,
    };

    let text = tokio::fs::read_to_string(&args.input)
        .await
        .with_context(|| format!("reading {}", args.input.display()))?;

    let mut editor = EditorState::with_options(config.editor_options(), Arc::new(EventBus::new()));
    let report = editor
        .import_geojson(&text)
        .with_context(|| format!("importing {}", args.input.display()))?;
    for skipped in &report.skipped {
        warn!("Skipped feature: {}", skipped);
    }
    if report.imported.is_empty() {
        bail!("{} contains no polygon or line features", args.input.display());
    }

    for feature in editor.features() {
        let name = feature
            .annotation
            .as_ref()
            .map(|a| a.name.as_str())
            .unwrap_or_default();
        let m = &feature.metrics;
        match feature.kind() {
            ShapeKind::Polygon => info!(
                "{} {}: {} ({}), perimeter {}",
                feature.id(),
                name,
                format_area(m.area_sq_meters, AreaUnit::Hectares),
                format_area(m.area_sq_meters, AreaUnit::Acres),
                format_length_km(m.length_km)
            ),
            ShapeKind::Line => info!(
                "{} {}: {}",
                feature.id(),
                name,
                format_length_km(m.length_km)
            ),
        }
        for warning in &m.warnings {
            warn!("{} {}: {}", feature.id(), name, warning);
        }
    }

    let block_name = args.block_name.clone().unwrap_or_else(|| {
        editor
            .features()
            .find_map(|f| f.annotation.as_ref().map(|a| a.name.clone()))
            .unwrap_or_else(|| "Report".to_string())
    });
    let farm_id = args
        .farm_id
        .clone()
        .unwrap_or_else(|| DEFAULT_FARM_ID.to_string());
    let dir = args
        .out_dir
        .clone()
        .unwrap_or_else(|| config.export.output_dir.clone());

    let exporter = ReportExporter::new(
        fieldmap_core::thread_safe(editor),
        Arc::new(ShapeRasterizer::new(
            config.export.image_width,
            config.export.image_height,
        )),
        ExportOptions {
            settle_delay: config.export.settle_delay(),
            report_root: config.export.report_root.clone(),
        },
    );
    let outcome = exporter
        .export(
            &ExportRequest::new(farm_id, block_name),
            &ExportTarget::Download { dir },
        )
        .await
        .context("exporting report")?;

    Ok(RunSummary {
        imported: report.imported.len(),
        skipped: report.skipped.len(),
        report: PathBuf::from(outcome.location),
    })
}
