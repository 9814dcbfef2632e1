//! Report export pipeline.
//!
//! ```text
//! begin_export (detach tiles) -> settle delay -> scene snapshot
//!   -> rasterize -> PDF -> download | upload + record
//!   -> finish_export (reattach tiles, always)
//! ```

use fieldmap_core::{
    AppEvent, EventBus, ExportError, ExportEvent, Notice, ThreadSafe,
};
use fieldmap_designer::{EditorState, Scene};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

use crate::pdf::{build_report_pdf, ReportPage};
use crate::raster::Rasterizer;
use crate::storage::{report_path, sanitize_segment, ReportRecord, ReportStorage, ReportTable};

/// Export tuning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// Wait after detaching the tile layer before capturing
    pub settle_delay: Duration,
    /// Storage prefix for uploads
    pub report_root: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_millis(500),
            report_root: "reports".to_string(),
        }
    }
}

/// What the report is about
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    pub farm_id: String,
    pub block_name: String,
}

impl ExportRequest {
    pub fn new(farm_id: impl Into<String>, block_name: impl Into<String>) -> Self {
        Self {
            farm_id: farm_id.into(),
            block_name: block_name.into(),
        }
    }
}

/// Where the finished document goes
#[derive(Clone)]
pub enum ExportTarget {
    /// Write the file into a local directory
    Download { dir: PathBuf },
    /// Store remotely and record a metadata row
    Upload {
        storage: Arc<dyn ReportStorage>,
        table: Arc<dyn ReportTable>,
    },
}

impl std::fmt::Debug for ExportTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportTarget::Download { dir } => {
                f.debug_struct("Download").field("dir", dir).finish()
            }
            ExportTarget::Upload { .. } => f.write_str("Upload"),
        }
    }
}

/// A delivered report
#[derive(Debug, Clone)]
pub struct ExportOutcome {
    /// Local path or storage URL
    pub location: String,
    pub document: Vec<u8>,
    /// Present for uploads
    pub record: Option<ReportRecord>,
}

/// A failed export, with the document when it was generated before the
/// failure so the caller can retry delivery.
#[derive(Debug, Clone, Error)]
#[error("{error}")]
pub struct ExportFailure {
    pub error: ExportError,
    pub document: Option<Vec<u8>>,
}

impl From<ExportError> for ExportFailure {
    fn from(error: ExportError) -> Self {
        Self {
            error,
            document: None,
        }
    }
}

/// Ends the editor-side export when dropped, so the tile layer comes back
/// on every exit path.
struct ExportGuard {
    editor: ThreadSafe<EditorState>,
}

impl Drop for ExportGuard {
    fn drop(&mut self) {
        self.editor.lock().finish_export();
    }
}

/// Captures the editor view into PDF reports
#[derive(Clone)]
pub struct ReportExporter {
    editor: ThreadSafe<EditorState>,
    rasterizer: Arc<dyn Rasterizer>,
    options: ExportOptions,
    bus: Arc<EventBus>,
}

impl ReportExporter {
    pub fn new(
        editor: ThreadSafe<EditorState>,
        rasterizer: Arc<dyn Rasterizer>,
        options: ExportOptions,
    ) -> Self {
        let bus = editor.lock().bus().clone();
        Self {
            editor,
            rasterizer,
            options,
            bus,
        }
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Runs one export end to end.
    pub async fn export(
        &self,
        request: &ExportRequest,
        target: &ExportTarget,
    ) -> Result<ExportOutcome, ExportFailure> {
        let begun = self.editor.lock().begin_export();
        if let Err(e) = begun {
            warn!("Export for {} rejected: {}", request.block_name, e);
            self.bus.notify(Notice::warning(e.to_string()));
            return Err(e.into());
        }
        let _guard = ExportGuard {
            editor: self.editor.clone(),
        };

        info!(
            "Exporting report for block '{}' of farm {}",
            request.block_name, request.farm_id
        );
        self.bus
            .publish(AppEvent::Export(ExportEvent::Started {
                block_name: request.block_name.clone(),
            }))
            .ok();

        match self.run(request, target).await {
            Ok(outcome) => {
                info!("Report saved to {}", outcome.location);
                self.bus
                    .publish(AppEvent::Export(ExportEvent::Completed {
                        location: outcome.location.clone(),
                    }))
                    .ok();
                Ok(outcome)
            }
            Err(failure) => {
                self.bus
                    .notify(Notice::error(format!("Erro ao exportar PDF: {}", failure.error)));
                self.bus
                    .publish(AppEvent::Export(ExportEvent::Failed {
                        reason: failure.error.to_string(),
                    }))
                    .ok();
                Err(failure)
            }
        }
    }

    async fn run(
        &self,
        request: &ExportRequest,
        target: &ExportTarget,
    ) -> Result<ExportOutcome, ExportFailure> {
        tokio::time::sleep(self.options.settle_delay).await;

        let scene = self.editor.lock().scene();
        let image = self.rasterizer.rasterize(&scene).await?;

        let created_at = chrono::Utc::now();
        let page = report_page(request, &scene, created_at);
        let document = build_report_pdf(&image, &page)?;
        let timestamp_ms = created_at.timestamp_millis();

        match target {
            ExportTarget::Download { dir } => {
                let file = dir.join(format!(
                    "{}_{}.pdf",
                    sanitize_segment(&request.block_name),
                    timestamp_ms
                ));
                let saved = async {
                    tokio::fs::create_dir_all(dir).await?;
                    tokio::fs::write(&file, &document).await
                }
                .await;
                if let Err(e) = saved {
                    return Err(ExportFailure {
                        error: ExportError::Save {
                            path: file.display().to_string(),
                            reason: e.to_string(),
                        },
                        document: Some(document),
                    });
                }
                Ok(ExportOutcome {
                    location: file.display().to_string(),
                    document,
                    record: None,
                })
            }
            ExportTarget::Upload { storage, table } => {
                let path = report_path(
                    &self.options.report_root,
                    &request.farm_id,
                    &request.block_name,
                    timestamp_ms,
                );
                let pdf_url = match storage.store(&path, &document).await {
                    Ok(url) => url,
                    Err(error) => {
                        return Err(ExportFailure {
                            error,
                            document: Some(document),
                        })
                    }
                };
                let record = ReportRecord {
                    farm_id: request.farm_id.clone(),
                    block_name: request.block_name.clone(),
                    pdf_url: pdf_url.clone(),
                    created_at,
                };
                if let Err(error) = table.insert(&record).await {
                    return Err(ExportFailure {
                        error,
                        document: Some(document),
                    });
                }
                Ok(ExportOutcome {
                    location: pdf_url,
                    document,
                    record: Some(record),
                })
            }
        }
    }
}

fn report_page(
    request: &ExportRequest,
    scene: &Scene,
    created_at: chrono::DateTime<chrono::Utc>,
) -> ReportPage {
    let title = format!(
        "{} - {} - {}",
        request.block_name,
        request.farm_id,
        created_at.format("%d/%m/%Y %H:%M UTC")
    );
    let legend = scene
        .shapes
        .iter()
        .filter_map(|s| s.label.as_ref().map(|l| format!("{} {}", s.id, l.text)))
        .collect();
    ReportPage {
        title,
        legend,
        creation_date: Some(created_at),
    }
}
