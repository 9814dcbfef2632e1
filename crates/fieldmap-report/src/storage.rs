//! Where uploaded reports go and how they are recorded.

use async_trait::async_trait;
use fieldmap_core::ExportError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// Metadata row for an uploaded report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRecord {
    pub farm_id: String,
    pub block_name: String,
    pub pdf_url: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Object storage for report documents.
#[async_trait]
pub trait ReportStorage: Send + Sync {
    /// Stores `bytes` at `path` and returns a URL for it.
    async fn store(&self, path: &str, bytes: &[u8]) -> Result<String, ExportError>;
}

/// Table that receives one row per uploaded report.
#[async_trait]
pub trait ReportTable: Send + Sync {
    async fn insert(&self, record: &ReportRecord) -> Result<(), ExportError>;
}

/// Replaces characters that are unsafe in a storage path segment with `_`.
pub fn sanitize_segment(segment: &str) -> String {
    let mut out: String = segment
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    if out.starts_with('.') {
        out.replace_range(..1, "_");
    }
    if out.is_empty() {
        out.push('_');
    }
    out
}

/// `<root>/<farm-id>/<block-name>_<timestamp>.pdf`
pub fn report_path(root: &str, farm_id: &str, block_name: &str, timestamp_ms: i64) -> String {
    let root = root.trim_matches('/');
    let file = format!("{}_{}.pdf", sanitize_segment(block_name), timestamp_ms);
    if root.is_empty() {
        format!("{}/{}", sanitize_segment(farm_id), file)
    } else {
        format!("{}/{}/{}", root, sanitize_segment(farm_id), file)
    }
}

/// Stores reports under a local directory
#[derive(Debug, Clone)]
pub struct LocalReportStorage {
    root: PathBuf,
}

impl LocalReportStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl ReportStorage for LocalReportStorage {
    async fn store(&self, path: &str, bytes: &[u8]) -> Result<String, ExportError> {
        let upload_error = |e: std::io::Error| ExportError::Upload {
            path: path.to_string(),
            reason: e.to_string(),
        };

        let target = self.root.join(path);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(upload_error)?;
        }
        tokio::fs::write(&target, bytes).await.map_err(upload_error)?;

        let absolute = match tokio::fs::canonicalize(&target).await {
            Ok(p) => p,
            Err(_) => target,
        };
        tracing::debug!("Stored {} bytes at {}", bytes.len(), absolute.display());
        Ok(format!("file://{}", absolute.display()))
    }
}

/// Appends records to a JSON-lines file
#[derive(Debug, Clone)]
pub struct JsonlReportTable {
    path: PathBuf,
}

impl JsonlReportTable {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ReportTable for JsonlReportTable {
    async fn insert(&self, record: &ReportRecord) -> Result<(), ExportError> {
        let record_error = |e: &dyn std::fmt::Display| ExportError::Record {
            reason: e.to_string(),
        };

        let mut line = serde_json::to_string(record).map_err(|e| record_error(&e))?;
        line.push('\n');

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| record_error(&e))?;
        }
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| record_error(&e))?;
        file.write_all(line.as_bytes())
            .await
            .map_err(|e| record_error(&e))?;
        file.flush().await.map_err(|e| record_error(&e))?;
        Ok(())
    }
}
