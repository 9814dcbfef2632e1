//! Metadata prompt abstraction.
//!
//! The editor never blocks waiting for input. A host implements
//! [`MetadataPrompt`] however it likes (modal dialog, web form, message
//! round-trip) and returns `None` when the user dismisses it.

use async_trait::async_trait;
use fieldmap_core::{ShapeId, ShapeKind};

use crate::annotation::MetadataInput;
use crate::metrics::ShapeMetrics;

/// What the prompt is asked to collect metadata for
#[derive(Debug, Clone)]
pub struct MetadataRequest {
    pub id: ShapeId,
    pub kind: ShapeKind,
    pub metrics: ShapeMetrics,
    /// Palette offered to the user
    pub palette: Vec<String>,
}

#[async_trait]
pub trait MetadataPrompt: Send + Sync {
    /// Collects metadata; `None` means the prompt was dismissed.
    async fn request(&self, request: MetadataRequest) -> Option<MetadataInput>;
}

/// Prompt that is always dismissed, for headless runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct DismissingPrompt;

#[async_trait]
impl MetadataPrompt for DismissingPrompt {
    async fn request(&self, request: MetadataRequest) -> Option<MetadataInput> {
        tracing::debug!("Dismissing metadata prompt for {}", request.id);
        None
    }
}

/// Prompt that answers with a fixed input.
#[derive(Debug, Clone)]
pub struct FixedPrompt(pub MetadataInput);

#[async_trait]
impl MetadataPrompt for FixedPrompt {
    async fn request(&self, _request: MetadataRequest) -> Option<MetadataInput> {
        Some(self.0.clone())
    }
}
