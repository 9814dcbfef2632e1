//! Async glue between a shared editor and a metadata prompt.
//!
//! The editor lock is taken only for the synchronous steps; it is released
//! before awaiting the prompt so host messages keep flowing meanwhile.

use fieldmap_core::{thread_safe, LatLng, Result, ShapeId, ShapeKind, ThreadSafe};
use std::sync::Arc;

use crate::editor_state::{ActionOutcome, EditorAction, EditorState};
use crate::host::HostResponse;
use crate::prompt::MetadataPrompt;

/// Shared editor plus the prompt used after every draw
#[derive(Clone)]
pub struct EditorSession {
    editor: ThreadSafe<EditorState>,
    prompt: Arc<dyn MetadataPrompt>,
}

impl EditorSession {
    pub fn new(editor: EditorState, prompt: Arc<dyn MetadataPrompt>) -> Self {
        Self {
            editor: thread_safe(editor),
            prompt,
        }
    }

    pub fn editor(&self) -> &ThreadSafe<EditorState> {
        &self.editor
    }

    /// Draws a polygon or line and runs the metadata workflow to completion.
    pub async fn draw(&self, kind: ShapeKind, coords: Vec<LatLng>) -> Result<ShapeId> {
        self.run_workflow(EditorAction::DrawCompleted { kind, coords })
            .await
    }

    /// Draws a rectangle and runs the metadata workflow to completion.
    pub async fn draw_rectangle(&self, corner_a: LatLng, corner_b: LatLng) -> Result<ShapeId> {
        self.run_workflow(EditorAction::DrawRectangle { corner_a, corner_b })
            .await
    }

    async fn run_workflow(&self, draw: EditorAction) -> Result<ShapeId> {
        let request = {
            let mut editor = self.editor.lock();
            let id = match editor.dispatch(draw)? {
                ActionOutcome::Created { id, .. } => id,
                other => {
                    return Err(fieldmap_core::Error::other(format!(
                        "Draw produced unexpected outcome {:?}",
                        other
                    )))
                }
            };
            editor.metadata_request(id)?
        };

        let id = request.id;
        let mut pending = PendingMetadata {
            editor: &self.editor,
            id,
            armed: true,
        };
        let answer = self.prompt.request(request).await;
        pending.armed = false;

        let mut editor = self.editor.lock();
        let action = match answer {
            Some(input) => EditorAction::SubmitMetadata { id, input },
            None => EditorAction::DismissMetadata { id },
        };
        match editor.dispatch(action) {
            Ok(_) => Ok(id),
            // deleted by a host command while the prompt was open
            Err(e) if editor.feature(id).is_none() => {
                tracing::debug!("Shape {} gone before metadata arrived: {}", id, e);
                Ok(id)
            }
            Err(e) => Err(e),
        }
    }

    pub fn dispatch(&self, action: EditorAction) -> Result<ActionOutcome> {
        self.editor.lock().dispatch(action)
    }

    pub fn handle_host_message(&self, message: &str) -> HostResponse {
        self.editor.lock().handle_host_message(message)
    }
}

/// Dismisses an open prompt when the workflow future is dropped before
/// the answer arrives, so the shape still ends up annotated.
struct PendingMetadata<'a> {
    editor: &'a ThreadSafe<EditorState>,
    id: ShapeId,
    armed: bool,
}

impl Drop for PendingMetadata<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut editor = self.editor.lock();
        if editor.feature(self.id).is_none() {
            return;
        }
        tracing::debug!("Metadata prompt for shape {} abandoned, using defaults", self.id);
        if let Err(e) = editor.dispatch(EditorAction::DismissMetadata { id: self.id }) {
            tracing::warn!("Failed to dismiss metadata for shape {}: {}", self.id, e);
        }
    }
}

impl std::fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorSession")
            .field("shapes", &self.editor.lock().len())
            .finish()
    }
}
