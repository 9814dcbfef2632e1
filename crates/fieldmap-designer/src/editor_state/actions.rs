//! Editor actions and the single dispatch entry point.

use fieldmap_core::{LatLng, Result, ShapeId, ShapeKind};

use super::EditorState;
use crate::annotation::MetadataInput;
use crate::host::HostCommand;
use crate::metrics::ShapeMetrics;

/// Everything that can change the editor
#[derive(Debug, Clone, PartialEq)]
pub enum EditorAction {
    /// A polygon or line draw finished.
    DrawCompleted { kind: ShapeKind, coords: Vec<LatLng> },
    /// A rectangle draw finished.
    DrawRectangle { corner_a: LatLng, corner_b: LatLng },
    /// The metadata prompt was answered.
    SubmitMetadata { id: ShapeId, input: MetadataInput },
    /// The metadata prompt was dismissed.
    DismissMetadata { id: ShapeId },
    /// A shape was clicked.
    Click { id: ShapeId },
    /// The edit tool replaced a shape's vertices.
    EditCompleted { id: ShapeId, coords: Vec<LatLng> },
    /// The remove tool deleted shapes.
    Remove { ids: Vec<ShapeId> },
    /// Deselect everything.
    ClearSelection,
    /// A decoded host message.
    Host(HostCommand),
}

impl EditorAction {
    pub fn name(&self) -> &'static str {
        match self {
            EditorAction::DrawCompleted { .. } => "draw",
            EditorAction::DrawRectangle { .. } => "draw rectangle",
            EditorAction::SubmitMetadata { .. } => "submit metadata",
            EditorAction::DismissMetadata { .. } => "dismiss metadata",
            EditorAction::Click { .. } => "click",
            EditorAction::EditCompleted { .. } => "edit",
            EditorAction::Remove { .. } => "remove",
            EditorAction::ClearSelection => "clear selection",
            EditorAction::Host(cmd) => cmd.type_name(),
        }
    }
}

/// What a dispatched action did
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    /// A shape was created and now awaits metadata.
    Created { id: ShapeId, metrics: ShapeMetrics },
    /// Metadata was attached; `defaulted` when the prompt was dismissed.
    Annotated { id: ShapeId, defaulted: bool },
    /// Selection flipped.
    Toggled { id: ShapeId, selected: bool },
    /// Geometry replaced and metrics recomputed.
    Edited { id: ShapeId, metrics: ShapeMetrics },
    /// Shapes removed.
    Removed { ids: Vec<ShapeId> },
    /// Number of shapes or layers a batch or host command changed.
    Affected(usize),
}

impl EditorState {
    /// Applies one action.
    ///
    /// On error the editor is left exactly as it was.
    pub fn dispatch(&mut self, action: EditorAction) -> Result<ActionOutcome> {
        tracing::debug!("Dispatching {}", action.name());
        match action {
            EditorAction::DrawCompleted { kind, coords } => self.draw_completed(kind, coords),
            EditorAction::DrawRectangle { corner_a, corner_b } => {
                self.draw_rectangle(corner_a, corner_b)
            }
            EditorAction::SubmitMetadata { id, input } => self.submit_metadata(id, input),
            EditorAction::DismissMetadata { id } => self.dismiss_metadata(id),
            EditorAction::Click { id } => self.toggle_selection(id),
            EditorAction::EditCompleted { id, coords } => self.edit_completed(id, coords),
            EditorAction::Remove { ids } => self.remove(ids),
            EditorAction::ClearSelection => Ok(ActionOutcome::Affected(self.clear_selection())),
            EditorAction::Host(cmd) => self.apply_host_command(cmd),
        }
    }
}
