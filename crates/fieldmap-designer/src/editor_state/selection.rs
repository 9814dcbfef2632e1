//! Selection toggling and batch restyling of selected shapes.

use fieldmap_core::{
    AppEvent, CommandError, EditorError, Result, SelectionEvent, ShapeEvent, ShapeId,
};

use super::{ActionOutcome, EditorState};
use crate::annotation::is_valid_color;

impl EditorState {
    pub(super) fn toggle_selection(&mut self, id: ShapeId) -> Result<ActionOutcome> {
        let feature = self
            .features
            .get_mut(&id)
            .ok_or(EditorError::ShapeNotFound { id })?;
        let selected = feature.state.toggle_selected(id)?;

        self.bus
            .publish(AppEvent::Selection(SelectionEvent::Toggled { id, selected }))
            .ok();
        Ok(ActionOutcome::Toggled { id, selected })
    }

    /// Deselects everything; returns how many shapes changed.
    pub(super) fn clear_selection(&mut self) -> usize {
        let cleared = self
            .features
            .values_mut()
            .map(|f| f.state.deselect())
            .filter(|changed| *changed)
            .count();
        if cleared > 0 {
            self.bus
                .publish(AppEvent::Selection(SelectionEvent::Cleared))
                .ok();
        }
        cleared
    }

    /// Applies a color, and a label when given, to every selected shape.
    ///
    /// Returns the number of shapes restyled; zero when nothing is selected.
    pub fn apply_color_to_selected(
        &mut self,
        color: &str,
        label: Option<&str>,
    ) -> std::result::Result<usize, CommandError> {
        if !is_valid_color(color) {
            return Err(CommandError::InvalidColor {
                color: color.to_string(),
            });
        }

        let mut restyled = Vec::new();
        for feature in self.features.values_mut().filter(|f| f.is_selected()) {
            if let Some(annotation) = feature.annotation.as_mut() {
                annotation.color = color.to_string();
                if let Some(label) = label {
                    annotation.label = Some(label.to_string());
                }
                restyled.push(feature.shape.id());
            }
        }

        for &id in &restyled {
            self.bus
                .publish(AppEvent::Shape(ShapeEvent::Restyled {
                    id,
                    color: color.to_string(),
                }))
                .ok();
        }
        if restyled.is_empty() {
            tracing::debug!("No shapes selected, color {} not applied", color);
        }
        Ok(restyled.len())
    }
}
