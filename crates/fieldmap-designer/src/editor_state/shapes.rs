//! Draw completion, metadata, edits and removal.

use fieldmap_core::units::area_notice;
use fieldmap_core::{
    AppEvent, EditorError, LatLng, Notice, Result, ShapeEvent, ShapeId, ShapeKind,
};

use super::{ActionOutcome, EditorState, MapFeature};
use crate::annotation::{default_name, is_valid_color, Annotation, MetadataInput};
use crate::metrics;
use crate::model::Shape;
use crate::prompt::MetadataRequest;
use crate::workflow::ShapeState;

impl EditorState {
    pub(super) fn draw_completed(
        &mut self,
        kind: ShapeKind,
        coords: Vec<LatLng>,
    ) -> Result<ActionOutcome> {
        self.tools.check_draw(kind)?;
        let shape = Shape::new(self.peek_id(), kind, coords).map_err(EditorError::from)?;
        Ok(self.insert_drafted(shape))
    }

    pub(super) fn draw_rectangle(&mut self, a: LatLng, b: LatLng) -> Result<ActionOutcome> {
        self.tools.check_rectangle()?;
        let shape = Shape::rectangle(self.peek_id(), a, b).map_err(EditorError::from)?;
        Ok(self.insert_drafted(shape))
    }

    /// Adds a freshly drawn shape and moves it to `AwaitingInput`.
    fn insert_drafted(&mut self, shape: Shape) -> ActionOutcome {
        let id = shape.id();
        let kind = shape.kind();
        self.next_id += 1;

        let shape_metrics = metrics::derive(&shape);
        let mut state = ShapeState::Drafting;
        // a fresh Drafting state always accepts the request
        let _ = state.request_input(id);

        self.features.insert(
            id,
            MapFeature {
                shape,
                metrics: shape_metrics.clone(),
                state,
                annotation: None,
            },
        );
        self.bus
            .publish(AppEvent::Shape(ShapeEvent::Created { id, kind }))
            .ok();

        if kind == ShapeKind::Polygon {
            self.bus
                .notify(Notice::info(area_notice(shape_metrics.area_sq_meters)));
        }
        if shape_metrics.has_warnings() {
            let warnings: Vec<String> = shape_metrics
                .warnings
                .iter()
                .map(|w| w.to_string())
                .collect();
            self.bus.notify(Notice::warning(format!(
                "Shape {}: {}",
                id,
                warnings.join(", ")
            )));
        }

        ActionOutcome::Created {
            id,
            metrics: shape_metrics,
        }
    }

    /// Builds the request handed to a metadata prompt.
    pub fn metadata_request(&self, id: ShapeId) -> Result<MetadataRequest> {
        let feature = self
            .features
            .get(&id)
            .ok_or(EditorError::ShapeNotFound { id })?;
        Ok(MetadataRequest {
            id,
            kind: feature.kind(),
            metrics: feature.metrics.clone(),
            palette: self.palette.colors().to_vec(),
        })
    }

    pub(super) fn submit_metadata(
        &mut self,
        id: ShapeId,
        input: MetadataInput,
    ) -> Result<ActionOutcome> {
        let feature = self
            .features
            .get_mut(&id)
            .ok_or(EditorError::ShapeNotFound { id })?;
        feature.state.annotate(id)?;

        let name = input.name.trim();
        let defaulted = name.is_empty();
        let name = if defaulted {
            default_name(id)
        } else {
            name.to_string()
        };

        let color = match input.color {
            Some(color) if is_valid_color(&color) => color,
            Some(color) => {
                tracing::warn!("Ignoring invalid color {:?} for {}", color, id);
                self.palette.next_color()
            }
            None => self.palette.next_color(),
        };

        let mut annotation = Annotation::new(name.clone(), color);
        annotation.dates = input.dates;
        feature.annotation = Some(annotation);

        self.bus
            .publish(AppEvent::Shape(ShapeEvent::Annotated {
                id,
                name,
                defaulted,
            }))
            .ok();
        Ok(ActionOutcome::Annotated { id, defaulted })
    }

    pub(super) fn dismiss_metadata(&mut self, id: ShapeId) -> Result<ActionOutcome> {
        let feature = self
            .features
            .get_mut(&id)
            .ok_or(EditorError::ShapeNotFound { id })?;
        feature.state.annotate(id)?;

        let name = default_name(id);
        feature.annotation = Some(Annotation::new(name.clone(), self.palette.next_color()));
        tracing::info!("Metadata prompt for {} dismissed, using '{}'", id, name);

        self.bus
            .publish(AppEvent::Shape(ShapeEvent::Annotated {
                id,
                name,
                defaulted: true,
            }))
            .ok();
        Ok(ActionOutcome::Annotated {
            id,
            defaulted: true,
        })
    }

    pub(super) fn edit_completed(
        &mut self,
        id: ShapeId,
        coords: Vec<LatLng>,
    ) -> Result<ActionOutcome> {
        self.tools.check_edit()?;
        let feature = self
            .features
            .get_mut(&id)
            .ok_or(EditorError::ShapeNotFound { id })?;

        let shape = feature.shape.with_coords(coords).map_err(EditorError::from)?;
        feature.metrics = metrics::derive(&shape);
        feature.shape = shape;
        let updated = feature.metrics.clone();

        tracing::debug!("Recomputed metrics for {}: {:.2} ha", id, updated.area_ha);
        self.bus
            .publish(AppEvent::Shape(ShapeEvent::Edited { id }))
            .ok();
        Ok(ActionOutcome::Edited {
            id,
            metrics: updated,
        })
    }

    pub(super) fn remove(&mut self, ids: Vec<ShapeId>) -> Result<ActionOutcome> {
        self.tools.check_remove()?;
        if let Some(&id) = ids.iter().find(|id| !self.features.contains_key(id)) {
            return Err(EditorError::ShapeNotFound { id }.into());
        }
        Ok(ActionOutcome::Removed {
            ids: self.delete_shapes(&ids),
        })
    }

    /// Deletes shapes that exist; returns the ids actually deleted.
    pub(super) fn delete_shapes(&mut self, ids: &[ShapeId]) -> Vec<ShapeId> {
        let mut deleted = Vec::with_capacity(ids.len());
        for &id in ids {
            let Some(mut feature) = self.features.remove(&id) else {
                continue;
            };
            if feature.state.delete(id).is_ok() {
                self.bus
                    .publish(AppEvent::Shape(ShapeEvent::Deleted { id }))
                    .ok();
                deleted.push(id);
            }
        }
        deleted
    }
}
