//! GeoJSON import and export of the whole collection.

use fieldmap_core::{AppEvent, GeometryError, Result, ShapeEvent, ShapeId};
use geojson::FeatureCollection;

use super::{EditorState, MapFeature};
use crate::annotation::{default_name, is_valid_color, Annotation};
use crate::geojson_io::{feature_collection, parse_features, shape_to_feature, ImportedFeature};
use crate::metrics;
use crate::model::Shape;
use crate::workflow::ShapeState;

/// What an import added and what it had to skip
#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    pub imported: Vec<ShapeId>,
    pub skipped: Vec<GeometryError>,
}

impl EditorState {
    /// Imports a GeoJSON document; features arrive already annotated.
    ///
    /// Metrics are recomputed from the geometry; any area properties in the
    /// document are ignored.
    pub fn import_geojson(&mut self, text: &str) -> Result<ImportReport> {
        let parsed = parse_features(text)?;
        let mut report = ImportReport {
            imported: Vec::with_capacity(parsed.features.len()),
            skipped: parsed.skipped,
        };

        for feature in parsed.features {
            match self.insert_imported(feature) {
                Ok(id) => report.imported.push(id),
                Err(e) => {
                    tracing::warn!("Skipping imported feature: {}", e);
                    report.skipped.push(e);
                }
            }
        }

        tracing::info!(
            "Imported {} features ({} skipped)",
            report.imported.len(),
            report.skipped.len()
        );
        Ok(report)
    }

    fn insert_imported(
        &mut self,
        feature: ImportedFeature,
    ) -> std::result::Result<ShapeId, GeometryError> {
        let shape = Shape::new(self.peek_id(), feature.kind, feature.coords)?;
        let id = shape.id();
        self.next_id += 1;

        let given = feature.name.filter(|n| !n.trim().is_empty());
        let defaulted = given.is_none();
        let name = given.unwrap_or_else(|| default_name(id));
        let color = match feature.color {
            Some(color) if is_valid_color(&color) => color,
            _ => self.palette.next_color(),
        };

        self.features.insert(
            id,
            MapFeature {
                metrics: metrics::derive(&shape),
                shape,
                state: ShapeState::Annotated { selected: false },
                annotation: Some(Annotation {
                    label: feature.label.filter(|l| !l.trim().is_empty()),
                    ..Annotation::new(name.clone(), color)
                }),
            },
        );

        self.bus
            .publish(AppEvent::Shape(ShapeEvent::Created {
                id,
                kind: feature.kind,
            }))
            .ok();
        self.bus
            .publish(AppEvent::Shape(ShapeEvent::Annotated {
                id,
                name,
                defaulted,
            }))
            .ok();
        Ok(id)
    }

    /// Exports every annotated shape.
    pub fn to_feature_collection(&self) -> FeatureCollection {
        feature_collection(
            self.features
                .values()
                .filter_map(|f| {
                    f.annotation
                        .as_ref()
                        .map(|a| shape_to_feature(&f.shape, a, &f.metrics))
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldmap_core::{EventCategory, EventFilter, ShapeKind};
    use parking_lot::Mutex;
    use std::sync::Arc;

    const DOC: &str = r##"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "properties": {"nome": "Talhão 1", "color": "#e74c3c", "areaHa": 999},
             "geometry": {"type": "Polygon", "coordinates": [[[0,0],[0.001,0],[0.001,0.001],[0,0.001],[0,0]]]}},
            {"type": "Feature", "properties": {},
             "geometry": {"type": "LineString", "coordinates": [[0,0],[0,0.01]]}},
            {"type": "Feature", "properties": {},
             "geometry": {"type": "LineString", "coordinates": [[0,0],[0,95]]}}
        ]
    }"##;

    #[test]
    fn test_import_recomputes_metrics() {
        let mut editor = EditorState::new();
        let report = editor.import_geojson(DOC).unwrap();
        assert_eq!(report.imported, vec![ShapeId(1), ShapeId(2)]);
        assert_eq!(report.skipped.len(), 1);

        let polygon = editor.feature(ShapeId(1)).unwrap();
        assert!(polygon.state.is_annotated());
        assert!(polygon.metrics.area_ha < 2.0);
        assert_eq!(polygon.annotation.as_ref().unwrap().name, "Talhão 1");

        let line = editor.feature(ShapeId(2)).unwrap();
        assert_eq!(line.kind(), ShapeKind::Line);
        assert_eq!(line.annotation.as_ref().unwrap().name, "Block 2");
    }

    #[test]
    fn test_import_reports_defaulted_names() {
        let mut editor = EditorState::new();
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        editor.bus().subscribe(
            EventFilter::Categories(vec![EventCategory::Shape]),
            move |event| {
                if let AppEvent::Shape(ShapeEvent::Annotated { name, defaulted, .. }) = event {
                    sink.lock().push((name, defaulted));
                }
            },
        );

        editor.import_geojson(DOC).unwrap();
        assert_eq!(
            *events.lock(),
            vec![
                ("Talhão 1".to_string(), false),
                ("Block 2".to_string(), true),
            ]
        );
    }

    #[test]
    fn test_import_keeps_label() {
        let mut editor = EditorState::new();
        editor
            .import_geojson(
                r##"{"type": "Feature", "properties": {"nome": "Talhão 9", "label": "Milho"},
                    "geometry": {"type": "LineString", "coordinates": [[0,0],[0,0.01]]}}"##,
            )
            .unwrap();
        let annotation = editor.feature(ShapeId(1)).unwrap().annotation.clone().unwrap();
        assert_eq!(annotation.label.as_deref(), Some("Milho"));
        assert_eq!(annotation.display_label(), "Milho");
    }

    #[test]
    fn test_export_collection() {
        let mut editor = EditorState::new();
        editor.import_geojson(DOC).unwrap();
        let collection = editor.to_feature_collection();
        assert_eq!(collection.features.len(), 2);
        let json = serde_json::to_string(&collection).unwrap();
        assert!(json.contains("\"nome\":\"Talhão 1\""));
        assert!(json.contains("lengthKm"));
    }
}
