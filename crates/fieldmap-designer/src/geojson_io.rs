//! GeoJSON export and import of annotated shapes.
//!
//! Exported features carry `nome`, `color`, `areaHa` and `areaAcres`
//! properties (lines also `lengthKm`). Positions are `[lng, lat]` and polygon
//! rings are closed.

use fieldmap_core::units::round2;
use fieldmap_core::{GeometryError, LatLng, ShapeKind};
use geojson::{feature::Id, Feature, FeatureCollection, GeoJson, Geometry, JsonObject, Value};
use serde_json::json;

use crate::annotation::Annotation;
use crate::metrics::ShapeMetrics;
use crate::model::Shape;

/// Builds the geometry of a shape.
pub fn shape_geometry(shape: &Shape) -> Geometry {
    let mut positions: Vec<Vec<f64>> = shape.coords().iter().map(|c| c.to_position()).collect();
    match shape.kind() {
        ShapeKind::Polygon => {
            if let Some(first) = positions.first().cloned() {
                positions.push(first);
            }
            Geometry::new(Value::Polygon(vec![positions]))
        }
        ShapeKind::Line => Geometry::new(Value::LineString(positions)),
    }
}

/// Builds a feature for one annotated shape.
pub fn shape_to_feature(shape: &Shape, annotation: &Annotation, metrics: &ShapeMetrics) -> Feature {
    let mut properties = JsonObject::new();
    properties.insert("nome".to_string(), json!(annotation.name));
    properties.insert("color".to_string(), json!(annotation.color));
    properties.insert("areaHa".to_string(), json!(round2(metrics.area_ha)));
    properties.insert("areaAcres".to_string(), json!(round2(metrics.area_acres)));
    if shape.kind() == ShapeKind::Line {
        properties.insert("lengthKm".to_string(), json!(round2(metrics.length_km)));
    }
    if let Some(label) = &annotation.label {
        properties.insert("label".to_string(), json!(label));
    }

    Feature {
        bbox: None,
        geometry: Some(shape_geometry(shape)),
        id: Some(Id::Number(shape.id().0.into())),
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Wraps features into a collection.
pub fn feature_collection(features: Vec<Feature>) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

/// A feature read back from GeoJSON, before it gets an id
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedFeature {
    pub kind: ShapeKind,
    pub coords: Vec<LatLng>,
    pub name: Option<String>,
    pub color: Option<String>,
    pub label: Option<String>,
}

/// Features read from a document plus what had to be skipped
#[derive(Debug, Clone, Default)]
pub struct ParsedFeatures {
    pub features: Vec<ImportedFeature>,
    pub skipped: Vec<GeometryError>,
}

/// Parses a FeatureCollection, a single Feature or a bare geometry.
///
/// Only Polygon (outer ring) and LineString geometries are imported; other
/// geometries are reported in `skipped`.
pub fn parse_features(text: &str) -> Result<ParsedFeatures, GeometryError> {
    let geojson: GeoJson = text.parse().map_err(|e: geojson::Error| {
        GeometryError::MalformedDocument {
            reason: e.to_string(),
        }
    })?;

    let features = match geojson {
        GeoJson::FeatureCollection(fc) => fc.features,
        GeoJson::Feature(f) => vec![f],
        GeoJson::Geometry(g) => vec![Feature::from(g)],
    };

    let mut parsed = ParsedFeatures::default();
    for feature in features {
        match import_feature(&feature) {
            Ok(imported) => parsed.features.push(imported),
            Err(e) => {
                tracing::warn!("Skipping feature: {}", e);
                parsed.skipped.push(e);
            }
        }
    }
    Ok(parsed)
}

fn import_feature(feature: &Feature) -> Result<ImportedFeature, GeometryError> {
    let string_property = |key: &str| {
        feature
            .properties
            .as_ref()
            .and_then(|p| p.get(key))
            .and_then(|v| v.as_str())
            .map(str::to_string)
    };

    let geometry = feature
        .geometry
        .as_ref()
        .ok_or_else(|| GeometryError::UnsupportedGeometry {
            geometry_type: "null".to_string(),
        })?;

    let (kind, positions) = match &geometry.value {
        Value::Polygon(rings) => (
            ShapeKind::Polygon,
            rings.first().cloned().unwrap_or_default(),
        ),
        Value::LineString(line) => (ShapeKind::Line, line.clone()),
        other => {
            return Err(GeometryError::UnsupportedGeometry {
                geometry_type: geometry_type_name(other).to_string(),
            })
        }
    };

    let coords = positions
        .iter()
        .map(|p| position_to_latlng(p))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ImportedFeature {
        kind,
        coords,
        name: string_property("nome").or_else(|| string_property("name")),
        color: string_property("color"),
        label: string_property("label"),
    })
}

fn position_to_latlng(position: &[f64]) -> Result<LatLng, GeometryError> {
    match position {
        [lng, lat, ..] => Ok(LatLng::new(*lat, *lng)),
        _ => Err(GeometryError::MalformedPosition {
            reason: format!("expected [lng, lat], got {} values", position.len()),
        }),
    }
}

fn geometry_type_name(value: &Value) -> &'static str {
    match value {
        Value::Point(_) => "Point",
        Value::MultiPoint(_) => "MultiPoint",
        Value::LineString(_) => "LineString",
        Value::MultiLineString(_) => "MultiLineString",
        Value::Polygon(_) => "Polygon",
        Value::MultiPolygon(_) => "MultiPolygon",
        Value::GeometryCollection(_) => "GeometryCollection",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics;
    use fieldmap_core::ShapeId;

    fn square() -> Shape {
        Shape::polygon(
            ShapeId(1),
            vec![
                LatLng::new(0.0, 0.0),
                LatLng::new(0.0, 0.001),
                LatLng::new(0.001, 0.001),
                LatLng::new(0.001, 0.0),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_polygon_ring_closed_lng_lat() {
        let geometry = shape_geometry(&square());
        match geometry.value {
            Value::Polygon(rings) => {
                let ring = &rings[0];
                assert_eq!(ring.len(), 5);
                assert_eq!(ring.first(), ring.last());
                assert_eq!(ring[1], vec![0.001, 0.0]);
            }
            other => panic!("unexpected geometry {:?}", other),
        }
    }

    #[test]
    fn test_feature_properties() {
        let shape = square();
        let m = metrics::derive(&shape);
        let feature = shape_to_feature(&shape, &Annotation::new("Talhão", "#f1c40f"), &m);
        let props = feature.properties.unwrap();
        assert_eq!(props["nome"], "Talhão");
        assert_eq!(props["color"], "#f1c40f");
        assert_eq!(props["areaHa"], json!(round2(m.area_ha)));
        assert_eq!(props["areaAcres"], json!(round2(m.area_acres)));
        assert!(props.get("lengthKm").is_none());
    }

    #[test]
    fn test_line_has_length() {
        let line = Shape::line(
            ShapeId(2),
            vec![LatLng::new(0.0, 0.0), LatLng::new(0.0, 0.01)],
        )
        .unwrap();
        let m = metrics::derive(&line);
        let feature = shape_to_feature(&line, &Annotation::new("Estrada", "#000"), &m);
        assert!(feature.properties.unwrap().contains_key("lengthKm"));
    }

    #[test]
    fn test_parse_collection_skips_points() {
        let text = r##"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "properties": {"nome": "A", "color": "#123456"},
                 "geometry": {"type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,0]]]}},
                {"type": "Feature", "properties": null,
                 "geometry": {"type": "LineString", "coordinates": [[0,0],[1,1]]}},
                {"type": "Feature", "properties": {},
                 "geometry": {"type": "Point", "coordinates": [0,0]}}
            ]
        }"##;
        let parsed = parse_features(text).unwrap();
        assert_eq!(parsed.features.len(), 2);
        assert_eq!(parsed.skipped.len(), 1);

        let polygon = &parsed.features[0];
        assert_eq!(polygon.kind, ShapeKind::Polygon);
        assert_eq!(polygon.name.as_deref(), Some("A"));
        assert_eq!(polygon.coords[1], LatLng::new(0.0, 1.0));

        let line = &parsed.features[1];
        assert_eq!(line.kind, ShapeKind::Line);
        assert!(line.name.is_none());
        assert!(line.label.is_none());
    }

    #[test]
    fn test_label_survives_export_and_import() {
        let shape = square();
        let mut annotation = Annotation::new("Talhão 4", "#2ecc71");
        annotation.label = Some("Soja 2024".to_string());
        let feature = shape_to_feature(&shape, &annotation, &metrics::derive(&shape));
        let text = serde_json::to_string(&feature_collection(vec![feature])).unwrap();

        let parsed = parse_features(&text).unwrap();
        assert_eq!(parsed.features.len(), 1);
        assert_eq!(parsed.features[0].name.as_deref(), Some("Talhão 4"));
        assert_eq!(parsed.features[0].label.as_deref(), Some("Soja 2024"));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            parse_features("{not geojson"),
            Err(GeometryError::MalformedDocument { .. })
        ));
    }
}
