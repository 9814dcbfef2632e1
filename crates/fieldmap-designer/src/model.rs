//! Drawn shapes.
//!
//! A [`Shape`] is created once from a draw-completion event and never mutated
//! afterwards; an edit produces a replacement through [`Shape::with_coords`].

use fieldmap_core::{GeometryError, LatLng, ShapeId, ShapeKind};
use serde::{Deserialize, Serialize};

/// A user-drawn polygon or line in geographic coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    id: ShapeId,
    kind: ShapeKind,
    coords: Vec<LatLng>,
}

impl Shape {
    /// Creates a shape, rejecting empty or out-of-range coordinates.
    ///
    /// Polygon rings are stored open: a trailing vertex equal to the first
    /// one is dropped.
    pub fn new(id: ShapeId, kind: ShapeKind, coords: Vec<LatLng>) -> Result<Self, GeometryError> {
        if coords.is_empty() {
            return Err(GeometryError::Empty { kind });
        }
        if let Some((index, bad)) = coords.iter().enumerate().find(|(_, c)| !c.is_valid()) {
            return Err(GeometryError::InvalidCoordinate {
                index,
                lat: bad.lat,
                lng: bad.lng,
            });
        }

        let mut coords = coords;
        if kind == ShapeKind::Polygon && coords.len() > 1 && coords.first() == coords.last() {
            coords.pop();
        }

        Ok(Self { id, kind, coords })
    }

    /// Creates a polygon.
    pub fn polygon(id: ShapeId, coords: Vec<LatLng>) -> Result<Self, GeometryError> {
        Self::new(id, ShapeKind::Polygon, coords)
    }

    /// Creates a line.
    pub fn line(id: ShapeId, coords: Vec<LatLng>) -> Result<Self, GeometryError> {
        Self::new(id, ShapeKind::Line, coords)
    }

    /// Creates an axis-aligned rectangle polygon from two opposite corners.
    pub fn rectangle(id: ShapeId, a: LatLng, b: LatLng) -> Result<Self, GeometryError> {
        Self::polygon(
            id,
            vec![
                LatLng::new(a.lat, a.lng),
                LatLng::new(a.lat, b.lng),
                LatLng::new(b.lat, b.lng),
                LatLng::new(b.lat, a.lng),
            ],
        )
    }

    /// Returns a replacement shape with the same id and kind.
    pub fn with_coords(&self, coords: Vec<LatLng>) -> Result<Self, GeometryError> {
        Self::new(self.id, self.kind, coords)
    }

    pub fn id(&self) -> ShapeId {
        self.id
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    pub fn coords(&self) -> &[LatLng] {
        &self.coords
    }

    /// Number of vertices after collapsing consecutive duplicates.
    pub fn distinct_vertex_count(&self) -> usize {
        let mut count = 0;
        let mut last: Option<&LatLng> = None;
        for c in &self.coords {
            if last != Some(c) {
                count += 1;
            }
            last = Some(c);
        }
        if self.kind == ShapeKind::Polygon && count > 1 && self.coords.first() == last {
            count -= 1;
        }
        count
    }

    /// Returns the south-west and north-east corners of the bounding box.
    pub fn bounds(&self) -> (LatLng, LatLng) {
        let mut min = LatLng::new(f64::INFINITY, f64::INFINITY);
        let mut max = LatLng::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        for c in &self.coords {
            min.lat = min.lat.min(c.lat);
            min.lng = min.lng.min(c.lng);
            max.lat = max.lat.max(c.lat);
            max.lng = max.lng.max(c.lng);
        }
        (min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty() {
        let err = Shape::polygon(ShapeId(1), vec![]).unwrap_err();
        assert_eq!(
            err,
            GeometryError::Empty {
                kind: ShapeKind::Polygon
            }
        );
    }

    #[test]
    fn test_rejects_invalid_coordinate() {
        let err = Shape::line(
            ShapeId(1),
            vec![LatLng::new(0.0, 0.0), LatLng::new(95.0, 0.0)],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            GeometryError::InvalidCoordinate { index: 1, .. }
        ));
    }

    #[test]
    fn test_polygon_ring_stored_open() {
        let a = LatLng::new(0.0, 0.0);
        let shape = Shape::polygon(
            ShapeId(1),
            vec![a, LatLng::new(0.0, 1.0), LatLng::new(1.0, 1.0), a],
        )
        .unwrap();
        assert_eq!(shape.coords().len(), 3);
        assert_eq!(shape.distinct_vertex_count(), 3);
    }

    #[test]
    fn test_rectangle_corners() {
        let shape = Shape::rectangle(
            ShapeId(2),
            LatLng::new(-1.0, -2.0),
            LatLng::new(1.0, 2.0),
        )
        .unwrap();
        assert_eq!(shape.kind(), ShapeKind::Polygon);
        assert_eq!(shape.coords().len(), 4);
        let (sw, ne) = shape.bounds();
        assert_eq!(sw, LatLng::new(-1.0, -2.0));
        assert_eq!(ne, LatLng::new(1.0, 2.0));
    }

    #[test]
    fn test_distinct_vertices_collapse_duplicates() {
        let p = LatLng::new(0.0, 0.0);
        let q = LatLng::new(0.0, 1.0);
        let shape = Shape::polygon(ShapeId(3), vec![p, p, q, q]).unwrap();
        assert_eq!(shape.distinct_vertex_count(), 2);
    }

    #[test]
    fn test_with_coords_keeps_identity() {
        let line = Shape::line(
            ShapeId(5),
            vec![LatLng::new(0.0, 0.0), LatLng::new(0.0, 1.0)],
        )
        .unwrap();
        let edited = line
            .with_coords(vec![LatLng::new(0.0, 0.0), LatLng::new(1.0, 1.0)])
            .unwrap();
        assert_eq!(edited.id(), ShapeId(5));
        assert_eq!(edited.kind(), ShapeKind::Line);
        assert_ne!(edited, line);
    }
}
