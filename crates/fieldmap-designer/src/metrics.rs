//! Metric derivation for drawn shapes.
//!
//! Areas and lengths are geodesic (computed on the WGS84 ellipsoid by `geo`),
//! so they stay accurate at low latitudes where a flat-earth approximation
//! drifts. Derivation is total: degenerate, self-intersecting or non-finite
//! input yields zero or best-effort values plus [`MetricWarning`]s.

use fieldmap_core::units::{meters_to_km, sq_meters_to_acres, sq_meters_to_hectares};
use fieldmap_core::{LatLng, ShapeKind};
use geo::line_intersection::line_intersection;
use geo::{Area, Centroid, GeodesicArea, GeodesicLength, Line, LineString, Polygon};
use serde::{Deserialize, Serialize};

use crate::model::Shape;

/// Areas below this are treated as zero (square meters)
const MIN_AREA_SQ_METERS: f64 = 1e-6;

/// Planar ring area in square degrees below which a ring is collinear
const MIN_PLANAR_AREA: f64 = 1e-14;

/// Something about the input the caller may want to warn about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetricWarning {
    /// Too few distinct vertices, or zero area.
    Degenerate,
    /// Polygon ring crosses itself; area is best-effort.
    SelfIntersecting,
    /// Non-finite coordinates were dropped.
    NonFinite,
}

impl std::fmt::Display for MetricWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricWarning::Degenerate => write!(f, "degenerate shape"),
            MetricWarning::SelfIntersecting => write!(f, "self-intersecting boundary"),
            MetricWarning::NonFinite => write!(f, "non-finite coordinates dropped"),
        }
    }
}

/// Derived measurements of a shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeMetrics {
    /// Geodesic area in square meters (zero for lines)
    pub area_sq_meters: f64,
    /// Area in hectares
    pub area_ha: f64,
    /// Area in acres, derived from hectares
    pub area_acres: f64,
    /// Perimeter of a polygon or total length of a line, in kilometers
    pub length_km: f64,
    /// Area-weighted (polygon) or length-weighted (line) center
    pub centroid: Option<LatLng>,
    /// Conditions the caller may surface
    pub warnings: Vec<MetricWarning>,
}

impl ShapeMetrics {
    fn zero() -> Self {
        Self {
            area_sq_meters: 0.0,
            area_ha: 0.0,
            area_acres: 0.0,
            length_km: 0.0,
            centroid: None,
            warnings: Vec::new(),
        }
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn is_degenerate(&self) -> bool {
        self.warnings.contains(&MetricWarning::Degenerate)
    }

    fn set_area(&mut self, sq_meters: f64) {
        let sq_meters = if sq_meters.is_finite() && sq_meters >= MIN_AREA_SQ_METERS {
            sq_meters
        } else {
            0.0
        };
        self.area_sq_meters = sq_meters;
        self.area_ha = sq_meters_to_hectares(sq_meters);
        self.area_acres = sq_meters_to_acres(sq_meters);
    }

    fn set_length_meters(&mut self, meters: f64) {
        self.length_km = if meters.is_finite() {
            meters_to_km(meters)
        } else {
            0.0
        };
    }

    fn warn(&mut self, warning: MetricWarning) {
        if !self.warnings.contains(&warning) {
            self.warnings.push(warning);
        }
    }
}

/// Derives metrics for a shape.
pub fn derive(shape: &Shape) -> ShapeMetrics {
    derive_from_coords(shape.kind(), shape.coords())
}

/// Derives metrics from raw coordinates; never panics.
pub fn derive_from_coords(kind: ShapeKind, coords: &[LatLng]) -> ShapeMetrics {
    let mut metrics = ShapeMetrics::zero();

    let finite: Vec<LatLng> = coords
        .iter()
        .copied()
        .filter(|c| c.lat.is_finite() && c.lng.is_finite())
        .collect();
    if finite.len() != coords.len() {
        metrics.warn(MetricWarning::NonFinite);
    }

    let mut points: Vec<LatLng> = Vec::with_capacity(finite.len());
    for c in finite {
        if points.last() != Some(&c) {
            points.push(c);
        }
    }
    if kind == ShapeKind::Polygon && points.len() > 1 && points.first() == points.last() {
        points.pop();
    }

    let line = LineString::from(points.iter().map(|c| c.to_coord()).collect::<Vec<_>>());

    match kind {
        ShapeKind::Line => {
            if points.len() < 2 {
                metrics.warn(MetricWarning::Degenerate);
                metrics.centroid = points.first().copied();
                return metrics;
            }
            metrics.set_length_meters(line.geodesic_length());
            metrics.centroid = line.centroid().map(|p| LatLng::from_coord(p.0));
        }
        ShapeKind::Polygon => {
            if points.len() < 3 {
                metrics.warn(MetricWarning::Degenerate);
                if points.len() == 2 {
                    metrics.set_length_meters(2.0 * line.geodesic_length());
                }
                metrics.centroid = line.centroid().map(|p| LatLng::from_coord(p.0));
                return metrics;
            }

            let polygon = Polygon::new(line, vec![]);
            if ring_self_intersects(&points) {
                metrics.warn(MetricWarning::SelfIntersecting);
            }

            let (perimeter, area) = polygon.geodesic_perimeter_area_unsigned();
            if polygon.unsigned_area() < MIN_PLANAR_AREA {
                metrics.set_area(0.0);
            } else {
                metrics.set_area(area);
            }
            metrics.set_length_meters(perimeter);
            if metrics.area_sq_meters == 0.0 {
                metrics.warn(MetricWarning::Degenerate);
            }

            metrics.centroid = polygon
                .centroid()
                .or_else(|| polygon.exterior().centroid())
                .map(|p| LatLng::from_coord(p.0));
        }
    }

    if metrics.is_degenerate() || metrics.warnings.contains(&MetricWarning::SelfIntersecting) {
        tracing::warn!(
            "Metrics for {} with {} vertices: {:?}",
            kind,
            points.len(),
            metrics.warnings
        );
    }

    metrics
}

/// Checks whether any two non-adjacent edges of an open ring intersect.
fn ring_self_intersects(ring: &[LatLng]) -> bool {
    let n = ring.len();
    if n < 4 {
        return false;
    }
    let edges: Vec<Line<f64>> = (0..n)
        .map(|i| Line::new(ring[i].to_coord(), ring[(i + 1) % n].to_coord()))
        .collect();

    for i in 0..n {
        for j in (i + 2)..n {
            // first and last edges share the closing vertex
            if i == 0 && j == n - 1 {
                continue;
            }
            if line_intersection(edges[i], edges[j]).is_some() {
                return true;
            }
        }
    }
    false
}
