//! Data models for geographic positions and shape identity
//!
//! This module provides:
//! - Latitude/longitude pairs with validation and `geo` conversions
//! - Shape identifiers assigned by the editor
//! - Shape kinds (polygon boundaries and drainage lines)

use serde::{Deserialize, Serialize};
use std::fmt;

/// A geographic coordinate in decimal degrees (WGS84)
///
/// Stored latitude first, the order the editor receives coordinates from draw
/// events. Conversions to `geo` types swap to `(x = lng, y = lat)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    /// Latitude in degrees, -90..=90
    pub lat: f64,
    /// Longitude in degrees, -180..=180
    pub lng: f64,
}

impl LatLng {
    /// Create a new coordinate
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Check that both ordinates are finite and inside the WGS84 range
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }

    /// Convert to a `geo` coordinate (x = longitude, y = latitude)
    pub fn to_coord(self) -> geo::Coord<f64> {
        geo::Coord {
            x: self.lng,
            y: self.lat,
        }
    }

    /// Build from a `geo` coordinate (x = longitude, y = latitude)
    pub fn from_coord(coord: geo::Coord<f64>) -> Self {
        Self {
            lat: coord.y,
            lng: coord.x,
        }
    }

    /// Return `[lng, lat]`, the GeoJSON position order
    pub fn to_position(self) -> Vec<f64> {
        vec![self.lng, self.lat]
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.lat, self.lng)
    }
}

impl From<(f64, f64)> for LatLng {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self { lat, lng }
    }
}

/// Identifier of a shape in the editor collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ShapeId(pub u64);

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Kind of drawn geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    /// Closed field boundary
    Polygon,
    /// Open polyline, e.g. a drainage line
    Line,
}

impl ShapeKind {
    /// Minimum number of distinct vertices for a non-degenerate shape
    pub fn min_vertices(&self) -> usize {
        match self {
            ShapeKind::Polygon => 3,
            ShapeKind::Line => 2,
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeKind::Polygon => write!(f, "polygon"),
            ShapeKind::Line => write!(f, "line"),
        }
    }
}
