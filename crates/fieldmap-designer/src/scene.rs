//! Immutable snapshot of what the map currently shows.
//!
//! Exporters rasterize a [`Scene`] so they never touch the live editor
//! state while rendering.

use fieldmap_core::{LatLng, ShapeId, ShapeKind};
use serde::{Deserialize, Serialize};

use crate::basemap::Basemap;
use crate::popup::FloatingLabel;
use crate::style::ShapeStyle;
use crate::view::MapView;

/// One shape as drawn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneShape {
    pub id: ShapeId,
    pub kind: ShapeKind,
    pub coords: Vec<LatLng>,
    /// Style with selection emphasis already applied
    pub style: ShapeStyle,
    pub label: Option<FloatingLabel>,
}

/// Everything needed to render the map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub view: MapView,
    pub basemap: Basemap,
    pub shapes: Vec<SceneShape>,
}

impl Scene {
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// South-west and north-east corners of all shapes.
    pub fn bounds(&self) -> Option<(LatLng, LatLng)> {
        let mut coords = self.shapes.iter().flat_map(|s| s.coords.iter());
        let first = *coords.next()?;
        Some(coords.fold((first, first), |(mut sw, mut ne), c| {
            sw.lat = sw.lat.min(c.lat);
            sw.lng = sw.lng.min(c.lng);
            ne.lat = ne.lat.max(c.lat);
            ne.lng = ne.lng.max(c.lng);
            (sw, ne)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds() {
        let scene = Scene {
            view: MapView {
                center: LatLng::new(0.0, 0.0),
                zoom: 17,
            },
            basemap: Basemap::default(),
            shapes: vec![
                SceneShape {
                    id: ShapeId(1),
                    kind: ShapeKind::Line,
                    coords: vec![LatLng::new(1.0, 2.0), LatLng::new(-1.0, 3.0)],
                    style: ShapeStyle::default(),
                    label: None,
                },
                SceneShape {
                    id: ShapeId(2),
                    kind: ShapeKind::Line,
                    coords: vec![LatLng::new(0.5, -4.0)],
                    style: ShapeStyle::default(),
                    label: None,
                },
            ],
        };
        assert_eq!(
            scene.bounds(),
            Some((LatLng::new(-1.0, -4.0), LatLng::new(1.0, 3.0)))
        );
    }
}
