//! Web Mercator projection fitted to an image.

use fieldmap_core::LatLng;
use fieldmap_designer::{MapView, Scene};
use std::f64::consts::PI;

/// Tile size the zoom levels refer to
const TILE_SIZE: f64 = 256.0;

/// Mercator is undefined at the poles
const MAX_LATITUDE: f64 = 85.051_128_78;

/// Projects a coordinate to normalized Web Mercator (0..1, y down).
pub fn mercator(c: LatLng) -> (f64, f64) {
    let lat = c.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    let x = (c.lng + 180.0) / 360.0;
    let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0;
    (x, y)
}

/// Maps coordinates to pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Pixels per normalized Mercator unit
    scale: f64,
    /// Normalized Mercator point at the image center
    center: (f64, f64),
    width: f64,
    height: f64,
}

impl Projection {
    /// Centers on a view at its zoom level.
    pub fn for_view(view: &MapView, width: u32, height: u32) -> Self {
        Self {
            scale: TILE_SIZE * 2f64.powi(i32::from(view.zoom)),
            center: mercator(view.center),
            width: f64::from(width),
            height: f64::from(height),
        }
    }

    /// Fits the scene's shapes with `padding` pixels of margin, falling back
    /// to the view when the scene is empty or has no extent.
    pub fn fit(scene: &Scene, width: u32, height: u32, padding: u32) -> Self {
        let view_projection = Self::for_view(&scene.view, width, height);
        let Some((sw, ne)) = scene.bounds() else {
            return view_projection;
        };

        let (x0, y1) = mercator(sw);
        let (x1, y0) = mercator(ne);
        let dx = x1 - x0;
        let dy = y1 - y0;
        let center = ((x0 + x1) / 2.0, (y0 + y1) / 2.0);

        let usable_w = f64::from(width.saturating_sub(2 * padding).max(1));
        let usable_h = f64::from(height.saturating_sub(2 * padding).max(1));
        let scale = match (dx > f64::EPSILON, dy > f64::EPSILON) {
            (true, true) => (usable_w / dx).min(usable_h / dy),
            (true, false) => usable_w / dx,
            (false, true) => usable_h / dy,
            (false, false) => view_projection.scale,
        };

        Self {
            scale,
            center,
            width: f64::from(width),
            height: f64::from(height),
        }
    }

    /// Pixel position of a coordinate.
    pub fn project(&self, c: LatLng) -> (f32, f32) {
        let (x, y) = mercator(c);
        let px = (x - self.center.0) * self.scale + self.width / 2.0;
        let py = (y - self.center.1) * self.scale + self.height / 2.0;
        (px as f32, py as f32)
    }
}
