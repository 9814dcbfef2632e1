//! Scene rasterization using tiny-skia.
//!
//! Renders the exported view without the tile layer: a plain background,
//! each shape filled and stroked with its resolved style, selected shapes
//! with their dashed emphasis, and a dot at every label anchor.

use async_trait::async_trait;
use fieldmap_core::{ExportError, ShapeKind};
use fieldmap_designer::{Scene, SceneShape};
use image::{Rgb, RgbImage};
use tiny_skia::{Color, FillRule, Paint, PathBuilder, Pixmap, Stroke, StrokeDash, Transform};

use crate::projection::Projection;

/// Turns a scene snapshot into an image
#[async_trait]
pub trait Rasterizer: Send + Sync {
    async fn rasterize(&self, scene: &Scene) -> Result<RgbImage, ExportError>;
}

fn background_color() -> Color {
    Color::from_rgba8(245, 245, 240, 255)
}
fn fallback_color() -> Color {
    Color::from_rgba8(51, 136, 255, 255)
}

/// Default rasterizer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeRasterizer {
    pub width: u32,
    pub height: u32,
    pub padding: u32,
}

impl Default for ShapeRasterizer {
    fn default() -> Self {
        Self {
            width: 1600,
            height: 1200,
            padding: 48,
        }
    }
}

impl ShapeRasterizer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Renders synchronously.
    pub fn render(&self, scene: &Scene) -> Result<RgbImage, ExportError> {
        let mut pixmap =
            Pixmap::new(self.width, self.height).ok_or_else(|| ExportError::Rasterization {
                reason: format!("invalid image size {}x{}", self.width, self.height),
            })?;
        pixmap.fill(background_color());

        let projection = Projection::fit(scene, self.width, self.height, self.padding);
        for shape in &scene.shapes {
            draw_shape(&mut pixmap, &projection, shape);
        }
        for shape in &scene.shapes {
            if let Some(label) = &shape.label {
                let (x, y) = projection.project(label.anchor);
                if let Some(dot) = PathBuilder::from_circle(x, y, 3.0) {
                    let mut paint = Paint::default();
                    paint.set_color(Color::from_rgba8(30, 30, 30, 255));
                    paint.anti_alias = true;
                    pixmap.fill_path(&dot, &paint, FillRule::Winding, Transform::identity(), None);
                }
            }
        }

        Ok(to_rgb_image(&pixmap))
    }
}

#[async_trait]
impl Rasterizer for ShapeRasterizer {
    async fn rasterize(&self, scene: &Scene) -> Result<RgbImage, ExportError> {
        let rasterizer = *self;
        let scene = scene.clone();
        tokio::task::spawn_blocking(move || rasterizer.render(&scene))
            .await
            .map_err(|e| ExportError::Rasterization {
                reason: e.to_string(),
            })?
    }
}

fn draw_shape(pixmap: &mut Pixmap, projection: &Projection, shape: &SceneShape) {
    let mut points = shape.coords.iter().map(|c| projection.project(*c));
    let Some((x0, y0)) = points.next() else {
        return;
    };

    let mut pb = PathBuilder::new();
    pb.move_to(x0, y0);
    for (x, y) in points {
        pb.line_to(x, y);
    }
    if shape.kind == ShapeKind::Polygon {
        pb.close();
    }
    let Some(path) = pb.finish() else {
        return;
    };

    let color = parse_css_color(&shape.style.color).unwrap_or_else(fallback_color);

    if shape.kind == ShapeKind::Polygon && shape.style.fill_opacity > 0.0 {
        let mut fill = color;
        fill.apply_opacity(shape.style.fill_opacity.clamp(0.0, 1.0));
        let mut paint = Paint::default();
        paint.set_color(fill);
        paint.anti_alias = true;
        pixmap.fill_path(&path, &paint, FillRule::EvenOdd, Transform::identity(), None);
    }

    let mut paint = Paint::default();
    paint.set_color(color);
    paint.anti_alias = true;
    let stroke = Stroke {
        width: shape.style.weight.max(0.5),
        dash: shape
            .style
            .dash_segments()
            .and_then(|segments| StrokeDash::new(segments, 0.0)),
        ..Default::default()
    };
    pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
}

fn to_rgb_image(pixmap: &Pixmap) -> RgbImage {
    let width = pixmap.width();
    let data = pixmap.data();
    RgbImage::from_fn(width, pixmap.height(), |x, y| {
        let idx = ((y * width + x) * 4) as usize;
        // background is opaque, so premultiplied RGB equals straight RGB
        Rgb([data[idx], data[idx + 1], data[idx + 2]])
    })
}

/// Parses the CSS color forms users type into the palette box.
///
/// Supports `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb()`, `rgba()` and a handful
/// of named colors.
pub fn parse_css_color(input: &str) -> Option<Color> {
    let s = input.trim().to_ascii_lowercase();

    if let Some(hex) = s.strip_prefix('#') {
        let channel = |i: usize, len: usize| u8::from_str_radix(hex.get(i..i + len)?, 16).ok();
        return match hex.len() {
            3 => {
                let r = channel(0, 1)?;
                let g = channel(1, 1)?;
                let b = channel(2, 1)?;
                Some(Color::from_rgba8(r * 17, g * 17, b * 17, 255))
            }
            6 => Some(Color::from_rgba8(channel(0, 2)?, channel(2, 2)?, channel(4, 2)?, 255)),
            8 => Some(Color::from_rgba8(
                channel(0, 2)?,
                channel(2, 2)?,
                channel(4, 2)?,
                channel(6, 2)?,
            )),
            _ => None,
        };
    }

    if let Some(args) = s
        .strip_prefix("rgba(")
        .or_else(|| s.strip_prefix("rgb("))
        .and_then(|rest| rest.strip_suffix(')'))
    {
        let parts: Vec<&str> = args.split(',').map(str::trim).collect();
        let byte = |p: &str| p.parse::<f32>().ok().map(|v| v.clamp(0.0, 255.0) as u8);
        return match parts.as_slice() {
            [r, g, b] => Some(Color::from_rgba8(byte(r)?, byte(g)?, byte(b)?, 255)),
            [r, g, b, a] => {
                let alpha = a.parse::<f32>().ok()?.clamp(0.0, 1.0);
                Some(Color::from_rgba8(
                    byte(r)?,
                    byte(g)?,
                    byte(b)?,
                    (alpha * 255.0).round() as u8,
                ))
            }
            _ => None,
        };
    }

    let named = match s.as_str() {
        "black" => (0, 0, 0),
        "white" => (255, 255, 255),
        "red" => (255, 0, 0),
        "green" => (0, 128, 0),
        "blue" => (0, 0, 255),
        "yellow" => (255, 255, 0),
        "orange" => (255, 165, 0),
        "purple" => (128, 0, 128),
        "brown" => (165, 42, 42),
        "gray" | "grey" => (128, 128, 128),
        _ => return None,
    };
    Some(Color::from_rgba8(named.0, named.1, named.2, 255))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldmap_core::{LatLng, ShapeId};
    use fieldmap_designer::{Basemap, MapView, ShapeStyle};

    fn rgb8(c: Color) -> (u8, u8, u8) {
        let c = c.to_color_u8();
        (c.red(), c.green(), c.blue())
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(rgb8(parse_css_color("#ff0000").unwrap()), (255, 0, 0));
        assert_eq!(rgb8(parse_css_color("#0F0").unwrap()), (0, 255, 0));
        assert!(parse_css_color("#12345").is_none());
        assert!(parse_css_color("#gg0000").is_none());
    }

    #[test]
    fn test_parse_rgb_and_named() {
        assert_eq!(rgb8(parse_css_color("rgb(1, 2, 3)").unwrap()), (1, 2, 3));
        let c = parse_css_color("rgba(10,20,30,0.5)").unwrap().to_color_u8();
        assert_eq!(c.alpha(), 128);
        assert_eq!(rgb8(parse_css_color("Orange").unwrap()), (255, 165, 0));
        assert!(parse_css_color("chartreuse-ish").is_none());
    }

    #[test]
    fn test_render_paints_shape() {
        let scene = Scene {
            view: MapView {
                center: LatLng::new(0.0, 0.0),
                zoom: 17,
            },
            basemap: Basemap::default(),
            shapes: vec![SceneShape {
                id: ShapeId(1),
                kind: ShapeKind::Polygon,
                coords: vec![
                    LatLng::new(0.0, 0.0),
                    LatLng::new(0.0, 0.01),
                    LatLng::new(0.01, 0.01),
                    LatLng::new(0.01, 0.0),
                ],
                style: ShapeStyle {
                    fill_opacity: 1.0,
                    ..ShapeStyle::new("#ff0000")
                },
                label: None,
            }],
        };

        let image = ShapeRasterizer::new(200, 100).render(&scene).unwrap();
        assert_eq!(image.dimensions(), (200, 100));
        assert_eq!(image.get_pixel(100, 50), &Rgb([255, 0, 0]));
        assert_eq!(image.get_pixel(1, 1), &Rgb([245, 245, 240]));
    }

    #[test]
    fn test_zero_size_rejected() {
        let scene = Scene {
            view: MapView {
                center: LatLng::new(0.0, 0.0),
                zoom: 17,
            },
            basemap: Basemap::default(),
            shapes: Vec::new(),
        };
        assert!(matches!(
            ShapeRasterizer::new(0, 10).render(&scene),
            Err(ExportError::Rasterization { .. })
        ));
    }
}
