//! Popup, tooltip and floating label text for annotated shapes.

use fieldmap_core::units::{format_area, format_length_km, round2};
use fieldmap_core::{AreaUnit, LatLng, ShapeKind};
use serde::{Deserialize, Serialize};

use crate::annotation::Annotation;
use crate::metrics::ShapeMetrics;

/// Escapes text for inclusion in HTML content or attributes.
pub fn html_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Builds the popup body shown when a shape is opened.
pub fn popup_html(kind: ShapeKind, annotation: &Annotation, metrics: &ShapeMetrics) -> String {
    let mut html = format!("<b>{}</b><br>", html_escape(&annotation.name));

    match kind {
        ShapeKind::Polygon => {
            html.push_str(&format!(
                "Área: {} ({})<br>",
                format_area(metrics.area_sq_meters, AreaUnit::Hectares),
                format_area(metrics.area_sq_meters, AreaUnit::Acres),
            ));
            html.push_str(&format!(
                "Perímetro: {}<br>",
                format_length_km(metrics.length_km)
            ));
        }
        ShapeKind::Line => {
            html.push_str(&format!(
                "Comprimento: {}<br>",
                format_length_km(metrics.length_km)
            ));
        }
    }

    if let Some(c) = metrics.centroid {
        html.push_str(&format!("Centro: {}<br>", c));
    }

    let dates = &annotation.dates;
    for (label, date) in [
        ("Plantio", dates.planting),
        ("Aplicação", dates.application),
        ("Colheita", dates.harvest),
    ] {
        if let Some(date) = date {
            html.push_str(&format!("{}: {}<br>", label, date.format("%d/%m/%Y")));
        }
    }

    html
}

/// Hover text: `"<name> - <ha> ha"` or `"<name> - <km> km"`, name escaped.
pub fn tooltip_text(kind: ShapeKind, annotation: &Annotation, metrics: &ShapeMetrics) -> String {
    let name = html_escape(&annotation.name);
    match kind {
        ShapeKind::Polygon => format!("{} - {:.2} ha", name, round2(metrics.area_ha)),
        ShapeKind::Line => format!("{} - {:.2} km", name, round2(metrics.length_km)),
    }
}

/// Permanent label drawn at the shape's center
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloatingLabel {
    pub text: String,
    pub anchor: LatLng,
}

impl FloatingLabel {
    /// Returns `None` when the shape has no centroid to anchor to.
    pub fn for_shape(annotation: &Annotation, metrics: &ShapeMetrics) -> Option<Self> {
        metrics.centroid.map(|anchor| Self {
            text: annotation.display_label().to_string(),
            anchor,
        })
    }
}
