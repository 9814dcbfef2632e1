//! Path styles for rendered shapes.
//!
//! The stored style is always the base style; selection emphasis is applied
//! on read, so toggling selection twice gives back exactly the base style.

use serde::{Deserialize, Serialize};

/// Dash pattern used for the selected outline
pub const SELECTED_DASH: &str = "6 4";

/// Stroke and fill of a drawn shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    pub color: String,
    pub fill_opacity: f32,
    pub weight: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dash_array: Option<String>,
}

impl ShapeStyle {
    pub fn new(color: impl Into<String>) -> Self {
        Self {
            color: color.into(),
            ..Default::default()
        }
    }

    /// Style with selection emphasis: doubled weight and a dashed outline.
    pub fn emphasized(&self) -> Self {
        Self {
            weight: self.weight * 2.0,
            dash_array: Some(SELECTED_DASH.to_string()),
            ..self.clone()
        }
    }

    /// Resolves the style to draw with.
    pub fn resolve(&self, selected: bool) -> Self {
        if selected {
            self.emphasized()
        } else {
            self.clone()
        }
    }

    /// Parses the dash pattern into segment lengths.
    pub fn dash_segments(&self) -> Option<Vec<f32>> {
        let segments: Vec<f32> = self
            .dash_array
            .as_deref()?
            .split([' ', ','])
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        (!segments.is_empty()).then_some(segments)
    }
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            color: "#3388ff".to_string(),
            fill_opacity: 0.2,
            weight: 3.0,
            dash_array: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emphasis_doubles_weight() {
        let base = ShapeStyle::new("#e74c3c");
        let selected = base.resolve(true);
        assert_eq!(selected.weight, base.weight * 2.0);
        assert_eq!(selected.dash_array.as_deref(), Some(SELECTED_DASH));
        assert_eq!(selected.color, base.color);
    }

    #[test]
    fn test_emphasis_does_not_accumulate() {
        let base = ShapeStyle {
            dash_array: Some("2 2".to_string()),
            ..ShapeStyle::new("#e74c3c")
        };

        let first = base.resolve(true);
        let second = base.resolve(true);
        assert_eq!(first, second);
        assert_eq!(first.weight, 6.0);
        assert_eq!(first.dash_array.as_deref(), Some(SELECTED_DASH));

        let restored = base.resolve(false);
        assert_eq!(restored, base);
        assert_eq!(restored.weight, 3.0);
        assert_eq!(restored.dash_array.as_deref(), Some("2 2"));
    }

    #[test]
    fn test_dash_segments() {
        let style = ShapeStyle::default().emphasized();
        assert_eq!(style.dash_segments(), Some(vec![6.0, 4.0]));
        assert_eq!(ShapeStyle::default().dash_segments(), None);
    }
}
