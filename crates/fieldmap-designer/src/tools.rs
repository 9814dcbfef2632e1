//! Draw toolbar configuration.

use fieldmap_core::{EditorError, ShapeKind};
use serde::{Deserialize, Serialize};

/// Which draw and edit tools the toolbar offers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawSettings {
    pub polygon: bool,
    pub rectangle: bool,
    pub polyline: bool,
    pub edit: bool,
    pub remove: bool,
}

impl Default for DrawSettings {
    fn default() -> Self {
        Self {
            polygon: true,
            rectangle: true,
            polyline: true,
            edit: true,
            remove: true,
        }
    }
}

impl DrawSettings {
    pub fn check_draw(&self, kind: ShapeKind) -> Result<(), EditorError> {
        let enabled = match kind {
            ShapeKind::Polygon => self.polygon,
            ShapeKind::Line => self.polyline,
        };
        if enabled {
            Ok(())
        } else {
            Err(EditorError::ToolDisabled { kind })
        }
    }

    pub fn check_rectangle(&self) -> Result<(), EditorError> {
        if self.rectangle {
            Ok(())
        } else {
            Err(EditorError::ToolDisabled {
                kind: ShapeKind::Polygon,
            })
        }
    }

    pub fn check_edit(&self) -> Result<(), EditorError> {
        if self.edit {
            Ok(())
        } else {
            Err(EditorError::EditDisabled {
                tool: "edit".to_string(),
            })
        }
    }

    pub fn check_remove(&self) -> Result<(), EditorError> {
        if self.remove {
            Ok(())
        } else {
            Err(EditorError::EditDisabled {
                tool: "remove".to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_polyline() {
        let tools = DrawSettings {
            polyline: false,
            ..Default::default()
        };
        assert!(tools.check_draw(ShapeKind::Polygon).is_ok());
        assert_eq!(
            tools.check_draw(ShapeKind::Line),
            Err(EditorError::ToolDisabled {
                kind: ShapeKind::Line
            })
        );
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let tools: DrawSettings = serde_json::from_str(r#"{"remove": false}"#).unwrap();
        assert!(tools.polygon);
        assert!(tools.check_remove().is_err());
    }
}
