//! Shape annotations: name, color, optional label and field dates.

use chrono::NaiveDate;
use fieldmap_core::ShapeId;
use serde::{Deserialize, Serialize};

/// Colors handed out when the user does not pick one
pub const DEFAULT_PALETTE: [&str; 6] = [
    "#2ecc71", "#f1c40f", "#e74c3c", "#3498db", "#9b59b6", "#e67e22",
];

/// Name given to a shape whose metadata prompt was dismissed.
pub fn default_name(id: ShapeId) -> String {
    format!("Block {}", id.0)
}

/// Accepts any non-empty CSS color string that cannot break out of an
/// attribute or style declaration.
pub fn is_valid_color(color: &str) -> bool {
    let trimmed = color.trim();
    !trimmed.is_empty() && !trimmed.contains(['<', '>', '"', ';', '{', '}'])
}

/// Agronomic dates attached to a block
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDates {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planting: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub harvest: Option<NaiveDate>,
}

impl FieldDates {
    pub fn is_empty(&self) -> bool {
        self.planting.is_none() && self.application.is_none() && self.harvest.is_none()
    }
}

/// What the user typed into the metadata prompt
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataInput {
    pub name: String,
    /// Palette pick or free CSS color; `None` takes the next palette entry.
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub dates: FieldDates,
}

impl MetadataInput {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// Metadata attached to a shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub name: String,
    pub color: String,
    /// Free text shown as the floating label instead of the name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub dates: FieldDates,
}

impl Annotation {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
            label: None,
            dates: FieldDates::default(),
        }
    }

    /// Text for the floating label.
    pub fn display_label(&self) -> &str {
        match self.label.as_deref() {
            Some(label) if !label.trim().is_empty() => label,
            _ => &self.name,
        }
    }
}

/// Cycling color palette
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: Vec<String>,
    cursor: usize,
}

impl Palette {
    /// Creates a palette; an empty list falls back to [`DEFAULT_PALETTE`].
    pub fn new(colors: Vec<String>) -> Self {
        let colors = if colors.is_empty() {
            DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect()
        } else {
            colors
        };
        Self { colors, cursor: 0 }
    }

    /// Returns the next color, wrapping around.
    pub fn next_color(&mut self) -> String {
        let color = self.colors[self.cursor % self.colors.len()].clone();
        self.cursor = (self.cursor + 1) % self.colors.len();
        color
    }

    pub fn colors(&self) -> &[String] {
        &self.colors
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
