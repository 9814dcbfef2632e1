//! Background tile layer.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Available tile sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BasemapKind {
    #[default]
    Standard,
    Satellite,
}

impl BasemapKind {
    pub fn tile_source(&self) -> TileSource {
        match self {
            BasemapKind::Standard => TileSource {
                url_template: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png",
                attribution: "© OpenStreetMap contributors",
                max_zoom: 19,
            },
            BasemapKind::Satellite => TileSource {
                url_template: "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}",
                attribution: "Tiles © Esri",
                max_zoom: 19,
            },
        }
    }
}

impl std::fmt::Display for BasemapKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BasemapKind::Standard => write!(f, "standard"),
            BasemapKind::Satellite => write!(f, "satellite"),
        }
    }
}

impl FromStr for BasemapKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "standard" | "osm" => Ok(BasemapKind::Standard),
            "satellite" => Ok(BasemapKind::Satellite),
            other => Err(format!("Unknown basemap: {}", other)),
        }
    }
}

/// Tile URL template and attribution for a source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileSource {
    pub url_template: &'static str,
    pub attribution: &'static str,
    pub max_zoom: u8,
}

/// Exactly one active tile source, attached to the view or not
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Basemap {
    active: BasemapKind,
    attached: bool,
}

impl Basemap {
    pub fn new(active: BasemapKind) -> Self {
        Self {
            active,
            attached: true,
        }
    }

    pub fn active(&self) -> BasemapKind {
        self.active
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Flips attachment and returns the new value.
    pub fn toggle(&mut self) -> bool {
        self.attached = !self.attached;
        self.attached
    }

    /// Returns whether anything changed.
    pub fn attach(&mut self) -> bool {
        !std::mem::replace(&mut self.attached, true)
    }

    /// Returns whether anything changed.
    pub fn detach(&mut self) -> bool {
        std::mem::replace(&mut self.attached, false)
    }

    /// Switches the tile source, keeping the attachment as it is.
    pub fn set_active(&mut self, kind: BasemapKind) -> bool {
        std::mem::replace(&mut self.active, kind) != kind
    }
}

impl Default for Basemap {
    fn default() -> Self {
        Self::new(BasemapKind::default())
    }
}
