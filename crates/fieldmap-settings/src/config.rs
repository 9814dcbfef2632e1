//! Configuration management for Fieldmap
//!
//! Provides configuration file handling and validation. Supports JSON and
//! TOML file formats; the default file lives in the platform config
//! directory.
//!
//! Configuration is organized into sections:
//! - View (fallback center and zoom levels)
//! - Basemap (initial tile source)
//! - Draw (enabled draw and edit tools)
//! - Palette (colors offered when annotating)
//! - Export (settle delay, storage prefix, download directory, image size)

use fieldmap_core::LatLng;
use fieldmap_designer::annotation::is_valid_color;
use fieldmap_designer::{BasemapKind, DrawSettings, EditorOptions, ViewDefaults, DEFAULT_PALETTE};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ConfigError, SettingsError, SettingsResult};

/// Initial view settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSettings {
    /// Center latitude when no farm is located
    pub fallback_latitude: f64,
    /// Center longitude when no farm is located
    pub fallback_longitude: f64,
    /// Zoom when no farm is located
    pub fallback_zoom: u8,
    /// Zoom after centering on a farm
    pub located_zoom: u8,
}

impl Default for ViewSettings {
    fn default() -> Self {
        let defaults = ViewDefaults::default();
        Self {
            fallback_latitude: defaults.fallback_center.lat,
            fallback_longitude: defaults.fallback_center.lng,
            fallback_zoom: defaults.fallback_zoom,
            located_zoom: defaults.located_zoom,
        }
    }
}

impl ViewSettings {
    pub fn view_defaults(&self) -> ViewDefaults {
        ViewDefaults {
            fallback_center: LatLng::new(self.fallback_latitude, self.fallback_longitude),
            fallback_zoom: self.fallback_zoom,
            located_zoom: self.located_zoom,
        }
    }
}

/// Basemap settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BasemapSettings {
    /// Tile source active at startup
    pub source: BasemapKind,
}

/// Palette settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteSettings {
    pub colors: Vec<String>,
}

impl Default for PaletteSettings {
    fn default() -> Self {
        Self {
            colors: DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// Report export settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Wait after hiding the tile layer before capturing, in milliseconds
    pub settle_delay_ms: u64,
    /// Storage prefix for uploaded reports
    pub report_root: String,
    /// Directory for downloaded reports
    pub output_dir: PathBuf,
    pub image_width: u32,
    pub image_height: u32,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            settle_delay_ms: 500,
            report_root: "reports".to_string(),
            output_dir: dirs::download_dir().unwrap_or_else(|| PathBuf::from(".")),
            image_width: 1600,
            image_height: 1200,
        }
    }
}

impl ExportSettings {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub view: ViewSettings,
    pub basemap: BasemapSettings,
    pub draw: DrawSettings,
    pub palette: PaletteSettings,
    pub export: ExportSettings,
}

enum Format {
    Json,
    Toml,
}

fn format_of(path: &Path) -> SettingsResult<Format> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("toml") => Ok(Format::Toml),
        other => Err(SettingsError::UnsupportedFormat(
            other.unwrap_or("none").to_string(),
        )),
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// `<config dir>/fieldmap/config.toml`
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("fieldmap").join("config.toml"))
            .ok_or(SettingsError::NoConfigDir)
    }

    /// Loads the default file, or defaults when it does not exist yet.
    pub fn load_or_default() -> SettingsResult<Self> {
        let path = Self::default_path()?;
        if path.exists() {
            Self::load_from_file(&path)
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = format_of(path)?;
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = match format {
            Format::Json => {
                serde_json::from_str(&content).map_err(|source| SettingsError::Json {
                    path: path.to_path_buf(),
                    source,
                })?
            }
            Format::Toml => toml::from_str(&content).map_err(|source| SettingsError::Toml {
                path: path.to_path_buf(),
                source,
            })?,
        };

        config.validate()?;
        tracing::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match format_of(path)? {
            Format::Json => serde_json::to_string_pretty(self)
                .map_err(|e| SettingsError::Encode(e.to_string()))?,
            Format::Toml => toml::to_string_pretty(self)
                .map_err(|e| SettingsError::Encode(e.to_string()))?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| SettingsError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(path, content).map_err(|source| SettingsError::Write {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        // View
        let center = LatLng::new(self.view.fallback_latitude, self.view.fallback_longitude);
        if !center.is_valid() {
            return Err(ConfigError::OutOfRange {
                key: "view.fallback",
                value: center.to_string(),
            }
            .into());
        }
        for (key, zoom) in [
            ("view.fallback_zoom", self.view.fallback_zoom),
            ("view.located_zoom", self.view.located_zoom),
        ] {
            if zoom > self.basemap.source.tile_source().max_zoom {
                return Err(ConfigError::OutOfRange {
                    key,
                    value: zoom.to_string(),
                }
                .into());
            }
        }

        // Palette
        if let Some(bad) = self.palette.colors.iter().find(|c| !is_valid_color(c)) {
            return Err(ConfigError::BadValue {
                key: "palette.colors",
                reason: format!("invalid color {:?}", bad),
            }
            .into());
        }

        // Export
        if self.export.image_width == 0 || self.export.image_height == 0 {
            return Err(ConfigError::BadValue {
                key: "export.image_width/image_height",
                reason: "must be > 0".to_string(),
            }
            .into());
        }
        if self.export.report_root.trim().is_empty() {
            return Err(ConfigError::Empty {
                key: "export.report_root",
            }
            .into());
        }
        if self.export.settle_delay_ms > 60_000 {
            return Err(ConfigError::OutOfRange {
                key: "export.settle_delay_ms",
                value: self.export.settle_delay_ms.to_string(),
            }
            .into());
        }

        Ok(())
    }

    /// Editor startup options derived from this config.
    pub fn editor_options(&self) -> EditorOptions {
        EditorOptions {
            palette: self.palette.colors.clone(),
            tools: self.draw,
            basemap: self.basemap.source,
            view_defaults: self.view.view_defaults(),
            ..Default::default()
        }
    }
}
