//! Fieldmap Settings Crate
//!
//! Loads, validates and saves the editor configuration.

pub mod config;
pub mod error;

pub use config::{
    BasemapSettings, Config, ExportSettings, PaletteSettings, ViewSettings,
};
pub use error::{ConfigError, SettingsError, SettingsResult};
