//! Errors raised while reading, writing and checking the config file.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure to load or store the config file
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("cannot read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("cannot write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("{} is not valid JSON: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("{} is not valid TOML: {source}", path.display())]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("cannot encode config: {0}")]
    Encode(String),

    /// Only `.json` and `.toml` files are understood.
    #[error("unsupported config file extension '{0}'")]
    UnsupportedFormat(String),

    #[error("no configuration directory on this platform")]
    NoConfigDir,

    #[error(transparent)]
    Invalid(#[from] ConfigError),
}

/// A config value that fails validation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} is out of range: {value}")]
    OutOfRange { key: &'static str, value: String },

    #[error("{key} must not be empty")]
    Empty { key: &'static str },

    #[error("{key}: {reason}")]
    BadValue { key: &'static str, reason: String },
}

pub type SettingsResult<T> = Result<T, SettingsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_file() {
        let err = SettingsError::Read {
            path: PathBuf::from("/etc/fieldmap/config.toml"),
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        };
        assert_eq!(
            err.to_string(),
            "cannot read /etc/fieldmap/config.toml: no such file"
        );

        let err = SettingsError::UnsupportedFormat("yaml".to_string());
        assert_eq!(err.to_string(), "unsupported config file extension 'yaml'");
    }

    #[test]
    fn test_validation_error_is_transparent() {
        let err: SettingsError = ConfigError::OutOfRange {
            key: "view.located_zoom",
            value: "25".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "view.located_zoom is out of range: 25");
        assert!(matches!(
            err,
            SettingsError::Invalid(ConfigError::OutOfRange { .. })
        ));

        let err = ConfigError::Empty {
            key: "export.report_root",
        };
        assert_eq!(err.to_string(), "export.report_root must not be empty");
    }
}
