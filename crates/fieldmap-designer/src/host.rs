//! Inbound host messages and their acknowledgements.
//!
//! Messages are JSON objects discriminated by a `type` field. Anything that
//! fails to decode turns into a [`CommandError`]; the editor answers it with
//! an `ok: false` [`HostResponse`] instead of failing.

use fieldmap_core::CommandError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::basemap::BasemapKind;

/// Commands the embedding host can send
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum HostCommand {
    /// Restyle every selected shape.
    #[serde(rename = "applyColorToSelected")]
    ApplyColorToSelected {
        color: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
    },
    /// Flip the basemap attachment.
    #[serde(rename = "toggleBaseMap")]
    ToggleBaseMap,
    /// Recenter on a farm location.
    #[serde(rename = "setFazendaLocalizacao")]
    SetFarmLocation { latitude: f64, longitude: f64 },
    /// Switch the tile source.
    #[serde(rename = "setBaseMap")]
    SetBaseMap { source: BasemapKind },
    /// Delete every selected shape.
    #[serde(rename = "deleteSelected")]
    DeleteSelected,
}

/// Wire names of every known command
pub const COMMAND_TYPES: [&str; 5] = [
    "applyColorToSelected",
    "toggleBaseMap",
    "setFazendaLocalizacao",
    "setBaseMap",
    "deleteSelected",
];

impl HostCommand {
    /// Decodes a raw message.
    pub fn parse(message: &str) -> Result<Self, CommandError> {
        let value: Value = serde_json::from_str(message).map_err(|e| CommandError::Malformed {
            reason: e.to_string(),
        })?;
        Self::from_value(value)
    }

    /// Decodes an already-parsed message.
    pub fn from_value(value: Value) -> Result<Self, CommandError> {
        let message_type = match value.get("type") {
            Some(Value::String(t)) => t.clone(),
            Some(_) => {
                return Err(CommandError::Malformed {
                    reason: "`type` must be a string".to_string(),
                })
            }
            None => {
                return Err(CommandError::Malformed {
                    reason: "missing `type` field".to_string(),
                })
            }
        };

        if !COMMAND_TYPES.contains(&message_type.as_str()) {
            return Err(CommandError::UnknownType { message_type });
        }

        serde_json::from_value(value).map_err(|e| CommandError::Malformed {
            reason: e.to_string(),
        })
    }

    /// The wire `type` of this command.
    pub fn type_name(&self) -> &'static str {
        match self {
            HostCommand::ApplyColorToSelected { .. } => "applyColorToSelected",
            HostCommand::ToggleBaseMap => "toggleBaseMap",
            HostCommand::SetFarmLocation { .. } => "setFazendaLocalizacao",
            HostCommand::SetBaseMap { .. } => "setBaseMap",
            HostCommand::DeleteSelected => "deleteSelected",
        }
    }
}

/// Acknowledgement sent back for every host message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostResponse {
    #[serde(rename = "type")]
    pub response_type: String,
    pub command: String,
    pub ok: bool,
    /// Shapes (or layers) the command changed
    pub affected: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HostResponse {
    pub fn ok(command: impl Into<String>, affected: usize) -> Self {
        Self {
            response_type: "ack".to_string(),
            command: command.into(),
            ok: true,
            affected,
            error: None,
        }
    }

    pub fn failed(command: impl Into<String>, error: impl ToString) -> Self {
        Self {
            response_type: "ack".to_string(),
            command: command.into(),
            ok: false,
            affected: 0,
            error: Some(error.to_string()),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(
                r#"{{"type":"ack","command":"{}","ok":false,"affected":0}}"#,
                self.command
            )
        })
    }
}

/// Best-effort `type` of a message that may not decode.
pub fn message_type_of(message: &str) -> String {
    serde_json::from_str::<Value>(message)
        .ok()
        .and_then(|v| v.get("type").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_apply_color() {
        let cmd = HostCommand::parse(
            r##"{"type":"applyColorToSelected","color":"#ff0000","label":"Soja"}"##,
        )
        .unwrap();
        assert_eq!(
            cmd,
            HostCommand::ApplyColorToSelected {
                color: "#ff0000".to_string(),
                label: Some("Soja".to_string()),
            }
        );
        assert_eq!(cmd.type_name(), "applyColorToSelected");
    }

    #[test]
    fn test_parse_location() {
        let cmd = HostCommand::parse(
            r#"{"type":"setFazendaLocalizacao","latitude":-15.7,"longitude":-47.9}"#,
        )
        .unwrap();
        assert_eq!(
            cmd,
            HostCommand::SetFarmLocation {
                latitude: -15.7,
                longitude: -47.9
            }
        );
    }

    #[test]
    fn test_parse_unit_variants() {
        assert_eq!(
            HostCommand::parse(r#"{"type":"toggleBaseMap"}"#).unwrap(),
            HostCommand::ToggleBaseMap
        );
        assert_eq!(
            HostCommand::parse(r#"{"type":"setBaseMap","source":"satellite"}"#).unwrap(),
            HostCommand::SetBaseMap {
                source: BasemapKind::Satellite
            }
        );
    }

    #[test]
    fn test_unknown_type() {
        let err = HostCommand::parse(r#"{"type":"launchRockets"}"#).unwrap_err();
        assert_eq!(
            err,
            CommandError::UnknownType {
                message_type: "launchRockets".to_string()
            }
        );
    }

    #[test]
    fn test_malformed() {
        assert!(matches!(
            HostCommand::parse("not json"),
            Err(CommandError::Malformed { .. })
        ));
        assert!(matches!(
            HostCommand::parse(r#"{"color":"red"}"#),
            Err(CommandError::Malformed { .. })
        ));
        assert!(matches!(
            HostCommand::parse(r#"{"type":"applyColorToSelected"}"#),
            Err(CommandError::Malformed { .. })
        ));
    }

    #[test]
    fn test_response_json() {
        let json = HostResponse::ok("toggleBaseMap", 1).to_json();
        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["type"], "ack");
        assert_eq!(value["ok"], true);
        assert_eq!(value["affected"], 1);
        assert!(value.get("error").is_none());

        let failed = HostResponse::failed("unknown", "bad");
        assert!(!failed.ok);
        assert_eq!(failed.error.as_deref(), Some("bad"));
    }

    #[test]
    fn test_message_type_of() {
        assert_eq!(message_type_of(r#"{"type":"x"}"#), "x");
        assert_eq!(message_type_of("{"), "unknown");
    }
}
