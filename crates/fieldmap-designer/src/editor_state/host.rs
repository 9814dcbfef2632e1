//! Host command handling.

use fieldmap_core::{AppEvent, BasemapEvent, CommandError, LatLng, Result, ViewEvent};

use super::{ActionOutcome, EditorAction, EditorState};
use crate::basemap::BasemapKind;
use crate::host::{message_type_of, HostCommand, HostResponse};

impl EditorState {
    /// Decodes and applies a raw host message, always answering with an ack.
    pub fn handle_host_message(&mut self, message: &str) -> HostResponse {
        let command = match HostCommand::parse(message) {
            Ok(command) => command,
            Err(e) => {
                tracing::warn!("Rejected host message: {}", e);
                return HostResponse::failed(message_type_of(message), e);
            }
        };

        let name = command.type_name();
        match self.dispatch(EditorAction::Host(command)) {
            Ok(ActionOutcome::Affected(n)) => HostResponse::ok(name, n),
            Ok(_) => HostResponse::ok(name, 0),
            Err(e) => {
                tracing::warn!("Host command {} failed: {}", name, e);
                HostResponse::failed(name, e)
            }
        }
    }

    pub(super) fn apply_host_command(&mut self, command: HostCommand) -> Result<ActionOutcome> {
        let affected = match command {
            HostCommand::ApplyColorToSelected { color, label } => {
                self.apply_color_to_selected(&color, label.as_deref())?
            }
            HostCommand::ToggleBaseMap => {
                self.toggle_basemap();
                1
            }
            HostCommand::SetFarmLocation {
                latitude,
                longitude,
            } => {
                self.recenter_on_farm(latitude, longitude)?;
                1
            }
            HostCommand::SetBaseMap { source } => usize::from(self.set_basemap(source)),
            HostCommand::DeleteSelected => {
                let selected = self.selected_ids();
                self.delete_shapes(&selected).len()
            }
        };
        Ok(ActionOutcome::Affected(affected))
    }

    /// Flips the basemap attachment; returns whether it is now attached.
    ///
    /// While an export is in flight the layer stays detached and the flip
    /// applies to the state restored when the export finishes; the return
    /// value is then that pending state.
    pub fn toggle_basemap(&mut self) -> bool {
        if self.export.in_flight {
            self.export.reattach = !self.export.reattach;
            tracing::debug!(
                "Basemap toggle deferred until export finishes (attach: {})",
                self.export.reattach
            );
            return self.export.reattach;
        }
        let attached = self.basemap.toggle();
        let source = self.basemap.active().to_string();
        let event = if attached {
            BasemapEvent::Attached { source }
        } else {
            BasemapEvent::Detached { source }
        };
        self.bus.publish(AppEvent::Basemap(event)).ok();
        attached
    }

    /// Switches the tile source; returns whether it changed.
    pub fn set_basemap(&mut self, kind: BasemapKind) -> bool {
        let changed = self.basemap.set_active(kind);
        if changed {
            self.bus
                .publish(AppEvent::Basemap(BasemapEvent::SourceChanged {
                    source: kind.to_string(),
                }))
                .ok();
        }
        changed
    }

    /// Centers the view on a farm at the located zoom.
    pub fn recenter_on_farm(
        &mut self,
        latitude: f64,
        longitude: f64,
    ) -> std::result::Result<(), CommandError> {
        let center = LatLng::new(latitude, longitude);
        if !center.is_valid() {
            return Err(CommandError::InvalidLocation {
                latitude,
                longitude,
            });
        }
        self.view = self.view_defaults.located_view(center);
        self.bus
            .publish(AppEvent::View(ViewEvent::Recentered {
                center,
                zoom: self.view.zoom,
            }))
            .ok();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::MetadataInput;
    use fieldmap_core::{ShapeId, ShapeKind};

    fn annotated_square(editor: &mut EditorState) -> ShapeId {
        let outcome = editor
            .dispatch(EditorAction::DrawRectangle {
                corner_a: LatLng::new(0.0, 0.0),
                corner_b: LatLng::new(0.001, 0.001),
            })
            .unwrap();
        let ActionOutcome::Created { id, .. } = outcome else {
            panic!("expected Created");
        };
        editor
            .dispatch(EditorAction::SubmitMetadata {
                id,
                input: MetadataInput::named("Talhão"),
            })
            .unwrap();
        id
    }

    #[test]
    fn test_toggle_basemap_ack() {
        let mut editor = EditorState::new();
        let response = editor.handle_host_message(r#"{"type":"toggleBaseMap"}"#);
        assert!(response.ok);
        assert_eq!(response.command, "toggleBaseMap");
        assert_eq!(response.affected, 1);
        assert!(!editor.basemap().is_attached());
    }

    #[test]
    fn test_set_location_recenters() {
        let mut editor = EditorState::new();
        let response = editor.handle_host_message(
            r#"{"type":"setFazendaLocalizacao","latitude":-15.5,"longitude":-47.5}"#,
        );
        assert!(response.ok);
        assert_eq!(editor.view().center, LatLng::new(-15.5, -47.5));
        assert_eq!(editor.view().zoom, 18);
    }

    #[test]
    fn test_invalid_location_rejected() {
        let mut editor = EditorState::new();
        let before = editor.view();
        let response = editor.handle_host_message(
            r#"{"type":"setFazendaLocalizacao","latitude":123.0,"longitude":0.0}"#,
        );
        assert!(!response.ok);
        assert_eq!(editor.view(), before);
    }

    #[test]
    fn test_unknown_and_malformed_messages() {
        let mut editor = EditorState::new();
        let unknown = editor.handle_host_message(r#"{"type":"zoomIn"}"#);
        assert!(!unknown.ok);
        assert_eq!(unknown.command, "zoomIn");
        assert!(unknown.error.unwrap().contains("zoomIn"));

        let malformed = editor.handle_host_message("][");
        assert!(!malformed.ok);
        assert_eq!(malformed.command, "unknown");
    }

    #[test]
    fn test_apply_color_ack_counts() {
        let mut editor = EditorState::new();
        let id = annotated_square(&mut editor);
        let none = editor
            .handle_host_message(r##"{"type":"applyColorToSelected","color":"#ff0000"}"##);
        assert!(none.ok);
        assert_eq!(none.affected, 0);

        editor.dispatch(EditorAction::Click { id }).unwrap();
        let one = editor
            .handle_host_message(r##"{"type":"applyColorToSelected","color":"#ff0000"}"##);
        assert_eq!(one.affected, 1);
        assert_eq!(editor.style_of(id).unwrap().color, "#ff0000");

        let bad = editor.handle_host_message(r#"{"type":"applyColorToSelected","color":""}"#);
        assert!(!bad.ok);
    }

    #[test]
    fn test_delete_selected() {
        let mut editor = EditorState::new();
        let a = annotated_square(&mut editor);
        let b = annotated_square(&mut editor);
        editor.dispatch(EditorAction::Click { id: b }).unwrap();

        let response = editor.handle_host_message(r#"{"type":"deleteSelected"}"#);
        assert_eq!(response.affected, 1);
        assert!(editor.feature(a).is_some());
        assert!(editor.feature(b).is_none());
        assert_eq!(editor.feature(a).unwrap().kind(), ShapeKind::Polygon);
    }

    #[test]
    fn test_set_basemap() {
        let mut editor = EditorState::new();
        let response =
            editor.handle_host_message(r#"{"type":"setBaseMap","source":"satellite"}"#);
        assert_eq!(response.affected, 1);
        assert_eq!(editor.basemap().active(), BasemapKind::Satellite);
        let again = editor.handle_host_message(r#"{"type":"setBaseMap","source":"satellite"}"#);
        assert_eq!(again.affected, 0);
    }
}
