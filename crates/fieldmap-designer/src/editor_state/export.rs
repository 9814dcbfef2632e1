//! Editor side of report exports.
//!
//! An export detaches the tile layer so only the shapes are captured, and
//! must put it back afterwards whatever happened. Only one export may be in
//! flight at a time.

use fieldmap_core::{AppEvent, BasemapEvent, ExportError};

use super::EditorState;

impl EditorState {
    /// Marks an export as started and detaches the tile layer.
    pub fn begin_export(&mut self) -> Result<(), ExportError> {
        if self.export.in_flight {
            return Err(ExportError::AlreadyInProgress);
        }
        self.export.in_flight = true;
        self.export.reattach = self.basemap.detach();
        if self.export.reattach {
            self.bus
                .publish(AppEvent::Basemap(BasemapEvent::Detached {
                    source: self.basemap.active().to_string(),
                }))
                .ok();
        }
        tracing::debug!("Export started, tile layer detached");
        Ok(())
    }

    /// Ends the export, restoring the tile layer if it was attached before
    /// (or if a toggle during the export asked for it).
    ///
    /// Safe to call when no export is running.
    pub fn finish_export(&mut self) {
        if !self.export.in_flight {
            return;
        }
        if self.export.reattach && self.basemap.attach() {
            self.bus
                .publish(AppEvent::Basemap(BasemapEvent::Attached {
                    source: self.basemap.active().to_string(),
                }))
                .ok();
        }
        self.export = Default::default();
        tracing::debug!(
            "Export finished, tile layer attached: {}",
            self.basemap.is_attached()
        );
    }

    pub fn is_exporting(&self) -> bool {
        self.export.in_flight
    }
}
