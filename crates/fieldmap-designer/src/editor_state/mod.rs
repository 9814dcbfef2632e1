//! Editor state for host integration.
//!
//! `EditorState` owns every shape, its annotation and workflow state, the
//! basemap and the view. All mutations go through [`EditorState::dispatch`].
//!
//! This module is split into submodules:
//! - `actions`: the action enum and dispatch
//! - `shapes`: draw, metadata, edit and removal
//! - `selection`: click toggling and batch restyling
//! - `host`: inbound host commands
//! - `export`: basemap detach/reattach around report exports
//! - `io`: GeoJSON import and export

mod actions;
mod export;
mod host;
mod io;
mod selection;
mod shapes;

pub use actions::{ActionOutcome, EditorAction};
pub use io::ImportReport;

use fieldmap_core::{EventBus, ShapeId, ShapeKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::annotation::{Annotation, Palette};
use crate::basemap::{Basemap, BasemapKind};
use crate::metrics::ShapeMetrics;
use crate::model::Shape;
use crate::popup::{popup_html, tooltip_text, FloatingLabel};
use crate::scene::{Scene, SceneShape};
use crate::style::ShapeStyle;
use crate::tools::DrawSettings;
use crate::view::{MapView, ViewDefaults};
use crate::workflow::ShapeState;

/// Startup configuration of the editor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorOptions {
    pub palette: Vec<String>,
    pub tools: DrawSettings,
    pub basemap: BasemapKind,
    pub view_defaults: ViewDefaults,
    /// Template for every shape's style; its color is used before annotation
    pub base_style: ShapeStyle,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            palette: Vec::new(),
            tools: DrawSettings::default(),
            basemap: BasemapKind::default(),
            view_defaults: ViewDefaults::default(),
            base_style: ShapeStyle::default(),
        }
    }
}

/// A shape together with everything derived from it
#[derive(Debug, Clone, PartialEq)]
pub struct MapFeature {
    pub shape: Shape,
    pub metrics: ShapeMetrics,
    pub state: ShapeState,
    pub annotation: Option<Annotation>,
}

impl MapFeature {
    pub fn id(&self) -> ShapeId {
        self.shape.id()
    }

    pub fn kind(&self) -> ShapeKind {
        self.shape.kind()
    }

    pub fn is_selected(&self) -> bool {
        self.state.is_selected()
    }

    /// Style before selection emphasis.
    pub fn base_style(&self, template: &ShapeStyle) -> ShapeStyle {
        let mut style = template.clone();
        if let Some(annotation) = &self.annotation {
            style.color = annotation.color.clone();
        }
        if self.kind() == ShapeKind::Line {
            style.fill_opacity = 0.0;
        }
        style
    }

    /// Style to draw with.
    pub fn style(&self, template: &ShapeStyle) -> ShapeStyle {
        self.base_style(template).resolve(self.is_selected())
    }

    pub fn popup_html(&self) -> Option<String> {
        self.annotation
            .as_ref()
            .map(|a| popup_html(self.kind(), a, &self.metrics))
    }

    pub fn tooltip(&self) -> Option<String> {
        self.annotation
            .as_ref()
            .map(|a| tooltip_text(self.kind(), a, &self.metrics))
    }

    pub fn label(&self) -> Option<FloatingLabel> {
        self.annotation
            .as_ref()
            .and_then(|a| FloatingLabel::for_shape(a, &self.metrics))
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct ExportGuard {
    in_flight: bool,
    reattach: bool,
}

/// The editor
#[derive(Debug)]
pub struct EditorState {
    features: BTreeMap<ShapeId, MapFeature>,
    next_id: u64,
    palette: Palette,
    tools: DrawSettings,
    basemap: Basemap,
    view: MapView,
    view_defaults: ViewDefaults,
    base_style: ShapeStyle,
    export: ExportGuard,
    bus: Arc<EventBus>,
}

impl EditorState {
    /// Creates an editor with default options and its own event bus.
    pub fn new() -> Self {
        Self::with_options(EditorOptions::default(), Arc::new(EventBus::new()))
    }

    pub fn with_options(options: EditorOptions, bus: Arc<EventBus>) -> Self {
        Self {
            features: BTreeMap::new(),
            next_id: 1,
            palette: Palette::new(options.palette),
            tools: options.tools,
            basemap: Basemap::new(options.basemap),
            view: options.view_defaults.fallback_view(),
            view_defaults: options.view_defaults,
            base_style: options.base_style,
            export: ExportGuard::default(),
            bus,
        }
    }

    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    pub fn feature(&self, id: ShapeId) -> Option<&MapFeature> {
        self.features.get(&id)
    }

    /// Live features in id order.
    pub fn features(&self) -> impl Iterator<Item = &MapFeature> {
        self.features.values()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn selected_ids(&self) -> Vec<ShapeId> {
        self.features
            .values()
            .filter(|f| f.is_selected())
            .map(|f| f.id())
            .collect()
    }

    pub fn basemap(&self) -> Basemap {
        self.basemap
    }

    pub fn view(&self) -> MapView {
        self.view
    }

    pub fn view_defaults(&self) -> &ViewDefaults {
        &self.view_defaults
    }

    pub fn tools(&self) -> &DrawSettings {
        &self.tools
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Style of a feature as currently drawn.
    pub fn style_of(&self, id: ShapeId) -> Option<ShapeStyle> {
        self.features.get(&id).map(|f| f.style(&self.base_style))
    }

    /// Snapshot for rendering.
    pub fn scene(&self) -> Scene {
        Scene {
            view: self.view,
            basemap: self.basemap,
            shapes: self
                .features
                .values()
                .map(|f| SceneShape {
                    id: f.id(),
                    kind: f.kind(),
                    coords: f.shape.coords().to_vec(),
                    style: f.style(&self.base_style),
                    label: f.label(),
                })
                .collect(),
        }
    }

    /// Id the next created shape will get; only consumed on insert.
    fn peek_id(&self) -> ShapeId {
        ShapeId(self.next_id)
    }
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new()
    }
}
