//! The map widget seam.
//!
//! The console never renders anything itself. It pushes sketches, stats,
//! layers and view changes into a [`MapSurface`], which the embedding UI
//! implements on top of its tile map library.

use serde::Serialize;

use crate::drawing::{DrawingKind, DrawingStats, Sketch};
use crate::layers::{ImportedLayer, LayerId};
use crate::model::Position;

/// Rendering target for the console.
pub trait MapSurface {
    /// Replace the preview of one drawing kind.
    fn draw_sketch(&mut self, sketch: &Sketch);

    /// Show the stats line of one drawing kind.
    fn show_stats(&mut self, kind: DrawingKind, stats: &DrawingStats);

    /// Start or stop routing map clicks to the console for a drawing kind.
    fn set_click_capture(&mut self, kind: DrawingKind, capturing: bool);

    /// Center the map.
    fn set_view(&mut self, center: Position, zoom: f64);

    /// Zoom the map to a bounding box.
    fn fit_bounds(&mut self, bounds: &Bounds);

    /// Draw (or re-show) an imported layer.
    fn show_layer(&mut self, layer: &ImportedLayer);

    /// Hide an imported layer without forgetting it.
    fn hide_layer(&mut self, id: &LayerId);
}

/// A surface that only logs, for headless use.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSurface;

impl MapSurface for LogSurface {
    fn draw_sketch(&mut self, sketch: &Sketch) {
        log::debug!(
            "Sketch {}: {} markers, outline: {}",
            sketch.kind.name(),
            sketch.markers.len(),
            sketch.outline.is_some()
        );
    }

    fn show_stats(&mut self, kind: DrawingKind, stats: &DrawingStats) {
        log::info!("{} stats: {}", kind.name(), stats);
    }

    fn set_click_capture(&mut self, kind: DrawingKind, capturing: bool) {
        log::debug!("{} click capture: {}", kind.name(), capturing);
    }

    fn set_view(&mut self, center: Position, zoom: f64) {
        log::info!("View: ({:.4}, {:.4}) zoom {}", center.lon, center.lat, zoom);
    }

    fn fit_bounds(&mut self, bounds: &Bounds) {
        log::info!("Fit bounds: {:?}", bounds);
    }

    fn show_layer(&mut self, layer: &ImportedLayer) {
        log::info!("Show layer '{}' ({} features)", layer.name, layer.collection.features.len());
    }

    fn hide_layer(&mut self, id: &LayerId) {
        log::info!("Hide layer {}", id);
    }
}

/// Axis-aligned (longitude, latitude) bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub min: Position,
    pub max: Position,
}

impl Bounds {
    /// Bounds of a set of positions; None when empty.
    pub fn from_positions<'a>(positions: impl IntoIterator<Item = &'a Position>) -> Option<Self> {
        let mut iter = positions.into_iter();
        let first = *iter.next()?;
        let mut bounds = Bounds {
            min: first,
            max: first,
        };
        for p in iter {
            bounds.extend(*p);
        }
        Some(bounds)
    }

    pub fn extend(&mut self, p: Position) {
        self.min.lon = self.min.lon.min(p.lon);
        self.min.lat = self.min.lat.min(p.lat);
        self.max.lon = self.max.lon.max(p.lon);
        self.max.lat = self.max.lat.max(p.lat);
    }

    /// Check the box lies within valid geographic ranges.
    pub fn is_valid(&self) -> bool {
        (-180.0..=180.0).contains(&self.min.lon)
            && (-180.0..=180.0).contains(&self.max.lon)
            && (-90.0..=90.0).contains(&self.min.lat)
            && (-90.0..=90.0).contains(&self.max.lat)
    }

    pub fn center(&self) -> Position {
        Position::new(
            (self.min.lon + self.max.lon) / 2.0,
            (self.min.lat + self.max.lat) / 2.0,
        )
    }
}
