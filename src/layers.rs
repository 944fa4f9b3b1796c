//! Imported GeoJSON overlay layers.
//!
//! Layers are reference data (airspace, parcels, no-fly zones) drawn on top
//! of the map. They are never persisted; an import lives until the page or
//! process goes away.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::map::Bounds;
use crate::model::Position;

/// Errors while importing a layer file.
#[derive(Error, Debug)]
pub enum LayerError {
    /// The text is not a well-formed GeoJSON FeatureCollection.
    #[error("Not a valid GeoJSON FeatureCollection: {0}")]
    Invalid(#[from] serde_json::Error),
}

/// Opaque layer identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerId(String);

impl LayerId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for LayerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// GeoJSON
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
enum CollectionTag {
    FeatureCollection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
enum FeatureTag {
    Feature,
}

/// A parsed GeoJSON FeatureCollection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    tag: CollectionTag,
    pub features: Vec<Feature>,
}

/// One GeoJSON feature. Properties are kept verbatim for popups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    tag: FeatureTag,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
    pub geometry: Option<LayerGeometry>,
    #[serde(default)]
    pub properties: Option<serde_json::Map<String, serde_json::Value>>,
}

/// Any GeoJSON geometry. Altitudes are dropped on import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LayerGeometry {
    Point { coordinates: Position },
    MultiPoint { coordinates: Vec<Position> },
    LineString { coordinates: Vec<Position> },
    MultiLineString { coordinates: Vec<Vec<Position>> },
    Polygon { coordinates: Vec<Vec<Position>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Position>>> },
    GeometryCollection { geometries: Vec<LayerGeometry> },
}

impl LayerGeometry {
    /// Visit every position of the geometry.
    pub fn for_each_position(&self, f: &mut impl FnMut(&Position)) {
        match self {
            LayerGeometry::Point { coordinates } => f(coordinates),
            LayerGeometry::MultiPoint { coordinates } | LayerGeometry::LineString { coordinates } => {
                coordinates.iter().for_each(f)
            }
            LayerGeometry::MultiLineString { coordinates } | LayerGeometry::Polygon { coordinates } => {
                coordinates.iter().flatten().for_each(f)
            }
            LayerGeometry::MultiPolygon { coordinates } => {
                coordinates.iter().flatten().flatten().for_each(f)
            }
            LayerGeometry::GeometryCollection { geometries } => {
                for g in geometries {
                    g.for_each_position(f);
                }
            }
        }
    }
}

impl FeatureCollection {
    /// Parse GeoJSON text.
    pub fn parse(text: &str) -> Result<Self, LayerError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Bounding box of all positions; None for an empty collection.
    pub fn bounds(&self) -> Option<Bounds> {
        let mut bounds: Option<Bounds> = None;
        for geometry in self.features.iter().filter_map(|f| f.geometry.as_ref()) {
            geometry.for_each_position(&mut |p: &Position| match bounds.as_mut() {
                Some(b) => b.extend(*p),
                None => bounds = Bounds::from_positions([p]),
            });
        }
        bounds
    }
}

// ============================================================================
// Layer set
// ============================================================================

/// An imported collection with its display state.
#[derive(Debug, Clone, Serialize)]
pub struct ImportedLayer {
    pub id: LayerId,
    pub name: String,
    pub visible: bool,
    pub collection: FeatureCollection,
}

/// All imported layers, in import order.
#[derive(Debug, Clone, Default)]
pub struct LayerSet {
    layers: Vec<ImportedLayer>,
}

impl LayerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and add a layer, visible. Nothing changes if parsing fails.
    pub fn import(&mut self, name: &str, text: &str) -> Result<&ImportedLayer, LayerError> {
        let collection = FeatureCollection::parse(text)?;
        let layer = ImportedLayer {
            id: LayerId::generate(),
            name: name.to_string(),
            visible: true,
            collection,
        };
        log::info!(
            "Imported layer '{}' with {} features",
            layer.name,
            layer.collection.features.len()
        );
        self.layers.push(layer);
        let index = self.layers.len() - 1;
        Ok(&self.layers[index])
    }

    /// Flip visibility. None for unknown ids.
    pub fn toggle(&mut self, id: &LayerId) -> Option<&ImportedLayer> {
        let layer = self.layers.iter_mut().find(|l| &l.id == id)?;
        layer.visible = !layer.visible;
        log::debug!("Layer '{}' visible: {}", layer.name, layer.visible);
        Some(layer)
    }

    pub fn remove(&mut self, id: &LayerId) -> Option<ImportedLayer> {
        let index = self.layers.iter().position(|l| &l.id == id)?;
        let layer = self.layers.remove(index);
        log::info!("Removed layer '{}'", layer.name);
        Some(layer)
    }

    pub fn get(&self, id: &LayerId) -> Option<&ImportedLayer> {
        self.layers.iter().find(|l| &l.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ImportedLayer> {
        self.layers.iter()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}
