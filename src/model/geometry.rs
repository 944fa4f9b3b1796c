//! Order geometry: flight routes and survey areas.
//!
//! Both types serialize as GeoJSON geometry objects so stored orders stay
//! readable by GIS tooling:
//! - [`Path`] is a `LineString` with at least two positions
//! - [`Region`] is a single-ring `Polygon` stored in closed form

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{MIN_AREA_POINTS, MIN_ROUTE_POINTS};

// ============================================================================
// Position
// ============================================================================

/// A planar (longitude, latitude) pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "[f64; 2]")]
pub struct Position {
    pub lon: f64,
    pub lat: f64,
}

impl Position {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

impl TryFrom<Vec<f64>> for Position {
    type Error = GeometryError;

    /// Extra ordinates (altitude) are accepted and dropped.
    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        match values.as_slice() {
            [lon, lat, ..] if lon.is_finite() && lat.is_finite() => Ok(Self::new(*lon, *lat)),
            [_, _, ..] => Err(GeometryError::NonFinite),
            _ => Err(GeometryError::ShortPosition(values.len())),
        }
    }
}

impl From<Position> for [f64; 2] {
    fn from(p: Position) -> Self {
        [p.lon, p.lat]
    }
}

impl From<(f64, f64)> for Position {
    fn from((lon, lat): (f64, f64)) -> Self {
        Self::new(lon, lat)
    }
}

/// Errors raised when decoding stored geometry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("position needs at least 2 ordinates, got {0}")]
    ShortPosition(usize),

    #[error("position contains a non-finite ordinate")]
    NonFinite,

    #[error("expected geometry type '{expected}', found '{found}'")]
    WrongType {
        expected: &'static str,
        found: String,
    },

    #[error("{kind} needs at least {min} points, got {found}")]
    TooFewPoints {
        kind: &'static str,
        min: usize,
        found: usize,
    },

    #[error("polygon ring is not closed")]
    OpenRing,

    #[error("polygon must have exactly one ring, got {0}")]
    RingCount(usize),
}

// ============================================================================
// Path
// ============================================================================

/// An open polyline flight route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LineStringRepr", into = "LineStringRepr")]
pub struct Path {
    points: Vec<Position>,
}

impl Path {
    /// Build a path from captured points. Returns None below two points.
    pub fn new(points: Vec<Position>) -> Option<Self> {
        (points.len() >= MIN_ROUTE_POINTS).then_some(Self { points })
    }

    pub fn points(&self) -> &[Position] {
        &self.points
    }
}

#[derive(Serialize, Deserialize)]
struct LineStringRepr {
    #[serde(rename = "type")]
    kind: String,
    coordinates: Vec<Position>,
}

impl TryFrom<LineStringRepr> for Path {
    type Error = GeometryError;

    fn try_from(repr: LineStringRepr) -> Result<Self, Self::Error> {
        if repr.kind != "LineString" {
            return Err(GeometryError::WrongType {
                expected: "LineString",
                found: repr.kind,
            });
        }
        let found = repr.coordinates.len();
        Path::new(repr.coordinates).ok_or(GeometryError::TooFewPoints {
            kind: "LineString",
            min: MIN_ROUTE_POINTS,
            found,
        })
    }
}

impl From<Path> for LineStringRepr {
    fn from(path: Path) -> Self {
        Self {
            kind: "LineString".to_string(),
            coordinates: path.points,
        }
    }
}

// ============================================================================
// Region
// ============================================================================

/// A survey area polygon, held in closed-ring form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PolygonRepr", into = "PolygonRepr")]
pub struct Region {
    ring: Vec<Position>,
}

impl Region {
    /// Close an open vertex list into a region. Returns None below three vertices.
    pub fn from_open(mut points: Vec<Position>) -> Option<Self> {
        if points.len() < MIN_AREA_POINTS {
            return None;
        }
        let first = points[0];
        points.push(first);
        Some(Self { ring: points })
    }

    /// The closed ring: last position equals the first.
    pub fn ring(&self) -> &[Position] {
        &self.ring
    }

    /// The vertices without the closing position.
    pub fn open_points(&self) -> &[Position] {
        &self.ring[..self.ring.len() - 1]
    }
}

#[derive(Serialize, Deserialize)]
struct PolygonRepr {
    #[serde(rename = "type")]
    kind: String,
    coordinates: Vec<Vec<Position>>,
}

impl TryFrom<PolygonRepr> for Region {
    type Error = GeometryError;

    fn try_from(repr: PolygonRepr) -> Result<Self, Self::Error> {
        if repr.kind != "Polygon" {
            return Err(GeometryError::WrongType {
                expected: "Polygon",
                found: repr.kind,
            });
        }
        let ring_count = repr.coordinates.len();
        let Some(ring) = repr.coordinates.into_iter().next().filter(|_| ring_count == 1) else {
            return Err(GeometryError::RingCount(ring_count));
        };
        if ring.len() < MIN_AREA_POINTS + 1 {
            return Err(GeometryError::TooFewPoints {
                kind: "Polygon ring",
                min: MIN_AREA_POINTS + 1,
                found: ring.len(),
            });
        }
        if ring.first() != ring.last() {
            return Err(GeometryError::OpenRing);
        }
        Ok(Self { ring })
    }
}

impl From<Region> for PolygonRepr {
    fn from(region: Region) -> Self {
        Self {
            kind: "Polygon".to_string(),
            coordinates: vec![region.ring],
        }
    }
}

/// Geometry produced by a drawing session.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Path(Path),
    Region(Region),
}

impl Geometry {
    /// Open-form points, as loaded back into a drawing session.
    pub fn open_points(&self) -> &[Position] {
        match self {
            Geometry::Path(path) => path.points(),
            Geometry::Region(region) => region.open_points(),
        }
    }
}
