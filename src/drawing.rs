//! Interactive route and area drawing.
//!
//! A [`DrawingSession`] captures map clicks into an ordered point list for one
//! geometry kind. Every mutation recomputes the session's [`DrawingStats`] and
//! marks it dirty so the console re-renders the [`Sketch`] once per change.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{MIN_AREA_POINTS, MIN_ROUTE_POINTS};
use crate::measure::{GeometryMeasure, SphericalMeasure};
use crate::model::{Geometry, Path, Position, Region};

/// The geometry a session produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawingKind {
    /// Open flight route
    Route,
    /// Closed survey area
    Area,
}

impl DrawingKind {
    pub fn name(&self) -> &'static str {
        match self {
            DrawingKind::Route => "route",
            DrawingKind::Area => "area",
        }
    }

    /// Minimum number of points for a finished geometry.
    pub fn min_points(&self) -> usize {
        match self {
            DrawingKind::Route => MIN_ROUTE_POINTS,
            DrawingKind::Area => MIN_AREA_POINTS,
        }
    }

    pub fn all() -> &'static [DrawingKind] {
        &[DrawingKind::Route, DrawingKind::Area]
    }
}

/// Live measurement of the points drawn so far.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawingStats {
    /// Too few points for a geometry of this kind.
    NoGeometry { drawing: DrawingKind },
    Route { points: usize, length_km: f64 },
    Area { points: usize, area_km2: f64 },
}

impl fmt::Display for DrawingStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawingStats::NoGeometry {
                drawing: DrawingKind::Route,
            } => f.write_str("No route"),
            DrawingStats::NoGeometry {
                drawing: DrawingKind::Area,
            } => f.write_str("No area"),
            DrawingStats::Route { points, length_km } => {
                write!(f, "Points: {points} · Length: {length_km:.2} km")
            }
            DrawingStats::Area { points, area_km2 } => {
                write!(f, "Points: {points} · Area: {area_km2:.3} km²")
            }
        }
    }
}

/// Preview handed to the map surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sketch {
    pub kind: DrawingKind,
    /// One marker per captured point.
    pub markers: Vec<Position>,
    /// Connected outline once enough points exist; closed for areas.
    pub outline: Option<Vec<Position>>,
}

/// Point capture state machine for one geometry kind.
pub struct DrawingSession {
    kind: DrawingKind,
    points: Vec<Position>,
    active: bool,
    stats: DrawingStats,
    measure: Box<dyn GeometryMeasure>,
    dirty: bool,
}

impl DrawingSession {
    /// Create an inactive session using spherical measurements.
    pub fn new(kind: DrawingKind) -> Self {
        Self::with_measure(kind, Box::new(SphericalMeasure))
    }

    pub fn with_measure(kind: DrawingKind, measure: Box<dyn GeometryMeasure>) -> Self {
        Self {
            kind,
            points: Vec::new(),
            active: false,
            stats: DrawingStats::NoGeometry { drawing: kind },
            measure,
            dirty: true,
        }
    }

    pub fn kind(&self) -> DrawingKind {
        self.kind
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn points(&self) -> &[Position] {
        &self.points
    }

    pub fn stats(&self) -> DrawingStats {
        self.stats
    }

    /// Begin accepting points. Returns false if already active.
    pub fn start(&mut self) -> bool {
        if self.active {
            log::debug!("{} drawing already active", self.kind.name());
            return false;
        }
        self.active = true;
        log::info!("{} drawing started", self.kind.name());
        true
    }

    /// Append a clicked point. Ignored (returns false) while inactive.
    pub fn add_point(&mut self, point: Position) -> bool {
        if !self.active {
            return false;
        }
        self.points.push(point);
        log::debug!(
            "{}: added point {} at ({:.5}, {:.5})",
            self.kind.name(),
            self.points.len(),
            point.lon,
            point.lat
        );
        self.refresh();
        true
    }

    /// Stop accepting points and return the finished geometry, if any.
    ///
    /// Finishing an inactive session still reports the current geometry.
    pub fn finish(&mut self) -> Option<Geometry> {
        self.active = false;
        self.refresh();
        let geometry = self.candidate();
        log::info!(
            "{} drawing finished with {} points ({})",
            self.kind.name(),
            self.points.len(),
            if geometry.is_some() { "geometry" } else { "no geometry" }
        );
        geometry
    }

    /// Stop accepting points without producing geometry. Returns false if
    /// the session was not active.
    pub fn stop(&mut self) -> bool {
        if !self.active {
            return false;
        }
        self.active = false;
        log::debug!("{} drawing stopped", self.kind.name());
        true
    }

    /// Drop all points; the active flag is left as is.
    pub fn clear(&mut self) {
        self.points.clear();
        self.refresh();
    }

    /// Replace the points with those of a stored geometry (None empties).
    pub fn load_existing(&mut self, geometry: Option<&Geometry>) {
        self.points = geometry
            .map(|g| g.open_points().to_vec())
            .unwrap_or_default();
        self.refresh();
    }

    /// Geometry the current points would produce, without finishing.
    pub fn candidate(&self) -> Option<Geometry> {
        match self.kind {
            DrawingKind::Route => Path::new(self.points.clone()).map(Geometry::Path),
            DrawingKind::Area => Region::from_open(self.points.clone()).map(Geometry::Region),
        }
    }

    /// Current preview for rendering.
    pub fn sketch(&self) -> Sketch {
        let outline = (self.points.len() >= self.kind.min_points()).then(|| match self.kind {
            DrawingKind::Route => self.points.clone(),
            DrawingKind::Area => {
                let mut ring = self.points.clone();
                ring.push(self.points[0]);
                ring
            }
        });
        Sketch {
            kind: self.kind,
            markers: self.points.clone(),
            outline,
        }
    }

    /// Check if the session changed since the last render.
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear the dirty flag. Call after rendering.
    #[inline]
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    fn refresh(&mut self) {
        let count = self.points.len();
        self.stats = if count < self.kind.min_points() {
            DrawingStats::NoGeometry { drawing: self.kind }
        } else {
            match self.kind {
                DrawingKind::Route => DrawingStats::Route {
                    points: count,
                    length_km: self.measure.length_km(&self.points),
                },
                DrawingKind::Area => DrawingStats::Area {
                    points: count,
                    area_km2: self.measure.area_km2(&self.points),
                },
            }
        };
        self.dirty = true;
    }
}

impl fmt::Debug for DrawingSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DrawingSession")
            .field("kind", &self.kind)
            .field("points", &self.points.len())
            .field("active", &self.active)
            .field("stats", &self.stats)
            .finish()
    }
}
