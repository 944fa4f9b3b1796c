//! Geometry measurement on the earth's surface.
//!
//! The drawing sessions only need two numbers: the length of a route and the
//! area enclosed by a survey polygon. [`SphericalMeasure`] reproduces the
//! formulas the web console used (Turf.js): haversine distance on a sphere of
//! mean earth radius, and the spherical-excess ring area from Chamberlain &
//! Duquette, "Some algorithms for polygons on a sphere" (JPL, 2007).

use crate::constants::{EARTH_EQUATORIAL_RADIUS_M, EARTH_MEAN_RADIUS_M};
use crate::model::Position;

/// Length and area formulas for (longitude, latitude) sequences.
pub trait GeometryMeasure {
    /// Length of the open polyline through `points`, in kilometers.
    fn length_km(&self, points: &[Position]) -> f64;

    /// Area enclosed by the ring through `points`, in square kilometers.
    ///
    /// `points` is the open vertex list; the closing edge is implied.
    fn area_km2(&self, points: &[Position]) -> f64;
}

/// Spherical-earth measurements.
#[derive(Debug, Clone, Copy, Default)]
pub struct SphericalMeasure;

impl SphericalMeasure {
    /// Great-circle distance between two positions in meters.
    pub fn haversine_m(a: Position, b: Position) -> f64 {
        let d_lat = (b.lat - a.lat).to_radians();
        let d_lon = (b.lon - a.lon).to_radians();
        let lat1 = a.lat.to_radians();
        let lat2 = b.lat.to_radians();

        let h = (d_lat / 2.0).sin().powi(2) + (d_lon / 2.0).sin().powi(2) * lat1.cos() * lat2.cos();
        2.0 * h.sqrt().atan2((1.0 - h).sqrt()) * EARTH_MEAN_RADIUS_M
    }

    /// Signed spherical area of an open ring in square meters.
    fn ring_area_m2(points: &[Position]) -> f64 {
        let n = points.len();
        if n < 3 {
            return 0.0;
        }

        let mut total = 0.0;
        for i in 0..n {
            let lower = points[i];
            let middle = points[(i + 1) % n];
            let upper = points[(i + 2) % n];
            total += (upper.lon.to_radians() - lower.lon.to_radians()) * middle.lat.to_radians().sin();
        }

        total * EARTH_EQUATORIAL_RADIUS_M * EARTH_EQUATORIAL_RADIUS_M / 2.0
    }
}

impl GeometryMeasure for SphericalMeasure {
    fn length_km(&self, points: &[Position]) -> f64 {
        points
            .windows(2)
            .map(|pair| Self::haversine_m(pair[0], pair[1]))
            .sum::<f64>()
            / 1000.0
    }

    fn area_km2(&self, points: &[Position]) -> f64 {
        Self::ring_area_m2(points).abs() / 1e6
    }
}
