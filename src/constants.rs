//! Global constants for the survey console

/// Minimum number of points for a flight route.
pub const MIN_ROUTE_POINTS: usize = 2;

/// Minimum number of (open) vertices for a survey area.
pub const MIN_AREA_POINTS: usize = 3;

/// Mean earth radius in meters, used for path length.
pub const EARTH_MEAN_RADIUS_M: f64 = 6_371_008.8;

/// Equatorial earth radius in meters, used for spherical area.
pub const EARTH_EQUATORIAL_RADIUS_M: f64 = 6_378_137.0;

/// Storage keys for local persistence
pub mod storage_keys {
    /// Whole order collection.
    pub const ORDERS: &str = "orders";
    /// Logged-in user record.
    pub const SESSION: &str = "session";
    /// Application configuration (browser builds).
    pub const CONFIG: &str = "skysurvey-config";
}

/// Remote API defaults
pub mod api {
    /// Default base URL, relative to where the console is hosted.
    pub const DEFAULT_BASE_URL: &str = "./php-api";
    /// Order resource path below the base URL.
    pub const ORDERS_RESOURCE: &str = "orders.php";
}

/// Map defaults
pub mod map {
    /// Initial view center as (longitude, latitude).
    pub const DEFAULT_CENTER: (f64, f64) = (-74.2973, 4.5709);
    /// Initial zoom level.
    pub const DEFAULT_ZOOM: f64 = 6.0;
    /// Zoom level used when centering on a looked-up place.
    pub const PLACE_ZOOM: f64 = 12.0;
}

/// Default place lookup endpoint.
pub const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org/search";

/// Maximum number of notices kept for display.
pub const MAX_NOTICES: usize = 50;
