//! Place lookup: free text to a single coordinate.

use std::future::Future;

use serde::Deserialize;
use thiserror::Error;

use crate::model::Position;

/// Errors from a place lookup service.
#[derive(Error, Debug)]
pub enum GeocodeError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Unexpected response: {0}")]
    Parse(#[from] serde_json::Error),

    /// No lookup service in this build.
    #[error("Place lookup is not available")]
    Unavailable,
}

/// Place search seam.
pub trait Geocoder {
    /// Best match for `query`, or None if nothing was found.
    fn search(&self, query: &str) -> impl Future<Output = Result<Option<Position>, GeocodeError>>;
}

/// One search hit. Nominatim encodes coordinates as strings.
#[derive(Debug, Deserialize)]
struct Place {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: Option<String>,
}

/// Extract the first hit of a Nominatim `format=json` response.
///
/// Hits whose coordinates do not parse are skipped.
pub fn parse_search_response(body: serde_json::Value) -> Result<Option<Position>, GeocodeError> {
    let places: Vec<Place> = serde_json::from_value(body)?;
    let hit = places.iter().find_map(|place| {
        let lon = place.lon.trim().parse::<f64>().ok()?;
        let lat = place.lat.trim().parse::<f64>().ok()?;
        (lon.is_finite() && lat.is_finite()).then(|| {
            log::debug!(
                "Place hit: {} ({}, {})",
                place.display_name.as_deref().unwrap_or("?"),
                lon,
                lat
            );
            Position::new(lon, lat)
        })
    });
    Ok(hit)
}

/// Geocoder for builds without network access.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineGeocoder;

impl Geocoder for OfflineGeocoder {
    async fn search(&self, query: &str) -> Result<Option<Position>, GeocodeError> {
        log::warn!("Place lookup for '{}' requested without a lookup service", query);
        Err(GeocodeError::Unavailable)
    }
}

/// Nominatim search over `fetch` (WASM only).
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    endpoint: String,
}

#[cfg(target_arch = "wasm32")]
impl NominatimGeocoder {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl Geocoder for NominatimGeocoder {
    async fn search(&self, query: &str) -> Result<Option<Position>, GeocodeError> {
        use gloo_net::http::Request;

        let response = Request::get(&self.endpoint)
            .query([("format", "json"), ("q", query), ("limit", "1")])
            .send()
            .await
            .map_err(|e| GeocodeError::Network(e.to_string()))?;
        if !response.ok() {
            return Err(GeocodeError::Http {
                status: response.status(),
                message: response.status_text(),
            });
        }
        let body = response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| GeocodeError::Network(format!("Parse error: {}", e)))?;
        parse_search_response(body)
    }
}
