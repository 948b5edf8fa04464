#![forbid(unsafe_code)]

//! Suburb-boundary geojson handling for gig map display.
//!
//! Parses suburb feature collections into typed geometries, computes
//! spherical polygon areas to pick a zoom level, and selects the features
//! and map center for a gig's zipcode with location and region fallbacks.

mod area;
mod atlas;
mod geojson;

pub use area::{geometry_area_m2, polygon_area_m2, ring_area_m2, zoom_for_area};
pub use atlas::{MapView, SuburbAtlas, SuburbSource, DEFAULT_CENTER, DEFAULT_ZOOM};
pub use geojson::{first_position, Feature, FeatureCollection, Geometry, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum GeoErrorCode {
    Io,
    Parse,
}

#[derive(Debug)]
pub struct GeoError {
    pub code: GeoErrorCode,
    pub message: String,
}

impl GeoError {
    #[must_use]
    pub fn new(code: GeoErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for GeoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}
impl std::error::Error for GeoError {}

impl From<std::io::Error> for GeoError {
    fn from(value: std::io::Error) -> Self {
        Self::new(GeoErrorCode::Io, value.to_string())
    }
}

impl From<serde_json::Error> for GeoError {
    fn from(value: serde_json::Error) -> Self {
        Self::new(GeoErrorCode::Parse, value.to_string())
    }
}

#[cfg(test)]
mod geo_tests;
