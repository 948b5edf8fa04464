use crate::GeoError;
use serde::{Deserialize, Serialize};

/// A geojson position: `[longitude, latitude]`, with an optional altitude
/// some exports carry. Only the first two entries matter here.
pub type Position = Vec<f64>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub properties: serde_json::Map<String, serde_json::Value>,
    pub geometry: Geometry,
}

/// The two geometry kinds suburb boundary exports use. Anything else in a
/// source file is a parse error, not a silent skip.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Polygon { coordinates: Vec<Vec<Position>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Position>>> },
}

impl FeatureCollection {
    pub fn parse(text: &str) -> Result<Self, GeoError> {
        Ok(serde_json::from_str(text)?)
    }
}

impl Feature {
    /// Property value as text. Some exports store zipcodes as json numbers.
    #[must_use]
    pub fn property_text(&self, key: &str) -> Option<String> {
        match self.properties.get(key)? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// First coordinate of the geometry's first outer ring. Total over any
/// geometry, including degenerate empty ones.
#[must_use]
pub fn first_position(geometry: &Geometry) -> Option<[f64; 2]> {
    let position = match geometry {
        Geometry::Polygon { coordinates } => coordinates.first()?.first()?,
        Geometry::MultiPolygon { coordinates } => coordinates.first()?.first()?.first()?,
    };
    match position.as_slice() {
        [lon, lat, ..] => Some([*lon, *lat]),
        _ => None,
    }
}
