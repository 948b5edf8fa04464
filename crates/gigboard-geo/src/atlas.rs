use crate::area::{geometry_area_m2, zoom_for_area};
use crate::geojson::{first_position, Feature, FeatureCollection};
use crate::GeoError;
use serde::Serialize;
use std::path::Path;

/// Fallback map center when no suburb boundary applies (Bay Area).
pub const DEFAULT_CENTER: [f64; 2] = [-122.241026, 37.767857];
/// Wide view used for remote gigs and multi-suburb fallbacks.
pub const DEFAULT_ZOOM: u8 = 8;

/// One suburb boundary file. Sources disagree on the property that carries
/// the zipcode (`zip` in one export, `ZCTA` in the other), so each source
/// remembers its own key.
#[derive(Debug, Clone)]
pub struct SuburbSource {
    pub zip_key: String,
    pub collection: FeatureCollection,
}

/// All loaded suburb boundary sources, queried by zipcode.
#[derive(Debug, Clone, Default)]
pub struct SuburbAtlas {
    sources: Vec<SuburbSource>,
}

/// What the gig detail view needs to draw its map.
#[derive(Debug, Clone, Serialize)]
pub struct MapView {
    pub center: Option<[f64; 2]>,
    pub zoom: u8,
    pub features: Vec<Feature>,
}

impl MapView {
    /// Remote gigs have no boundary to draw; the client gets the wide
    /// default view.
    #[must_use]
    pub fn remote() -> Self {
        Self {
            center: Some(DEFAULT_CENTER),
            zoom: DEFAULT_ZOOM,
            features: Vec::new(),
        }
    }
}

impl SuburbAtlas {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn add_collection(&mut self, zip_key: impl Into<String>, collection: FeatureCollection) {
        self.sources.push(SuburbSource {
            zip_key: zip_key.into(),
            collection,
        });
    }

    pub fn load_file(&mut self, path: &Path, zip_key: &str) -> Result<(), GeoError> {
        let text = std::fs::read_to_string(path)?;
        let collection = FeatureCollection::parse(&text)?;
        self.add_collection(zip_key, collection);
        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.iter().all(|s| s.collection.features.is_empty())
    }

    fn features_matching<'a>(&'a self, zips: &[String]) -> Vec<&'a Feature> {
        let mut found = Vec::new();
        for source in &self.sources {
            for feature in &source.collection.features {
                let Some(zip) = feature.property_text(&source.zip_key) else {
                    continue;
                };
                if zips.iter().any(|z| *z == zip) {
                    found.push(feature);
                }
            }
        }
        found
    }

    /// Selects the map for a gig's zipcode.
    ///
    /// Exact boundary match wins: zoom comes from the suburb's area, center
    /// from its first coordinate. Otherwise widen to every suburb sharing the
    /// gig's place name, then to its whole region, at the default zoom. When
    /// nothing matches, the view is empty and the client keeps its default.
    #[must_use]
    pub fn map_view(
        &self,
        zipcode: &str,
        location_zips: &[String],
        region_zips: &[String],
    ) -> MapView {
        let exact_key = [zipcode.to_owned()];
        let exact = self.features_matching(&exact_key);
        if let Some(first) = exact.first() {
            let area = geometry_area_m2(&first.geometry);
            return MapView {
                center: first_position(&first.geometry),
                zoom: zoom_for_area(area),
                features: exact.into_iter().cloned().collect(),
            };
        }

        let mut fallback = self.features_matching(location_zips);
        if fallback.is_empty() {
            fallback = self.features_matching(region_zips);
        }
        let center = fallback.first().and_then(|f| first_position(&f.geometry));
        MapView {
            center,
            zoom: DEFAULT_ZOOM,
            features: fallback.into_iter().cloned().collect(),
        }
    }
}
