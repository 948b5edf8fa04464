// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Coarse geographic bucket a zipcode belongs to.
///
/// Assigned once at reference-data load time from the place name; search and
/// map display derive a post's region transitively through its zipcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Region {
    SanFrancisco,
    Peninsula,
    NorthBay,
    EastBay,
    SouthBay,
    Sacramento,
    Remote,
}

const SAN_FRANCISCO_PLACES: &[&str] = &["San Francisco"];

const PENINSULA_PLACES: &[&str] = &[
    "Daly City",
    "South San Francisco",
    "San Bruno",
    "Pacifica",
    "Millbrae",
    "Burlingame",
    "San Mateo",
    "Foster City",
    "Belmont",
    "San Carlos",
    "Redwood City",
    "Menlo Park",
    "Atherton",
    "Palo Alto",
    "East Palo Alto",
    "Half Moon Bay",
];

const NORTH_BAY_PLACES: &[&str] = &[
    "Sausalito",
    "Mill Valley",
    "San Anselmo",
    "San Rafael",
    "Novato",
    "Petaluma",
    "Santa Rosa",
    "Sonoma",
    "Napa",
    "Vallejo",
    "Benicia",
    "Fairfield",
    "Vacaville",
];

const EAST_BAY_PLACES: &[&str] = &[
    "Oakland",
    "Berkeley",
    "Albany",
    "El Cerrito",
    "Richmond",
    "Emeryville",
    "Alameda",
    "San Leandro",
    "Castro Valley",
    "Hayward",
    "Union City",
    "Newark",
    "Fremont",
    "Dublin",
    "Pleasanton",
    "Livermore",
    "Martinez",
    "Concord",
    "Walnut Creek",
    "Pittsburg",
    "Antioch",
];

const SOUTH_BAY_PLACES: &[&str] = &[
    "Mountain View",
    "Sunnyvale",
    "Cupertino",
    "Santa Clara",
    "San Jose",
    "Campbell",
    "Saratoga",
    "Los Gatos",
    "Milpitas",
    "Morgan Hill",
    "Gilroy",
];

const SACRAMENTO_PLACES: &[&str] = &[
    "Sacramento",
    "West Sacramento",
    "Elk Grove",
    "Citrus Heights",
    "Rancho Cordova",
    "Folsom",
    "Roseville",
    "Davis",
    "Stockton",
    "Lodi",
];

impl Region {
    pub const ALL: [Self; 7] = [
        Self::SanFrancisco,
        Self::Peninsula,
        Self::NorthBay,
        Self::EastBay,
        Self::SouthBay,
        Self::Sacramento,
        Self::Remote,
    ];

    /// Static place-name membership lookup. Total: unclassified places are
    /// Remote.
    #[must_use]
    pub fn classify(location_name: &str) -> Self {
        let place = location_name.trim();
        let tables: [(&[&str], Self); 6] = [
            (SAN_FRANCISCO_PLACES, Self::SanFrancisco),
            (PENINSULA_PLACES, Self::Peninsula),
            (NORTH_BAY_PLACES, Self::NorthBay),
            (EAST_BAY_PLACES, Self::EastBay),
            (SOUTH_BAY_PLACES, Self::SouthBay),
            (SACRAMENTO_PLACES, Self::Sacramento),
        ];
        for (places, region) in tables {
            if places.iter().any(|p| p.eq_ignore_ascii_case(place)) {
                return region;
            }
        }
        Self::Remote
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "SanFrancisco" => Some(Self::SanFrancisco),
            "Peninsula" => Some(Self::Peninsula),
            "NorthBay" => Some(Self::NorthBay),
            "EastBay" => Some(Self::EastBay),
            "SouthBay" => Some(Self::SouthBay),
            "Sacramento" => Some(Self::Sacramento),
            "Remote" => Some(Self::Remote),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SanFrancisco => "SanFrancisco",
            Self::Peninsula => "Peninsula",
            Self::NorthBay => "NorthBay",
            Self::EastBay => "EastBay",
            Self::SouthBay => "SouthBay",
            Self::Sacramento => "Sacramento",
            Self::Remote => "Remote",
        }
    }
}

impl Display for Region {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod region_tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn known_places_classify_into_their_region() {
        assert_eq!(Region::classify("San Francisco"), Region::SanFrancisco);
        assert_eq!(Region::classify("Palo Alto"), Region::Peninsula);
        assert_eq!(Region::classify("Oakland"), Region::EastBay);
        assert_eq!(Region::classify("San Jose"), Region::SouthBay);
        assert_eq!(Region::classify("Santa Rosa"), Region::NorthBay);
        assert_eq!(Region::classify("Sacramento"), Region::Sacramento);
    }

    #[test]
    fn classification_ignores_case_and_padding() {
        assert_eq!(Region::classify("  berkeley "), Region::EastBay);
        assert_eq!(Region::classify("SAN MATEO"), Region::Peninsula);
    }

    #[test]
    fn unknown_places_fall_back_to_remote() {
        assert_eq!(Region::classify("Portland"), Region::Remote);
        assert_eq!(Region::classify(""), Region::Remote);
    }

    #[test]
    fn parse_round_trips_every_region() {
        for region in Region::ALL {
            assert_eq!(Region::parse(region.as_str()), Some(region));
        }
        assert_eq!(Region::parse("Moon"), None);
    }

    proptest! {
        // Classification is total and deterministic over arbitrary input.
        #[test]
        fn classify_is_total_and_deterministic(place in ".*") {
            let first = Region::classify(&place);
            let second = Region::classify(&place);
            prop_assert_eq!(first, second);
            prop_assert!(Region::ALL.contains(&first));
        }
    }
}
