use super::*;
use serde_json::json;

fn square_ring(lon: f64, lat: f64, side: f64) -> Vec<Vec<f64>> {
    vec![
        vec![lon, lat],
        vec![lon + side, lat],
        vec![lon + side, lat + side],
        vec![lon, lat + side],
        vec![lon, lat],
    ]
}

fn suburb_collection(zip_key: &str, entries: &[(&str, f64, f64, f64)]) -> FeatureCollection {
    let features: Vec<serde_json::Value> = entries
        .iter()
        .map(|(zip, lon, lat, side)| {
            json!({
                "type": "Feature",
                "properties": { zip_key: zip },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [square_ring(*lon, *lat, *side)],
                },
            })
        })
        .collect();
    serde_json::from_value(json!({ "type": "FeatureCollection", "features": features })).unwrap()
}

#[test]
fn ring_area_matches_planar_approximation_near_equator() {
    // 0.01 degree square centered on the equator; spherical distortion is
    // negligible there, so the planar value is a tight reference.
    let ring = square_ring(0.0, -0.005, 0.01);
    let side_m = 0.01_f64.to_radians() * 6_378_137.0;
    let expected = side_m * side_m;
    let got = ring_area_m2(&ring).abs();
    assert!(
        (got - expected).abs() / expected < 1e-3,
        "got {got}, expected about {expected}"
    );
}

#[test]
fn ring_orientation_flips_the_sign() {
    let ring = square_ring(0.0, 0.0, 0.01);
    let mut reversed = ring.clone();
    reversed.reverse();
    let a = ring_area_m2(&ring);
    let b = ring_area_m2(&reversed);
    assert!(a != 0.0);
    assert!((a + b).abs() < 1e-6 * a.abs());
}

#[test]
fn degenerate_rings_have_no_area() {
    assert_eq!(ring_area_m2(&[]), 0.0);
    assert_eq!(ring_area_m2(&square_ring(0.0, 0.0, 0.01)[..2]), 0.0);
}

#[test]
fn holes_subtract_from_the_outer_ring() {
    let outer = square_ring(0.0, 0.0, 0.1);
    let hole = square_ring(0.02, 0.02, 0.05);
    let full = polygon_area_m2(&[outer.clone()]);
    let holed = polygon_area_m2(&[outer, hole.clone()]);
    assert!(holed < full);
    let hole_area = ring_area_m2(&hole).abs();
    assert!((full - holed - hole_area).abs() / full < 1e-6);
}

#[test]
fn multipolygon_area_sums_parts() {
    let part = square_ring(0.0, 0.0, 0.01);
    let other = square_ring(1.0, 0.0, 0.01);
    let geometry = Geometry::MultiPolygon {
        coordinates: vec![vec![part.clone()], vec![other]],
    };
    let single = geometry_area_m2(&Geometry::Polygon {
        coordinates: vec![part],
    });
    let double = geometry_area_m2(&geometry);
    assert!((double - 2.0 * single).abs() / double < 1e-6);
}

#[test]
fn zoom_buckets() {
    assert_eq!(zoom_for_area(60_000_000.0), 8);
    assert_eq!(zoom_for_area(50_000_000.0), 9);
    assert_eq!(zoom_for_area(10_000_001.0), 9);
    assert_eq!(zoom_for_area(10_000_000.0), 10);
    assert_eq!(zoom_for_area(1_500_001.0), 10);
    assert_eq!(zoom_for_area(1_500_000.0), 11);
    assert_eq!(zoom_for_area(0.0), 11);
}

#[test]
fn first_position_is_total() {
    let polygon = Geometry::Polygon {
        coordinates: vec![square_ring(-122.4, 37.7, 0.01)],
    };
    assert_eq!(first_position(&polygon), Some([-122.4, 37.7]));

    let multi = Geometry::MultiPolygon {
        coordinates: vec![vec![square_ring(-121.9, 37.3, 0.01)]],
    };
    assert_eq!(first_position(&multi), Some([-121.9, 37.3]));

    let empty = Geometry::Polygon {
        coordinates: vec![],
    };
    assert_eq!(first_position(&empty), None);

    let short = Geometry::Polygon {
        coordinates: vec![vec![vec![1.0]]],
    };
    assert_eq!(first_position(&short), None);
}

#[test]
fn parses_numeric_zip_properties() {
    let collection = FeatureCollection::parse(
        r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": { "ZCTA": 94110 },
                "geometry": { "type": "Polygon", "coordinates": [[[0.0, 0.0], [0.01, 0.0], [0.01, 0.01], [0.0, 0.0]]] }
            }]
        }"#,
    )
    .unwrap();
    assert_eq!(
        collection.features[0].property_text("ZCTA").as_deref(),
        Some("94110")
    );
    assert_eq!(collection.features[0].property_text("zip"), None);
}

#[test]
fn unsupported_geometry_is_a_parse_error() {
    let err = FeatureCollection::parse(
        r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": {},
                "geometry": { "type": "Point", "coordinates": [0.0, 0.0] }
            }]
        }"#,
    )
    .unwrap_err();
    assert_eq!(err.code, GeoErrorCode::Parse);
}

fn test_atlas() -> SuburbAtlas {
    let mut atlas = SuburbAtlas::empty();
    // Large suburb (0.1 deg across, well over 50 km^2) and a tiny one.
    atlas.add_collection(
        "zip",
        suburb_collection(
            "zip",
            &[
                ("94110", -122.42, 37.74, 0.1),
                ("94601", -122.22, 37.78, 0.005),
            ],
        ),
    );
    atlas.add_collection(
        "ZCTA",
        suburb_collection("ZCTA", &[("94607", -122.30, 37.80, 0.02)]),
    );
    atlas
}

#[test]
fn exact_match_picks_area_based_zoom_and_first_coordinate() {
    let atlas = test_atlas();

    let big = atlas.map_view("94110", &[], &[]);
    assert_eq!(big.zoom, 8);
    assert_eq!(big.center, Some([-122.42, 37.74]));
    assert_eq!(big.features.len(), 1);

    let small = atlas.map_view("94601", &[], &[]);
    assert_eq!(small.zoom, 11);
    assert_eq!(small.center, Some([-122.22, 37.78]));

    // Matches are found across sources with different property keys.
    let zcta = atlas.map_view("94607", &[], &[]);
    assert_eq!(zcta.center, Some([-122.30, 37.80]));
    assert_eq!(zcta.features.len(), 1);
}

#[test]
fn missing_zip_falls_back_to_location_then_region() {
    let atlas = test_atlas();
    let location = vec!["94601".to_owned(), "94607".to_owned()];
    let region = vec!["94110".to_owned()];

    let by_location = atlas.map_view("99999", &location, &region);
    assert_eq!(by_location.zoom, DEFAULT_ZOOM);
    assert_eq!(by_location.features.len(), 2);
    assert_eq!(by_location.center, Some([-122.22, 37.78]));

    let by_region = atlas.map_view("99999", &[], &region);
    assert_eq!(by_region.features.len(), 1);
    assert_eq!(by_region.center, Some([-122.42, 37.74]));

    let nothing = atlas.map_view("99999", &[], &[]);
    assert_eq!(nothing.center, None);
    assert!(nothing.features.is_empty());
    assert_eq!(nothing.zoom, DEFAULT_ZOOM);
}

proptest::proptest! {
    #[test]
    fn zoom_is_bounded_and_monotone(a in 0.0_f64..1e12, b in 0.0_f64..1e12) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let zoom_lo = zoom_for_area(lo);
        let zoom_hi = zoom_for_area(hi);
        proptest::prop_assert!((8..=11).contains(&zoom_lo));
        proptest::prop_assert!(zoom_hi <= zoom_lo);
    }
}

#[test]
fn remote_view_is_the_wide_default() {
    let view = MapView::remote();
    assert_eq!(view.center, Some(DEFAULT_CENTER));
    assert_eq!(view.zoom, DEFAULT_ZOOM);
    assert!(view.features.is_empty());
}
