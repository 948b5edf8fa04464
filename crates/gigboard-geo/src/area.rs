use crate::geojson::{Geometry, Position};

/// WGS84 equatorial radius, meters.
const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Signed spherical area of a linear ring, in square meters. Positive for
/// counter-clockwise rings. Rings with fewer than three positions have no
/// area.
#[must_use]
pub fn ring_area_m2(ring: &[Position]) -> f64 {
    let n = ring.len();
    if n < 3 {
        return 0.0;
    }
    let lon = |p: &Position| p.first().copied().unwrap_or(0.0).to_radians();
    let lat = |p: &Position| p.get(1).copied().unwrap_or(0.0).to_radians();
    let mut total = 0.0;
    for i in 0..n {
        let p1 = &ring[i];
        let p2 = &ring[(i + 1) % n];
        let p3 = &ring[(i + 2) % n];
        total += (lon(p3) - lon(p1)) * lat(p2).sin();
    }
    total * EARTH_RADIUS_M * EARTH_RADIUS_M / 2.0
}

/// Absolute area of a polygon: outer ring minus interior holes.
#[must_use]
pub fn polygon_area_m2(rings: &[Vec<Position>]) -> f64 {
    let mut rings = rings.iter();
    let Some(outer) = rings.next() else {
        return 0.0;
    };
    let mut area = ring_area_m2(outer).abs();
    for hole in rings {
        area -= ring_area_m2(hole).abs();
    }
    area.max(0.0)
}

#[must_use]
pub fn geometry_area_m2(geometry: &Geometry) -> f64 {
    match geometry {
        Geometry::Polygon { coordinates } => polygon_area_m2(coordinates),
        Geometry::MultiPolygon { coordinates } => {
            coordinates.iter().map(|poly| polygon_area_m2(poly)).sum()
        }
    }
}

/// Zoom bucket for a suburb of the given area: large suburbs get a wide view,
/// small ones a close-up.
#[must_use]
pub fn zoom_for_area(area_m2: f64) -> u8 {
    if area_m2 > 50_000_000.0 {
        8
    } else if area_m2 > 10_000_000.0 {
        9
    } else if area_m2 > 1_500_000.0 {
        10
    } else {
        11
    }
}
