use geo::algorithm::bounding_rect::BoundingRect;
use geo::algorithm::contains::Contains;
use geo::{Coord, LineString, Point, Polygon, Rect};

use seawatch_core::models::{LonLat, VesselSnapshot};

/// Build a `geo` polygon from an open or closed zone ring
pub fn zone_polygon(vertices: &[LonLat]) -> Polygon {
    let coords: Vec<Coord> = vertices.iter().map(|c| Coord { x: c.lon, y: c.lat }).collect();
    // LineString -> Polygon closes the ring when needed
    Polygon::new(LineString::new(coords), vec![])
}

/// Check if a coordinate lies strictly inside a zone
pub fn zone_contains(vertices: &[LonLat], coord: LonLat) -> bool {
    zone_polygon(vertices).contains(&Point::new(coord.lon, coord.lat))
}

/// Vessels inside a zone, in input order
pub fn vessels_inside<'a>(
    vertices: &[LonLat],
    vessels: &'a [VesselSnapshot],
) -> Vec<&'a VesselSnapshot> {
    let polygon = zone_polygon(vertices);
    let bbox = polygon.bounding_rect();

    vessels
        .iter()
        .filter(|vessel| {
            let point = Point::new(vessel.lon, vessel.lat);
            // Cheap reject before the full containment test
            bbox.map_or(false, |rect| rect_contains(&rect, &point)) && polygon.contains(&point)
        })
        .collect()
}

fn rect_contains(rect: &Rect, point: &Point) -> bool {
    point.x() >= rect.min().x
        && point.x() <= rect.max().x
        && point.y() >= rect.min().y
        && point.y() <= rect.max().y
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<LonLat> {
        vec![
            LonLat::new(120.0, 24.0),
            LonLat::new(121.0, 24.0),
            LonLat::new(121.0, 25.0),
            LonLat::new(120.0, 25.0),
        ]
    }

    fn vessel(name: &str, lon: f64, lat: f64) -> VesselSnapshot {
        VesselSnapshot { name: name.to_string(), lat, lon }
    }

    #[test]
    fn test_zone_contains() {
        assert!(zone_contains(&square(), LonLat::new(120.5, 24.5)));
        assert!(!zone_contains(&square(), LonLat::new(122.0, 24.5)));
    }

    #[test]
    fn test_open_and_closed_rings_agree() {
        let mut closed = square();
        closed.push(closed[0]);
        let point = LonLat::new(120.2, 24.9);
        assert_eq!(zone_contains(&square(), point), zone_contains(&closed, point));
    }

    #[test]
    fn test_vessels_inside_keeps_order() {
        let vessels = vec![
            vessel("FAR AWAY", 130.0, 30.0),
            vessel("HAI XUN 06", 120.9, 24.1),
            vessel("MIN JIN 1", 120.1, 24.8),
        ];

        let inside = vessels_inside(&square(), &vessels);
        let names: Vec<_> = inside.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["HAI XUN 06", "MIN JIN 1"]);
    }

    #[test]
    fn test_empty_ring_contains_nothing() {
        let vessels = vec![vessel("X", 0.0, 0.0)];
        assert!(vessels_inside(&[], &vessels).is_empty());
    }
}
