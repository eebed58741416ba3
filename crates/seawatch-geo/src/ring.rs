use seawatch_core::models::LonLat;

/// Close a ring by repeating the first vertex at the end
///
/// Rings that are already closed are returned unchanged.
pub fn close_ring(vertices: &[LonLat]) -> Vec<LonLat> {
    let mut ring = vertices.to_vec();
    if let Some(&first) = vertices.first() {
        if !is_closed(vertices) {
            ring.push(first);
        }
    }
    ring
}

/// Drop the closing vertex of a closed ring, along with any repeats of it
pub fn open_ring(mut vertices: Vec<LonLat>) -> Vec<LonLat> {
    while is_closed(&vertices) {
        vertices.pop();
    }
    vertices
}

/// True when the ring has at least two vertices and ends where it starts
pub fn is_closed(vertices: &[LonLat]) -> bool {
    match (vertices.first(), vertices.last()) {
        (Some(first), Some(last)) => vertices.len() > 1 && first == last,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn triangle() -> Vec<LonLat> {
        vec![LonLat::new(121.0, 25.0), LonLat::new(121.5, 25.0), LonLat::new(121.5, 25.5)]
    }

    #[test]
    fn test_close_ring_appends_first_vertex() {
        let ring = close_ring(&triangle());
        assert_eq!(ring.len(), 4);
        assert_eq!(ring[0], ring[3]);
    }

    #[test]
    fn test_close_ring_is_idempotent() {
        let closed = close_ring(&triangle());
        assert_eq!(close_ring(&closed), closed);
    }

    #[test]
    fn test_open_ring_drops_closing_vertex() {
        assert_eq!(open_ring(close_ring(&triangle())), triangle());
        assert_eq!(open_ring(triangle()), triangle());
    }

    #[test]
    fn test_open_ring_drops_repeated_closing_vertices() {
        let mut ring = close_ring(&triangle());
        ring.push(triangle()[0]);
        assert_eq!(open_ring(ring), triangle());

        let point = LonLat::new(3.0, 4.0);
        assert_eq!(open_ring(vec![point, point, point]), vec![point]);
    }

    #[test]
    fn test_empty_ring() {
        assert!(close_ring(&[]).is_empty());
        assert!(!is_closed(&[]));
        assert!(!is_closed(&[LonLat::new(1.0, 1.0)]));
    }

    fn coordinate() -> impl Strategy<Value = LonLat> {
        (-180.0f64..180.0, -90.0f64..90.0).prop_map(|(lon, lat)| LonLat::new(lon, lat))
    }

    proptest! {
        #[test]
        fn prop_closed_ring_is_input_plus_first(vertices in prop::collection::vec(coordinate(), 3..12)) {
            prop_assume!(vertices.first() != vertices.last());

            let ring = close_ring(&vertices);
            prop_assert_eq!(ring.len(), vertices.len() + 1);
            prop_assert_eq!(&ring[..vertices.len()], &vertices[..]);
            prop_assert_eq!(ring[vertices.len()], vertices[0]);
        }
    }
}
