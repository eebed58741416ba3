use seawatch_core::error::{Result, SeawatchError};
use seawatch_core::models::LonLat;

use crate::ring::is_closed;

/// Minimum number of distinct vertices in a zone ring
pub const MIN_ZONE_VERTICES: usize = 3;

/// Validation result with details
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
}

/// Validation error with location details
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub location: String,
    pub reason: String,
}

impl ValidationResult {
    /// Create a valid result
    pub fn valid() -> Self {
        Self { is_valid: true, errors: Vec::new() }
    }

    /// Add an error to the result
    pub fn add_error(&mut self, location: String, reason: String) {
        self.is_valid = false;
        self.errors.push(ValidationError { location, reason });
    }

    /// First error reason, for single-line reporting
    pub fn first_reason(&self) -> Option<&str> {
        self.errors.first().map(|e| e.reason.as_str())
    }
}

/// Validate a zone ring
///
/// The ring may be open or closed; a closing vertex does not count towards
/// the minimum.
pub fn validate_ring(vertices: &[LonLat]) -> ValidationResult {
    let mut result = ValidationResult::valid();

    let distinct = if is_closed(vertices) { vertices.len() - 1 } else { vertices.len() };
    if distinct < MIN_ZONE_VERTICES {
        result.add_error(
            "Ring".to_string(),
            format!("Ring must have at least {} vertices, found {}", MIN_ZONE_VERTICES, distinct),
        );
    }

    for (i, coord) in vertices.iter().enumerate() {
        if !coord.is_finite() {
            result.add_error(format!("Ring[{}]", i), "Coordinates must be finite".to_string());
            continue;
        }

        if !(-180.0..=180.0).contains(&coord.lon) || !(-90.0..=90.0).contains(&coord.lat) {
            result.add_error(
                format!("Ring[{}]", i),
                format!("Coordinate ({}) is outside WGS 84 bounds", coord),
            );
        }
    }

    result
}

/// Validate a zone ring, mapping failures to errors
///
/// Too few vertices is reported as `InsufficientVertices` so callers can tell
/// an unfinished drawing apart from corrupt coordinates.
pub fn ensure_valid_ring(zone: &str, vertices: &[LonLat]) -> Result<()> {
    let distinct = if is_closed(vertices) { vertices.len() - 1 } else { vertices.len() };
    if distinct < MIN_ZONE_VERTICES {
        return Err(SeawatchError::InsufficientVertices { found: distinct });
    }

    let validation = validate_ring(vertices);
    if validation.is_valid {
        Ok(())
    } else {
        Err(SeawatchError::InvalidGeometry {
            zone: zone.to_string(),
            reason: validation.first_reason().unwrap_or("Invalid geometry").to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<LonLat> {
        vec![
            LonLat::new(0.0, 0.0),
            LonLat::new(1.0, 0.0),
            LonLat::new(1.0, 1.0),
            LonLat::new(0.0, 1.0),
        ]
    }

    #[test]
    fn test_valid_open_and_closed_rings() {
        assert!(validate_ring(&square()).is_valid);

        let mut closed = square();
        closed.push(LonLat::new(0.0, 0.0));
        assert!(validate_ring(&closed).is_valid);
    }

    #[test]
    fn test_closing_vertex_does_not_count() {
        let closed = vec![LonLat::new(0.0, 0.0), LonLat::new(1.0, 0.0), LonLat::new(0.0, 0.0)];
        let result = validate_ring(&closed);
        assert!(!result.is_valid);
        assert!(result.first_reason().unwrap().contains("found 2"));
    }

    #[test]
    fn test_non_finite_coordinates() {
        let mut ring = square();
        ring[2] = LonLat::new(f64::NAN, 1.0);
        let result = validate_ring(&ring);
        assert!(!result.is_valid);
        assert_eq!(result.errors[0].location, "Ring[2]");
    }

    #[test]
    fn test_out_of_bounds_coordinates() {
        let mut ring = square();
        ring[1] = LonLat::new(200.0, 0.0);
        assert!(!validate_ring(&ring).is_valid);
    }

    #[test]
    fn test_ensure_valid_ring_errors() {
        assert!(ensure_valid_ring("z", &square()).is_ok());

        let err = ensure_valid_ring("z", &square()[..2]).unwrap_err();
        assert!(matches!(err, SeawatchError::InsufficientVertices { found: 2 }));

        let mut ring = square();
        ring[0] = LonLat::new(0.0, 95.0);
        let err = ensure_valid_ring("north", &ring).unwrap_err();
        assert!(matches!(err, SeawatchError::InvalidGeometry { ref zone, .. } if zone == "north"));
    }
}
