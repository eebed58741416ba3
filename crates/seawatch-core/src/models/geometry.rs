//! Coordinate types shared by the map engine port and the zone models.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Geographic coordinate in WGS 84 degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LonLat {
    pub lon: f64,
    pub lat: f64,
}

impl LonLat {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// GeoJSON position order: `[lon, lat]`
    pub fn to_position(self) -> [f64; 2] {
        [self.lon, self.lat]
    }

    pub fn is_finite(&self) -> bool {
        self.lon.is_finite() && self.lat.is_finite()
    }
}

impl From<[f64; 2]> for LonLat {
    fn from(position: [f64; 2]) -> Self {
        Self::new(position[0], position[1])
    }
}

impl fmt::Display for LonLat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5}, {:.5}", self.lon, self.lat)
    }
}

/// Pointer position on the map canvas, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenPosition {
    pub x: f64,
    pub y: f64,
}

impl ScreenPosition {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}
