//! SeaWatch Geo - Zone rings, validation, GeoJSON codec and spatial tests
//!
//! This crate handles the geometry side of alarm zones: closing and opening
//! rings, validating them, converting zone collections to and from GeoJSON,
//! and testing vessel positions against zone polygons.

pub mod codec;
pub mod ring;
pub mod spatial;
pub mod validation;
