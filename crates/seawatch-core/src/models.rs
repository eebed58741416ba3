pub mod geometry;
pub mod occupancy;
pub mod zone;

pub use geometry::{LonLat, ScreenPosition};
pub use occupancy::{OccupancyReport, VesselSnapshot, ZoneOccupancy};
pub use zone::{Zone, ZoneFeature, ZoneId, ZoneOrigin};
