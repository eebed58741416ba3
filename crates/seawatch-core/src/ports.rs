//! Port trait definitions
//!
//! These traits define the interfaces that the map engine and backend
//! adapters must implement.

pub mod backend;
pub mod map;

pub use backend::{OccupancyApi, ZoneApi};
pub use map::{
    EntityGeometry, EntityHandle, EntitySpec, EntityStyle, MapEngine, PickEvent, PickGesture,
    PickSink, SubscriptionId,
};
