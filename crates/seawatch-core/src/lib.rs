//! SeaWatch Core - Domain models, configuration, and port definitions
//!
//! This crate contains the zone and occupancy models shared by every SeaWatch
//! crate, the layered configuration, and the ports that the map engine and
//! backend adapters implement.

pub mod config;
pub mod error;
pub mod models;
pub mod ports;

pub use error::{Result, SeawatchError};
