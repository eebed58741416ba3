//! SeaWatch Client - Backend adapters
//!
//! This crate provides the reqwest adapter for the zone and occupancy
//! endpoints, and an in-memory backend for development and testing.

pub mod http;
pub mod memory;

pub use http::HttpBackend;
pub use memory::{MemoryBackend, RequestLog};
