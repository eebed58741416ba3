//! In-memory backend for development and testing.
//!
//! Uses `RwLock::unwrap()` intentionally. Lock poisoning only occurs when
//! another thread panicked while holding the lock, which is an unrecoverable
//! state for a test double.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use seawatch_core::error::{Result, SeawatchError};
use seawatch_core::models::{VesselSnapshot, ZoneFeature, ZoneId, ZoneOccupancy};
use seawatch_core::ports::{OccupancyApi, ZoneApi};
use seawatch_geo::spatial::vessels_inside;
use seawatch_geo::validation::ensure_valid_ring;

/// Number of requests served per endpoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestLog {
    pub list: usize,
    pub create: usize,
    pub delete: usize,
    pub occupancy: usize,
}

#[derive(Debug, Default)]
struct BackendState {
    zones: BTreeMap<u64, ZoneFeature>,
    next_id: u64,
    vessels: Vec<VesselSnapshot>,
    offline: bool,
    requests: RequestLog,
}

/// In-memory implementation of the zone and occupancy endpoints
///
/// Assigns sequential numeric ids and computes occupancy by testing the
/// current vessel positions against every stored zone.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    state: Arc<RwLock<BackendState>>,
}

impl MemoryBackend {
    /// Create a new, empty backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the tracked vessel positions
    pub fn set_vessels(&self, vessels: Vec<VesselSnapshot>) {
        self.state.write().unwrap().vessels = vessels;
    }

    /// While offline every request fails with a network error
    pub fn set_offline(&self, offline: bool) {
        self.state.write().unwrap().offline = offline;
    }

    /// Store a zone directly, bypassing the request log
    pub fn seed_zone(&self, zone: ZoneFeature) -> ZoneId {
        let mut state = self.state.write().unwrap();
        insert_zone(&mut state, zone)
    }

    pub fn zone_names(&self) -> Vec<String> {
        self.state.read().unwrap().zones.values().map(|z| z.name.clone()).collect()
    }

    pub fn requests(&self) -> RequestLog {
        self.state.read().unwrap().requests
    }
}

fn insert_zone(state: &mut BackendState, zone: ZoneFeature) -> ZoneId {
    state.next_id += 1;
    let id = state.next_id;
    let zone_id = ZoneId::from(id);
    state.zones.insert(id, ZoneFeature { id: Some(zone_id.clone()), ..zone });
    zone_id
}

fn check_online(state: &BackendState) -> Result<()> {
    if state.offline {
        Err(SeawatchError::network("memory backend is offline"))
    } else {
        Ok(())
    }
}

#[async_trait]
impl ZoneApi for MemoryBackend {
    async fn list_zones(&self) -> Result<Vec<ZoneFeature>> {
        let mut state = self.state.write().unwrap();
        state.requests.list += 1;
        check_online(&state)?;

        Ok(state.zones.values().cloned().collect())
    }

    async fn create_zones(&self, zones: &[ZoneFeature]) -> Result<()> {
        let mut state = self.state.write().unwrap();
        state.requests.create += 1;
        check_online(&state)?;

        // Validate the whole batch before storing any of it
        for zone in zones {
            if zone.name.trim().is_empty() {
                return Err(SeawatchError::ServerRejection {
                    status: 400,
                    body: "zone name is required".to_string(),
                });
            }
            ensure_valid_ring(&zone.name, &zone.vertices).map_err(|e| {
                SeawatchError::ServerRejection { status: 400, body: e.to_string() }
            })?;
        }

        for zone in zones {
            insert_zone(&mut state, ZoneFeature::unsaved(zone.name.clone(), zone.vertices.clone()));
        }

        Ok(())
    }

    async fn delete_zone(&self, id: &ZoneId) -> Result<()> {
        let mut state = self.state.write().unwrap();
        state.requests.delete += 1;
        check_online(&state)?;

        let removed = id.as_str().parse::<u64>().ok().and_then(|key| state.zones.remove(&key));
        match removed {
            Some(_) => Ok(()),
            None => Err(SeawatchError::ServerRejection {
                status: 404,
                body: format!("zone {} not found", id),
            }),
        }
    }
}

#[async_trait]
impl OccupancyApi for MemoryBackend {
    async fn fetch_occupancy(&self) -> Result<ZoneOccupancy> {
        let mut state = self.state.write().unwrap();
        state.requests.occupancy += 1;
        check_online(&state)?;

        Ok(state
            .zones
            .values()
            .filter_map(|zone| {
                let id = zone.id.clone()?;
                let inside =
                    vessels_inside(&zone.vertices, &state.vessels).into_iter().cloned().collect();
                Some((id, inside))
            })
            .collect())
    }
}
