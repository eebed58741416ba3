//! Shared test doubles for the zone workflow tests

#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::oneshot;

use seawatch_client::MemoryBackend;
use seawatch_core::error::Result;
use seawatch_core::models::{LonLat, ZoneFeature, ZoneId, ZoneOccupancy};
use seawatch_core::ports::{OccupancyApi, ZoneApi};

/// Held request: signals when it is entered and waits for release
struct Gate {
    entered: oneshot::Sender<()>,
    release: oneshot::Receiver<()>,
}

/// Test side of a held request
pub struct GateHandle {
    entered: oneshot::Receiver<()>,
    release: oneshot::Sender<()>,
}

impl GateHandle {
    /// Wait until the backend is holding the request
    pub async fn entered(&mut self) {
        (&mut self.entered).await.expect("gated request never arrived");
    }

    pub fn release(self) {
        let _ = self.release.send(());
    }
}

fn gate() -> (Gate, GateHandle) {
    let (entered_tx, entered_rx) = oneshot::channel();
    let (release_tx, release_rx) = oneshot::channel();
    (
        Gate { entered: entered_tx, release: release_rx },
        GateHandle { entered: entered_rx, release: release_tx },
    )
}

async fn pass(slot: &Mutex<Option<Gate>>) {
    let held = slot.lock().unwrap().take();
    if let Some(gate) = held {
        let _ = gate.entered.send(());
        let _ = gate.release.await;
    }
}

/// [`MemoryBackend`] whose next request of a kind can be held open
///
/// A held list request captures the zone set before it waits, so a later
/// release delivers a stale response.
#[derive(Default)]
pub struct GatedBackend {
    pub inner: MemoryBackend,
    list: Mutex<Option<Gate>>,
    create: Mutex<Option<Gate>>,
    delete: Mutex<Option<Gate>>,
    occupancy: Mutex<Option<Gate>>,
}

impl GatedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hold_next_list(&self) -> GateHandle {
        Self::arm(&self.list)
    }

    pub fn hold_next_create(&self) -> GateHandle {
        Self::arm(&self.create)
    }

    pub fn hold_next_delete(&self) -> GateHandle {
        Self::arm(&self.delete)
    }

    pub fn hold_next_occupancy(&self) -> GateHandle {
        Self::arm(&self.occupancy)
    }

    fn arm(slot: &Mutex<Option<Gate>>) -> GateHandle {
        let (gate, handle) = gate();
        *slot.lock().unwrap() = Some(gate);
        handle
    }
}

#[async_trait]
impl ZoneApi for GatedBackend {
    async fn list_zones(&self) -> Result<Vec<ZoneFeature>> {
        let zones = self.inner.list_zones().await;
        pass(&self.list).await;
        zones
    }

    async fn create_zones(&self, zones: &[ZoneFeature]) -> Result<()> {
        pass(&self.create).await;
        self.inner.create_zones(zones).await
    }

    async fn delete_zone(&self, id: &ZoneId) -> Result<()> {
        pass(&self.delete).await;
        self.inner.delete_zone(id).await
    }
}

#[async_trait]
impl OccupancyApi for GatedBackend {
    async fn fetch_occupancy(&self) -> Result<ZoneOccupancy> {
        pass(&self.occupancy).await;
        self.inner.fetch_occupancy().await
    }
}

pub fn square(lon: f64, lat: f64) -> Vec<LonLat> {
    vec![
        LonLat::new(lon, lat),
        LonLat::new(lon + 1.0, lat),
        LonLat::new(lon + 1.0, lat + 1.0),
        LonLat::new(lon, lat + 1.0),
    ]
}
