//! Zone registry.
//!
//! Every zone record owns exactly one map entity whose shown state mirrors
//! the record's `visible` flag. Persisted zones are replaced wholesale on each
//! reload; drafts live only here until they are saved.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::{broadcast, RwLock};
use tracing::{error, info, warn};

use seawatch_core::error::{Result, SeawatchError};
use seawatch_core::models::{LonLat, Zone, ZoneFeature, ZoneId, ZoneOrigin};
use seawatch_core::ports::{EntityHandle, EntitySpec, EntityStyle, MapEngine, ZoneApi};
use seawatch_geo::ring::open_ring;
use seawatch_geo::validation::{ensure_valid_ring, validate_ring};

const EVENT_CAPACITY: usize = 64;

/// Change notifications published by [`ZoneStore`]
#[derive(Debug, Clone, PartialEq)]
pub enum ZoneEvent {
    Reloaded { count: usize },
    DraftCreated(ZoneId),
    DraftsSaved { count: usize },
    Deleted(ZoneId),
    VisibilityChanged { id: ZoneId, visible: bool },
}

/// How far a delete got
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Draft removed; the backend never knew about it
    LocalOnly,
    /// Removed locally and confirmed by the backend
    Confirmed,
}

/// Result of a successful save
#[derive(Debug)]
pub struct SaveReport {
    pub saved: usize,
    /// Set when the zones were stored but the follow-up reload failed
    pub reload_error: Option<SeawatchError>,
}

#[derive(Debug)]
struct ZoneEntry {
    zone: Zone,
    entity: EntityHandle,
}

/// Owner of all zone records and their map entities
pub struct ZoneStore {
    api: Arc<dyn ZoneApi>,
    engine: Arc<dyn MapEngine>,
    entries: RwLock<Vec<ZoneEntry>>,
    events: broadcast::Sender<ZoneEvent>,
}

impl ZoneStore {
    pub fn new(api: Arc<dyn ZoneApi>, engine: Arc<dyn MapEngine>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self { api, engine, entries: RwLock::new(Vec::new()), events }
    }

    /// Replace the persisted zones with the backend's current set
    ///
    /// The response is fully decoded before anything changes; on failure the
    /// registry is left as it was. Reloaded zones start hidden. Drafts are
    /// untouched. Returns the number of persisted zones now held.
    pub async fn load_from_server(&self) -> Result<usize> {
        let features = self.api.list_zones().await.map_err(|e| {
            warn!(error = %e, "Failed to load zones");
            e
        })?;
        let zones = accept_features(features);
        let count = zones.len();

        {
            let mut entries = self.entries.write().await;
            let (stale, drafts): (Vec<_>, Vec<_>) =
                entries.drain(..).partition(|entry| entry.zone.origin == ZoneOrigin::Persisted);
            for entry in stale {
                self.engine.remove_entity(entry.entity);
            }

            entries.extend(zones.into_iter().map(|zone| self.attach(zone)));
            entries.extend(drafts);
        }

        info!(count, "Loaded zones from backend");
        self.notify(ZoneEvent::Reloaded { count });
        Ok(count)
    }

    /// Add an unsaved zone; a closed ring is accepted
    pub async fn create_draft(&self, name: &str, vertices: Vec<LonLat>) -> Result<ZoneId> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SeawatchError::validation("Zone name must not be empty"));
        }
        let vertices = open_ring(vertices);
        ensure_valid_ring(name, &vertices)?;

        let zone = Zone {
            id: ZoneId::draft(),
            name: name.to_string(),
            vertices,
            origin: ZoneOrigin::Draft,
            visible: true,
        };
        let id = zone.id.clone();

        self.entries.write().await.push(self.attach(zone));

        info!(zone = %id, name, "Draft zone created");
        self.notify(ZoneEvent::DraftCreated(id.clone()));
        Ok(id)
    }

    /// Submit every draft in one request, then reload
    ///
    /// Only the drafts that were submitted are discarded on success; drafts
    /// added while the request was in flight stay. On failure all drafts are
    /// kept.
    pub async fn save_drafts(&self) -> Result<SaveReport> {
        let (ids, features): (HashSet<ZoneId>, Vec<ZoneFeature>) = {
            let entries = self.entries.read().await;
            entries
                .iter()
                .filter(|entry| entry.zone.is_draft())
                .map(|entry| (entry.zone.id.clone(), ZoneFeature::from(&entry.zone)))
                .unzip()
        };

        if features.is_empty() {
            return Err(SeawatchError::validation("There are no new zones to save"));
        }

        self.api.create_zones(&features).await.map_err(|e| {
            error!(error = %e, drafts = features.len(), "Failed to save draft zones");
            e
        })?;

        let saved = features.len();
        {
            let mut entries = self.entries.write().await;
            entries.retain(|entry| {
                let submitted = ids.contains(&entry.zone.id);
                if submitted {
                    self.engine.remove_entity(entry.entity);
                }
                !submitted
            });
        }

        info!(saved, "Draft zones saved");
        self.notify(ZoneEvent::DraftsSaved { count: saved });

        let reload_error = self.load_from_server().await.err();
        Ok(SaveReport { saved, reload_error })
    }

    /// Remove a zone locally, then from the backend if it was persisted
    ///
    /// The local removal stands even when the backend call fails.
    pub async fn delete_zone(&self, id: &ZoneId) -> Result<DeleteOutcome> {
        let removed = {
            let mut entries = self.entries.write().await;
            let position = entries
                .iter()
                .position(|entry| &entry.zone.id == id)
                .ok_or_else(|| SeawatchError::ZoneNotFound { id: id.to_string() })?;
            let entry = entries.remove(position);
            self.engine.remove_entity(entry.entity);
            entry.zone
        };

        info!(zone = %id, name = %removed.name, "Zone removed");
        self.notify(ZoneEvent::Deleted(id.clone()));

        if removed.is_draft() {
            return Ok(DeleteOutcome::LocalOnly);
        }

        self.api.delete_zone(id).await.map_err(|e| {
            error!(zone = %id, error = %e, "Backend delete failed; zone stays removed locally");
            e
        })?;
        Ok(DeleteOutcome::Confirmed)
    }

    /// Show or hide a zone without touching the backend
    pub async fn set_visible(&self, id: &ZoneId, visible: bool) -> Result<()> {
        {
            let mut entries = self.entries.write().await;
            let entry = entries
                .iter_mut()
                .find(|entry| &entry.zone.id == id)
                .ok_or_else(|| SeawatchError::ZoneNotFound { id: id.to_string() })?;
            entry.zone.visible = visible;
            self.engine.set_shown(entry.entity, visible);
        }

        self.notify(ZoneEvent::VisibilityChanged { id: id.clone(), visible });
        Ok(())
    }

    /// All zones in registry order
    pub async fn snapshot(&self) -> Vec<Zone> {
        self.entries.read().await.iter().map(|entry| entry.zone.clone()).collect()
    }

    pub async fn get(&self, id: &ZoneId) -> Option<Zone> {
        self.entries.read().await.iter().find(|entry| &entry.zone.id == id).map(|e| e.zone.clone())
    }

    pub async fn draft_count(&self) -> usize {
        self.entries.read().await.iter().filter(|entry| entry.zone.is_draft()).count()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ZoneEvent> {
        self.events.subscribe()
    }

    fn attach(&self, zone: Zone) -> ZoneEntry {
        let style = match zone.origin {
            ZoneOrigin::Persisted => EntityStyle::PersistedZone,
            ZoneOrigin::Draft => EntityStyle::DraftZone,
        };
        let spec = EntitySpec::zone(zone.vertices.clone(), style, &zone.name, zone.visible);
        let entity = self.engine.add_entity(spec);
        ZoneEntry { zone, entity }
    }

    fn notify(&self, event: ZoneEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}

impl Drop for ZoneStore {
    fn drop(&mut self) {
        for entry in self.entries.get_mut().drain(..) {
            self.engine.remove_entity(entry.entity);
        }
    }
}

/// Turn backend features into hidden persisted zones, skipping unusable ones
fn accept_features(features: Vec<ZoneFeature>) -> Vec<Zone> {
    let mut seen = HashSet::new();
    features
        .into_iter()
        .filter_map(|feature| {
            let Some(id) = feature.id else {
                warn!(name = %feature.name, "Skipping zone without an id");
                return None;
            };
            if !seen.insert(id.clone()) {
                warn!(zone = %id, "Skipping duplicate zone id");
                return None;
            }
            let validation = validate_ring(&feature.vertices);
            if !validation.is_valid {
                warn!(
                    zone = %id,
                    reason = validation.first_reason().unwrap_or("invalid ring"),
                    "Skipping zone with invalid geometry"
                );
                return None;
            }
            Some(Zone {
                id,
                name: feature.name,
                vertices: feature.vertices,
                origin: ZoneOrigin::Persisted,
                visible: false,
            })
        })
        .collect()
}
