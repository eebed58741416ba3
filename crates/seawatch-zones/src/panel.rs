//! Zone list panel.
//!
//! The panel never mutates zones itself. It projects the store and the
//! latest occupancy report into rows, and turns row actions into store calls.
//! Every outcome the user should see becomes a [`Notice`].

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{broadcast, watch};
use tracing::{error, info, warn};

use seawatch_core::error::SeawatchError;
use seawatch_core::models::{LonLat, OccupancyReport, VesselSnapshot, Zone, ZoneId};

use crate::store::{DeleteOutcome, ZoneEvent, ZoneStore};
use crate::sync::ZoneSync;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// User-facing message produced by a panel action
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self { level, message: message.into() }
    }

    /// Notice for a failed action; logged at the matching level
    pub fn from_error(action: &str, err: &SeawatchError) -> Self {
        let level = match err {
            SeawatchError::Validation { .. } | SeawatchError::InsufficientVertices { .. } => {
                warn!(action, error = %err, "Action rejected");
                NoticeLevel::Warning
            }
            _ => {
                error!(action, error = %err, "Action failed");
                NoticeLevel::Error
            }
        };
        Self::new(level, format!("{} failed: {}", action, err))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneRow {
    pub id: ZoneId,
    pub name: String,
    pub visible: bool,
    /// Set when at least one vessel is inside
    pub badge: bool,
    pub vessel_count: usize,
    pub expanded: bool,
    /// Filled only while the row is expanded
    pub vessels: Vec<VesselSnapshot>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PanelView {
    pub drafts: Vec<ZoneRow>,
    pub saved: Vec<ZoneRow>,
    pub fetched_at: Option<DateTime<Utc>>,
}

impl PanelView {
    pub fn rows(&self) -> impl Iterator<Item = &ZoneRow> {
        self.drafts.iter().chain(&self.saved)
    }
}

/// Row and toolbar actions
#[derive(Debug, Clone, PartialEq)]
pub enum PanelIntent {
    SetVisible { id: ZoneId, visible: bool },
    Delete(ZoneId),
    CreateDraft { name: String, vertices: Vec<LonLat> },
    SaveDrafts,
    Reload,
    ToggleExpanded(ZoneId),
}

/// Project zones and occupancy into panel rows, keeping registry order
pub fn project(zones: &[Zone], report: &OccupancyReport, expanded: &HashSet<ZoneId>) -> PanelView {
    let mut view = PanelView { fetched_at: report.fetched_at(), ..Default::default() };

    for zone in zones {
        let inside = report.vessels_in(&zone.id);
        let is_expanded = expanded.contains(&zone.id);
        let row = ZoneRow {
            id: zone.id.clone(),
            name: zone.name.clone(),
            visible: zone.visible,
            badge: !inside.is_empty(),
            vessel_count: inside.len(),
            expanded: is_expanded,
            vessels: if is_expanded { inside.to_vec() } else { Vec::new() },
        };

        if zone.is_draft() {
            view.drafts.push(row);
        } else {
            view.saved.push(row);
        }
    }

    view
}

pub struct ZonePanel {
    store: Arc<ZoneStore>,
    store_events: broadcast::Receiver<ZoneEvent>,
    store_open: bool,
    reports: watch::Receiver<Arc<OccupancyReport>>,
    poll_failures: watch::Receiver<Option<Arc<SeawatchError>>>,
    /// Cleared once the poller is gone and can publish nothing more
    sync_open: bool,
    expanded: HashSet<ZoneId>,
    notices: Vec<Notice>,
}

impl ZonePanel {
    pub fn new(store: Arc<ZoneStore>, sync: &ZoneSync) -> Self {
        let store_events = store.subscribe();
        Self {
            store,
            store_events,
            store_open: true,
            reports: sync.subscribe(),
            poll_failures: sync.subscribe_failures(),
            sync_open: true,
            expanded: HashSet::new(),
            notices: Vec::new(),
        }
    }

    /// Current rows; expansion state of vanished zones is dropped
    ///
    /// A poll failure published since the last render becomes a notice. The
    /// rows keep showing the last good report.
    pub async fn render(&mut self) -> PanelView {
        let failure = {
            let latest = self.poll_failures.borrow_and_update();
            if latest.has_changed() {
                latest.clone()
            } else {
                None
            }
        };
        if let Some(e) = failure {
            self.push(Notice::from_error("Polling occupancy", &e));
        }

        let zones = self.store.snapshot().await;
        self.expanded.retain(|id| zones.iter().any(|zone| &zone.id == id));
        let report = self.reports.borrow_and_update().clone();
        project(&zones, &report, &self.expanded)
    }

    /// Flip a row between collapsed and expanded, returning the new state
    pub fn toggle_expanded(&mut self, id: &ZoneId) -> bool {
        if self.expanded.remove(id) {
            false
        } else {
            self.expanded.insert(id.clone());
            true
        }
    }

    /// Carry out an intent; failures are recorded as notices
    pub async fn dispatch(&mut self, intent: PanelIntent) {
        match intent {
            PanelIntent::SetVisible { id, visible } => {
                if let Err(e) = self.store.set_visible(&id, visible).await {
                    self.push(Notice::from_error("Changing visibility", &e));
                }
            }
            PanelIntent::Delete(id) => {
                let name = self.store.get(&id).await.map(|z| z.name).unwrap_or_else(|| id.to_string());
                match self.store.delete_zone(&id).await {
                    Ok(DeleteOutcome::LocalOnly) => {
                        self.push(Notice::new(NoticeLevel::Info, format!("Discarded draft {}", name)));
                    }
                    Ok(DeleteOutcome::Confirmed) => {
                        self.push(Notice::new(NoticeLevel::Success, format!("Deleted zone {}", name)));
                    }
                    Err(e) => self.push(Notice::from_error(&format!("Deleting {}", name), &e)),
                }
            }
            PanelIntent::CreateDraft { name, vertices } => {
                match self.store.create_draft(&name, vertices).await {
                    Ok(id) => info!(zone = %id, "Draft added from panel"),
                    Err(e) => self.push(Notice::from_error("Creating zone", &e)),
                }
            }
            PanelIntent::SaveDrafts => match self.store.save_drafts().await {
                Ok(report) => {
                    self.push(Notice::new(
                        NoticeLevel::Success,
                        format!("Saved {} new zone(s)", report.saved),
                    ));
                    if let Some(e) = report.reload_error {
                        self.push(Notice::from_error("Reloading zones", &e));
                    }
                }
                Err(e) => self.push(Notice::from_error("Saving zones", &e)),
            },
            PanelIntent::Reload => {
                if let Err(e) = self.store.load_from_server().await {
                    self.push(Notice::from_error("Loading zones", &e));
                }
            }
            PanelIntent::ToggleExpanded(id) => {
                self.toggle_expanded(&id);
            }
        }
    }

    /// Record a notice produced outside the panel, such as a drawing error
    pub fn push(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Wait until the store, the occupancy report, or the poll status changes
    ///
    /// A source that has gone away is no longer waited on. Returns `false`
    /// once neither the store nor the poller can change again.
    pub async fn changed(&mut self) -> bool {
        loop {
            tokio::select! {
                event = self.store_events.recv(), if self.store_open => match event {
                    Err(broadcast::error::RecvError::Closed) => self.store_open = false,
                    _ => return true,
                },
                result = self.reports.changed(), if self.sync_open => match result {
                    Ok(()) => return true,
                    Err(_) => self.sync_open = false,
                },
                result = self.poll_failures.changed(), if self.sync_open => match result {
                    Ok(()) => return true,
                    Err(_) => self.sync_open = false,
                },
                else => return false,
            }
        }
    }
}
