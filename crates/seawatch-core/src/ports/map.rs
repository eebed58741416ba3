//! Map engine port
//!
//! The globe renderer is an external collaborator. SeaWatch only needs to add,
//! remove and show/hide entities, resolve screen positions to the ground, and
//! receive pick gestures.

use tokio::sync::mpsc::UnboundedSender;

use crate::models::{LonLat, ScreenPosition};

/// Handle to an entity owned by whoever added it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityHandle(pub u64);

/// Handle to a live pick gesture subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

/// Pointer gestures the map engine reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PickGesture {
    /// Left click or tap
    Primary,
    /// Right click, the finish gesture
    Secondary,
    PointerMove,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickEvent {
    pub gesture: PickGesture,
    pub position: ScreenPosition,
}

impl PickEvent {
    pub fn primary(x: f64, y: f64) -> Self {
        Self { gesture: PickGesture::Primary, position: ScreenPosition::new(x, y) }
    }

    pub fn secondary(x: f64, y: f64) -> Self {
        Self { gesture: PickGesture::Secondary, position: ScreenPosition::new(x, y) }
    }
}

/// Where the map engine delivers pick events for a subscription
pub type PickSink = UnboundedSender<PickEvent>;

#[derive(Debug, Clone, PartialEq)]
pub enum EntityGeometry {
    Point(LonLat),
    /// Open ring; the engine closes it when drawing
    Polygon(Vec<LonLat>),
}

/// Visual role of an entity; the engine maps it to colours and outlines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityStyle {
    /// Saved zone (orange fill, translucent)
    PersistedZone,
    /// Unsaved zone (lime fill, translucent)
    DraftZone,
    /// Vertex marker while drawing (red point, white outline)
    PreviewVertex,
    /// Provisional polygon while drawing (yellow fill, gold outline)
    PreviewPolygon,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntitySpec {
    pub geometry: EntityGeometry,
    pub style: EntityStyle,
    pub shown: bool,
    pub label: Option<String>,
}

impl EntitySpec {
    pub fn zone(vertices: Vec<LonLat>, style: EntityStyle, label: &str, shown: bool) -> Self {
        Self {
            geometry: EntityGeometry::Polygon(vertices),
            style,
            shown,
            label: Some(label.to_string()),
        }
    }

    pub fn preview_vertex(coord: LonLat) -> Self {
        Self {
            geometry: EntityGeometry::Point(coord),
            style: EntityStyle::PreviewVertex,
            shown: true,
            label: None,
        }
    }

    pub fn preview_polygon(vertices: Vec<LonLat>) -> Self {
        Self {
            geometry: EntityGeometry::Polygon(vertices),
            style: EntityStyle::PreviewPolygon,
            shown: true,
            label: None,
        }
    }
}

/// Port for the 3D globe renderer
pub trait MapEngine: Send + Sync {
    /// Add an entity and return its handle
    fn add_entity(&self, spec: EntitySpec) -> EntityHandle;

    /// Remove an entity; unknown handles are ignored
    fn remove_entity(&self, handle: EntityHandle);

    /// Show or hide an entity
    fn set_shown(&self, handle: EntityHandle, shown: bool);

    /// Resolve a screen position to a ground coordinate, `None` when the
    /// position misses the globe
    fn pick_ground(&self, position: ScreenPosition) -> Option<LonLat>;

    /// Deliver every `gesture` to `sink` until unsubscribed
    fn subscribe(&self, gesture: PickGesture, sink: PickSink) -> SubscriptionId;

    /// Stop delivering events for a subscription; unknown ids are ignored
    fn unsubscribe(&self, id: SubscriptionId);
}
