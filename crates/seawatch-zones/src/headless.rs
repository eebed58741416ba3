//! Headless map engine.
//!
//! Keeps entities and subscriptions in memory and projects the canvas onto
//! the globe with a plain equirectangular viewport. The CLI drives drawing
//! through it and the tests inspect it.
//!
//! Uses `Mutex::unwrap()` intentionally. Lock poisoning only occurs when
//! another thread panicked while holding the lock, which is an unrecoverable
//! state here.

use std::collections::BTreeMap;
use std::sync::Mutex;

use seawatch_core::models::{LonLat, ScreenPosition};
use seawatch_core::ports::{
    EntityHandle, EntitySpec, EntityStyle, MapEngine, PickEvent, PickGesture, PickSink,
    SubscriptionId,
};

/// Canvas size in pixels and the geographic extent it shows
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl Default for Viewport {
    /// Whole globe on a 3600 x 1800 canvas, ten pixels per degree
    fn default() -> Self {
        Self { width: 3600.0, height: 1800.0, west: -180.0, south: -90.0, east: 180.0, north: 90.0 }
    }
}

impl Viewport {
    /// Ground coordinate under a canvas position, `None` off the canvas
    pub fn project(&self, position: ScreenPosition) -> Option<LonLat> {
        let on_canvas = position.x.is_finite()
            && position.y.is_finite()
            && (0.0..=self.width).contains(&position.x)
            && (0.0..=self.height).contains(&position.y);
        if !on_canvas {
            return None;
        }

        let lon = self.west + position.x / self.width * (self.east - self.west);
        let lat = self.north - position.y / self.height * (self.north - self.south);
        Some(LonLat::new(lon, lat))
    }

    /// Canvas position of a ground coordinate; may lie off the canvas
    pub fn unproject(&self, coord: LonLat) -> ScreenPosition {
        let x = (coord.lon - self.west) / (self.east - self.west) * self.width;
        let y = (self.north - coord.lat) / (self.north - self.south) * self.height;
        ScreenPosition::new(x, y)
    }
}

#[derive(Debug)]
struct Subscription {
    gesture: PickGesture,
    sink: PickSink,
}

#[derive(Debug, Default)]
struct MapState {
    entities: BTreeMap<EntityHandle, EntitySpec>,
    subscriptions: BTreeMap<SubscriptionId, Subscription>,
    next_entity: u64,
    next_subscription: u64,
}

/// In-memory [`MapEngine`]
#[derive(Debug, Default)]
pub struct HeadlessMap {
    viewport: Viewport,
    state: Mutex<MapState>,
}

impl HeadlessMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_viewport(viewport: Viewport) -> Self {
        Self { viewport, state: Mutex::default() }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Deliver a pick event to every live subscription for its gesture
    ///
    /// Returns the number of sinks that received it. Subscriptions whose
    /// receiver is gone are dropped.
    pub fn emit(&self, event: PickEvent) -> usize {
        let mut state = self.state.lock().unwrap();
        let mut delivered = 0;
        state.subscriptions.retain(|id, sub| {
            if sub.gesture != event.gesture {
                return true;
            }
            match sub.sink.send(event) {
                Ok(()) => {
                    delivered += 1;
                    true
                }
                Err(_) => {
                    tracing::debug!(subscription = id.0, "Dropping closed pick subscription");
                    false
                }
            }
        });
        delivered
    }

    /// Emit a primary pick at the canvas position of `coord`
    pub fn click(&self, coord: LonLat) -> usize {
        let position = self.viewport.unproject(coord);
        self.emit(PickEvent::primary(position.x, position.y))
    }

    /// Emit a secondary pick at the canvas origin
    pub fn finish(&self) -> usize {
        self.emit(PickEvent::secondary(0.0, 0.0))
    }

    pub fn entity(&self, handle: EntityHandle) -> Option<EntitySpec> {
        self.state.lock().unwrap().entities.get(&handle).cloned()
    }

    pub fn entity_count(&self) -> usize {
        self.state.lock().unwrap().entities.len()
    }

    pub fn entities_with_style(&self, style: EntityStyle) -> Vec<EntitySpec> {
        self.state
            .lock()
            .unwrap()
            .entities
            .values()
            .filter(|spec| spec.style == style)
            .cloned()
            .collect()
    }

    pub fn shown_count(&self) -> usize {
        self.state.lock().unwrap().entities.values().filter(|spec| spec.shown).count()
    }

    pub fn subscription_count(&self) -> usize {
        self.state.lock().unwrap().subscriptions.len()
    }
}

impl MapEngine for HeadlessMap {
    fn add_entity(&self, spec: EntitySpec) -> EntityHandle {
        let mut state = self.state.lock().unwrap();
        state.next_entity += 1;
        let handle = EntityHandle(state.next_entity);
        state.entities.insert(handle, spec);
        handle
    }

    fn remove_entity(&self, handle: EntityHandle) {
        self.state.lock().unwrap().entities.remove(&handle);
    }

    fn set_shown(&self, handle: EntityHandle, shown: bool) {
        if let Some(spec) = self.state.lock().unwrap().entities.get_mut(&handle) {
            spec.shown = shown;
        }
    }

    fn pick_ground(&self, position: ScreenPosition) -> Option<LonLat> {
        self.viewport.project(position)
    }

    fn subscribe(&self, gesture: PickGesture, sink: PickSink) -> SubscriptionId {
        let mut state = self.state.lock().unwrap();
        state.next_subscription += 1;
        let id = SubscriptionId(state.next_subscription);
        state.subscriptions.insert(id, Subscription { gesture, sink });
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.state.lock().unwrap().subscriptions.remove(&id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::unbounded_channel;

    #[test]
    fn test_viewport_round_trip() {
        let viewport = Viewport::default();
        let coord = LonLat::new(121.5, 25.0);
        let projected = viewport.project(viewport.unproject(coord)).unwrap();
        assert!((projected.lon - coord.lon).abs() < 1e-9);
        assert!((projected.lat - coord.lat).abs() < 1e-9);
    }

    #[test]
    fn test_off_canvas_is_a_miss() {
        let map = HeadlessMap::new();
        assert!(map.pick_ground(ScreenPosition::new(-1.0, 10.0)).is_none());
        assert!(map.pick_ground(ScreenPosition::new(10.0, 1800.5)).is_none());
        assert!(map.pick_ground(ScreenPosition::new(f64::NAN, 0.0)).is_none());
        assert_eq!(map.pick_ground(ScreenPosition::new(0.0, 0.0)), Some(LonLat::new(-180.0, 90.0)));
    }

    #[test]
    fn test_entities_and_visibility() {
        let map = HeadlessMap::new();
        let a = map.add_entity(EntitySpec::preview_vertex(LonLat::new(1.0, 2.0)));
        let b = map.add_entity(EntitySpec::preview_vertex(LonLat::new(3.0, 4.0)));
        assert_ne!(a, b);
        assert_eq!(map.shown_count(), 2);

        map.set_shown(a, false);
        assert_eq!(map.shown_count(), 1);
        assert!(!map.entity(a).unwrap().shown);

        map.remove_entity(a);
        map.remove_entity(a);
        assert_eq!(map.entity_count(), 1);
    }

    #[test]
    fn test_emit_routes_by_gesture() {
        let map = HeadlessMap::new();
        let (tx, mut rx) = unbounded_channel();
        let id = map.subscribe(PickGesture::Primary, tx);

        assert_eq!(map.emit(PickEvent::secondary(1.0, 1.0)), 0);
        assert_eq!(map.emit(PickEvent::primary(1.0, 1.0)), 1);
        assert_eq!(rx.try_recv().unwrap(), PickEvent::primary(1.0, 1.0));

        map.unsubscribe(id);
        assert_eq!(map.emit(PickEvent::primary(1.0, 1.0)), 0);
    }

    #[test]
    fn test_closed_sinks_are_dropped() {
        let map = HeadlessMap::new();
        let (tx, rx) = unbounded_channel();
        map.subscribe(PickGesture::Primary, tx);
        drop(rx);

        assert_eq!(map.emit(PickEvent::primary(1.0, 1.0)), 0);
        assert_eq!(map.subscription_count(), 0);
    }
}
