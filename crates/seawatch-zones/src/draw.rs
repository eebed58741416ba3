//! Interactive polygon capture.
//!
//! A draw session subscribes to primary and secondary picks on the map
//! engine. Primary picks add vertices with point markers; once three are in
//! place a provisional polygon follows the outline. A secondary pick closes
//! the ring and hands it to the caller, who names and stores it.

use std::sync::Arc;

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};
use tracing::{debug, info};

use seawatch_core::error::{Result, SeawatchError};
use seawatch_core::models::{LonLat, ScreenPosition};
use seawatch_core::ports::{
    EntityHandle, EntitySpec, MapEngine, PickEvent, PickGesture, SubscriptionId,
};
use seawatch_geo::validation::MIN_ZONE_VERTICES;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawState {
    Idle,
    Collecting,
    /// The last session produced a polygon; held until the next `begin()`
    Completed,
}

struct DrawSession {
    vertices: Vec<LonLat>,
    markers: Vec<EntityHandle>,
    preview: Option<EntityHandle>,
    subscriptions: Vec<SubscriptionId>,
    events: UnboundedReceiver<PickEvent>,
}

/// Polygon drawing controller bound to one map engine
pub struct GeoDraw {
    engine: Arc<dyn MapEngine>,
    state: DrawState,
    session: Option<DrawSession>,
}

impl GeoDraw {
    pub fn new(engine: Arc<dyn MapEngine>) -> Self {
        Self { engine, state: DrawState::Idle, session: None }
    }

    pub fn state(&self) -> DrawState {
        self.state
    }

    /// Vertices collected so far in the active session
    pub fn vertices(&self) -> &[LonLat] {
        self.session.as_ref().map(|s| s.vertices.as_slice()).unwrap_or(&[])
    }

    /// Start a new session, cancelling any session still collecting
    pub fn begin(&mut self) {
        self.cancel();

        let (tx, events) = unbounded_channel();
        let subscriptions = vec![
            self.engine.subscribe(PickGesture::Primary, tx.clone()),
            self.engine.subscribe(PickGesture::Secondary, tx),
        ];

        self.session = Some(DrawSession {
            vertices: Vec::new(),
            markers: Vec::new(),
            preview: None,
            subscriptions,
            events,
        });
        self.state = DrawState::Collecting;
        info!("Draw session started");
    }

    /// Abandon the active session. No-op unless collecting.
    pub fn cancel(&mut self) {
        if let Some(session) = self.session.take() {
            let found = session.vertices.len();
            self.release(session);
            self.state = DrawState::Idle;
            info!(vertices = found, "Draw session cancelled");
        }
    }

    /// Apply one pick event to the active session
    ///
    /// Returns the closed ring when the event completes the polygon. A
    /// secondary pick with too few vertices cancels the session and returns
    /// [`SeawatchError::InsufficientVertices`]. Events arriving outside a
    /// session are ignored.
    pub fn handle_event(&mut self, event: PickEvent) -> Result<Option<Vec<LonLat>>> {
        if self.session.is_none() {
            return Ok(None);
        }

        match event.gesture {
            PickGesture::Primary => {
                match self.add_vertex(event.position) {
                    Ok(()) | Err(SeawatchError::PickMiss) => {}
                    Err(e) => return Err(e),
                }
                Ok(None)
            }
            PickGesture::Secondary => self.finish().map(Some),
            PickGesture::PointerMove => Ok(None),
        }
    }

    /// Wait for the active session to produce a polygon
    ///
    /// Returns `Ok(None)` when there is no session or the engine stopped
    /// delivering events.
    pub async fn next_polygon(&mut self) -> Result<Option<Vec<LonLat>>> {
        loop {
            let event = match self.session.as_mut() {
                Some(session) => session.events.recv().await,
                None => return Ok(None),
            };

            match event {
                Some(event) => {
                    if let Some(ring) = self.handle_event(event)? {
                        return Ok(Some(ring));
                    }
                }
                None => {
                    self.cancel();
                    return Ok(None);
                }
            }
        }
    }

    fn add_vertex(&mut self, position: ScreenPosition) -> Result<()> {
        let Some(coord) = self.engine.pick_ground(position) else {
            debug!(x = position.x, y = position.y, "Pick missed the globe");
            return Err(SeawatchError::PickMiss);
        };

        let Some(session) = self.session.as_mut() else {
            return Ok(());
        };

        session.vertices.push(coord);
        session.markers.push(self.engine.add_entity(EntitySpec::preview_vertex(coord)));
        debug!(vertex = %coord, count = session.vertices.len(), "Vertex added");

        if session.vertices.len() >= MIN_ZONE_VERTICES {
            if let Some(old) = session.preview.take() {
                self.engine.remove_entity(old);
            }
            let preview = EntitySpec::preview_polygon(session.vertices.clone());
            session.preview = Some(self.engine.add_entity(preview));
        }

        Ok(())
    }

    fn finish(&mut self) -> Result<Vec<LonLat>> {
        let found = self.vertices().len();
        if found < MIN_ZONE_VERTICES {
            self.cancel();
            return Err(SeawatchError::InsufficientVertices { found });
        }

        let Some(session) = self.session.take() else {
            return Err(SeawatchError::InsufficientVertices { found: 0 });
        };
        let mut ring = self.release(session);
        ring.push(ring[0]);

        self.state = DrawState::Completed;
        info!(vertices = found, "Draw session completed");
        Ok(ring)
    }

    /// Unsubscribe and remove preview entities, returning the vertices
    fn release(&self, session: DrawSession) -> Vec<LonLat> {
        for id in session.subscriptions {
            self.engine.unsubscribe(id);
        }
        for handle in session.markers.into_iter().chain(session.preview) {
            self.engine.remove_entity(handle);
        }
        session.vertices
    }
}

impl Drop for GeoDraw {
    fn drop(&mut self) {
        self.cancel();
    }
}
