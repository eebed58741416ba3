//! SeaWatch Zones - Alarm-zone drawing, registry, occupancy polling and panel
//!
//! The four components are wired explicitly: each receives the map engine or
//! backend ports it needs through its constructor.
//!
//! - [`GeoDraw`] captures a polygon from pick gestures
//! - [`ZoneStore`] owns zone records and their map entities
//! - [`ZoneSync`] polls per-zone vessel occupancy
//! - [`ZonePanel`] projects both into list rows and dispatches row actions

pub mod draw;
pub mod headless;
pub mod panel;
pub mod store;
pub mod sync;

pub use draw::{DrawState, GeoDraw};
pub use headless::{HeadlessMap, Viewport};
pub use panel::{Notice, NoticeLevel, PanelIntent, PanelView, ZonePanel, ZoneRow};
pub use store::{DeleteOutcome, SaveReport, ZoneEvent, ZoneStore};
pub use sync::{PollerHandle, TickOutcome, ZoneSync};
