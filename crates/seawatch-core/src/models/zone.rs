use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::LonLat;

const DRAFT_PREFIX: &str = "draft-";

/// Zone identifier
///
/// Persisted zones carry the id assigned by the backend. Drafts carry a
/// locally generated `draft-<uuid>` id until they are saved.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoneId(pub String);

impl ZoneId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Allocate a fresh temporary id for a draft zone
    pub fn draft() -> Self {
        Self(format!("{}{}", DRAFT_PREFIX, Uuid::new_v4()))
    }

    pub fn is_draft(&self) -> bool {
        self.0.starts_with(DRAFT_PREFIX)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ZoneId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ZoneId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for ZoneId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

/// Where a zone record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZoneOrigin {
    /// Loaded from the backend; carries a server id
    Persisted,
    /// Drawn locally and not saved yet
    Draft,
}

/// A named polygonal alarm zone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub id: ZoneId,

    pub name: String,

    /// Open ring: the closing vertex is not repeated
    pub vertices: Vec<LonLat>,

    pub origin: ZoneOrigin,

    pub visible: bool,
}

impl Zone {
    pub fn is_draft(&self) -> bool {
        self.origin == ZoneOrigin::Draft
    }
}

/// Zone as exchanged with the backend
///
/// `id` is `None` for zones that are about to be created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneFeature {
    pub id: Option<ZoneId>,
    pub name: String,
    /// Open ring, like [`Zone::vertices`]
    pub vertices: Vec<LonLat>,
}

impl ZoneFeature {
    /// Feature for a zone the backend has not seen yet
    pub fn unsaved(name: impl Into<String>, vertices: Vec<LonLat>) -> Self {
        Self { id: None, name: name.into(), vertices }
    }

    pub fn persisted(id: impl Into<ZoneId>, name: impl Into<String>, vertices: Vec<LonLat>) -> Self {
        Self { id: Some(id.into()), name: name.into(), vertices }
    }
}

impl From<&Zone> for ZoneFeature {
    fn from(zone: &Zone) -> Self {
        let id = match zone.origin {
            ZoneOrigin::Persisted => Some(zone.id.clone()),
            ZoneOrigin::Draft => None,
        };
        Self { id, name: zone.name.clone(), vertices: zone.vertices.clone() }
    }
}
