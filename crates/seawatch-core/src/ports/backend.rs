use async_trait::async_trait;

use crate::error::Result;
use crate::models::{ZoneFeature, ZoneId, ZoneOccupancy};

/// Port for zone persistence on the backend
#[async_trait]
pub trait ZoneApi: Send + Sync {
    /// Fetch the canonical zone collection; every returned feature has an id
    async fn list_zones(&self) -> Result<Vec<ZoneFeature>>;

    /// Create zones in one request. Ids on the input are ignored.
    async fn create_zones(&self, zones: &[ZoneFeature]) -> Result<()>;

    /// Delete one persisted zone
    async fn delete_zone(&self, id: &ZoneId) -> Result<()>;
}

/// Port for per-zone vessel occupancy
#[async_trait]
pub trait OccupancyApi: Send + Sync {
    /// Fetch current occupancy for all zones in a single call
    async fn fetch_occupancy(&self) -> Result<ZoneOccupancy>;
}
