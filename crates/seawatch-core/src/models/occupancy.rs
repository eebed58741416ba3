use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::ZoneId;

/// A tracked vessel's position as reported for a zone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VesselSnapshot {
    #[serde(rename = "shipname")]
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

/// Vessels currently inside each zone, keyed by zone id
pub type ZoneOccupancy = BTreeMap<ZoneId, Vec<VesselSnapshot>>;

/// Result of the last successful occupancy poll
///
/// Replaced wholesale on every successful poll and never merged. Zones that
/// the report does not mention read as empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OccupancyReport {
    vessels: ZoneOccupancy,
    fetched_at: Option<DateTime<Utc>>,
}

impl OccupancyReport {
    pub fn new(vessels: ZoneOccupancy, fetched_at: DateTime<Utc>) -> Self {
        Self { vessels, fetched_at: Some(fetched_at) }
    }

    /// Vessels inside `zone`, in the order the backend reported them
    pub fn vessels_in(&self, zone: &ZoneId) -> &[VesselSnapshot] {
        self.vessels.get(zone).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_occupied(&self, zone: &ZoneId) -> bool {
        !self.vessels_in(zone).is_empty()
    }

    pub fn zone_ids(&self) -> impl Iterator<Item = &ZoneId> {
        self.vessels.keys()
    }

    /// When the report was fetched; `None` until the first successful poll
    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    pub fn total_vessels(&self) -> usize {
        self.vessels.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vessel(name: &str) -> VesselSnapshot {
        VesselSnapshot { name: name.to_string(), lat: 25.1, lon: 121.4 }
    }

    #[test]
    fn test_absent_zone_reads_as_empty() {
        let report = OccupancyReport::default();
        assert!(report.vessels_in(&ZoneId::from("1")).is_empty());
        assert!(!report.is_occupied(&ZoneId::from("1")));
        assert!(report.fetched_at().is_none());
    }

    #[test]
    fn test_vessel_order_is_preserved() {
        let mut vessels = ZoneOccupancy::new();
        vessels.insert(ZoneId::from("7"), vec![vessel("B"), vessel("A")]);
        vessels.insert(ZoneId::from("8"), Vec::new());

        let report = OccupancyReport::new(vessels, Utc::now());
        let names: Vec<_> = report.vessels_in(&ZoneId::from("7")).iter().map(|v| &v.name).collect();
        assert_eq!(names, vec!["B", "A"]);
        assert!(!report.is_occupied(&ZoneId::from("8")));
        assert_eq!(report.total_vessels(), 2);
    }

    #[test]
    fn test_vessel_wire_name() {
        let parsed: VesselSnapshot =
            serde_json::from_str(r#"{"shipname": "MIN TAI 6", "lat": 25.2, "lon": 121.3}"#).unwrap();
        assert_eq!(parsed.name, "MIN TAI 6");
    }
}
