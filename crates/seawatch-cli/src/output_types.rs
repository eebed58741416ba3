use serde::Serialize;
use tabled::Tabled;

use seawatch_core::config::ConfigSource;
use seawatch_core::models::VesselSnapshot;
use seawatch_zones::ZoneRow;

/// Table row for a zone
#[derive(Debug, Tabled)]
pub struct ZoneTableRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Shown")]
    pub shown: &'static str,
    #[tabled(rename = "Vessels")]
    pub vessels: usize,
    #[tabled(rename = "Alarm")]
    pub alarm: &'static str,
}

impl From<&ZoneRow> for ZoneTableRow {
    fn from(row: &ZoneRow) -> Self {
        Self {
            id: row.id.to_string(),
            name: row.name.clone(),
            shown: if row.visible { "yes" } else { "no" },
            vessels: row.vessel_count,
            alarm: if row.badge { "●" } else { "" },
        }
    }
}

/// Table row for a vessel inside a zone
#[derive(Debug, Tabled)]
pub struct VesselTableRow {
    #[tabled(rename = "Zone")]
    pub zone: String,
    #[tabled(rename = "Vessel")]
    pub vessel: String,
    #[tabled(rename = "Lat")]
    pub lat: String,
    #[tabled(rename = "Lon")]
    pub lon: String,
}

impl VesselTableRow {
    pub fn new(zone: &str, vessel: &VesselSnapshot) -> Self {
        Self {
            zone: zone.to_string(),
            vessel: vessel.name.clone(),
            lat: format!("{:.5}", vessel.lat),
            lon: format!("{:.5}", vessel.lon),
        }
    }
}

/// Output for draw command
#[derive(Debug, Serialize)]
pub struct DrawOutput {
    pub name: String,
    pub vertices: usize,
    pub saved: usize,
    pub reload_error: Option<String>,
}

/// Output for delete command
#[derive(Debug, Serialize)]
pub struct DeleteOutput {
    pub id: String,
    pub name: String,
    pub confirmed: bool,
}

#[derive(Debug, Serialize)]
pub struct ConfigEntry {
    pub key: String,
    pub value: String,
    pub source: ConfigSource,
}

/// Table row for the config command
#[derive(Debug, Tabled)]
pub struct ConfigTableRow {
    #[tabled(rename = "Key")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Source")]
    pub source: String,
}

impl From<&ConfigEntry> for ConfigTableRow {
    fn from(entry: &ConfigEntry) -> Self {
        Self {
            key: entry.key.clone(),
            value: entry.value.clone(),
            source: format!("{:?}", entry.source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seawatch_core::models::ZoneId;

    #[test]
    fn test_zone_table_row_marks_alarm() {
        let row = ZoneRow {
            id: ZoneId::from("4"),
            name: "Pratas".to_string(),
            visible: false,
            badge: true,
            vessel_count: 2,
            expanded: false,
            vessels: vec![],
        };

        let table_row = ZoneTableRow::from(&row);
        assert_eq!(table_row.id, "4");
        assert_eq!(table_row.shown, "no");
        assert_eq!(table_row.vessels, 2);
        assert_eq!(table_row.alarm, "●");
    }
}
