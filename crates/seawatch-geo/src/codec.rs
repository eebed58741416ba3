//! GeoJSON codec for zone collections
//!
//! The backend exchanges zones as a FeatureCollection of Polygon features,
//! with the zone name (and, for stored zones, the id) in the properties.

use geojson::{feature::Id, Feature, FeatureCollection, GeoJson, Geometry, JsonObject, Value};
use serde_json::json;

use seawatch_core::error::{Result, SeawatchError};
use seawatch_core::models::{LonLat, ZoneFeature, ZoneId};

use crate::ring::{close_ring, open_ring};
use crate::validation::validate_ring;

/// Encode zones as a FeatureCollection with closed rings
pub fn encode_zones(zones: &[ZoneFeature]) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: zones.iter().map(encode_zone).collect(),
        foreign_members: None,
    }
}

fn encode_zone(zone: &ZoneFeature) -> Feature {
    let ring: Vec<Vec<f64>> =
        close_ring(&zone.vertices).into_iter().map(|c| vec![c.lon, c.lat]).collect();

    let mut properties = JsonObject::new();
    properties.insert("name".to_string(), json!(zone.name));
    if let Some(id) = &zone.id {
        properties.insert("id".to_string(), json!(id.as_str()));
    }

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Polygon(vec![ring]))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Decode the backend's zone collection
///
/// Features that are not polygons, carry no id, or have a malformed ring are
/// skipped with a warning; the rest of the collection is still returned.
pub fn decode_zones(body: &str) -> Result<Vec<ZoneFeature>> {
    let geojson: GeoJson = body
        .parse()
        .map_err(|e| SeawatchError::Serialization(format!("Failed to parse GeoJSON: {}", e)))?;

    let collection = match geojson {
        GeoJson::FeatureCollection(fc) => fc,
        other => {
            return Err(SeawatchError::Serialization(format!(
                "Expected a FeatureCollection, got {}",
                geojson_kind(&other)
            )))
        }
    };

    let zones = collection
        .features
        .iter()
        .enumerate()
        .filter_map(|(idx, feature)| match decode_zone(feature) {
            Ok(zone) => Some(zone),
            Err(reason) => {
                tracing::warn!(feature = idx, reason = %reason, "Skipping zone feature");
                None
            }
        })
        .collect();

    Ok(zones)
}

fn decode_zone(feature: &Feature) -> std::result::Result<ZoneFeature, String> {
    let id = feature_id(feature).ok_or_else(|| "feature has no id".to_string())?;

    let exterior = match feature.geometry.as_ref().map(|g| &g.value) {
        Some(Value::Polygon(rings)) => {
            rings.first().ok_or_else(|| format!("zone {} has an empty polygon", id))?
        }
        Some(other) => return Err(format!("zone {} is a {}, not a Polygon", id, value_kind(other))),
        None => return Err(format!("zone {} has no geometry", id)),
    };

    let vertices = exterior
        .iter()
        .map(|position| match position.as_slice() {
            [lon, lat, ..] => Ok(LonLat::new(*lon, *lat)),
            _ => Err(format!("zone {} has a position with fewer than 2 values", id)),
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let validation = validate_ring(&vertices);
    if !validation.is_valid {
        return Err(format!(
            "zone {}: {}",
            id,
            validation.first_reason().unwrap_or("invalid ring")
        ));
    }

    let name = feature
        .property("name")
        .and_then(|n| n.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| format!("Zone {}", id));

    Ok(ZoneFeature { id: Some(id), name, vertices: open_ring(vertices) })
}

/// Zone id from `properties.id`, falling back to the feature-level id
fn feature_id(feature: &Feature) -> Option<ZoneId> {
    let from_properties = feature.property("id").and_then(|value| match value {
        serde_json::Value::String(s) if !s.is_empty() => Some(ZoneId::new(s.clone())),
        serde_json::Value::Number(n) => Some(ZoneId::new(n.to_string())),
        _ => None,
    });

    from_properties.or_else(|| {
        feature.id.as_ref().map(|id| match id {
            Id::String(s) => ZoneId::new(s.clone()),
            Id::Number(n) => ZoneId::new(n.to_string()),
        })
    })
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Point(_) => "Point",
        Value::MultiPoint(_) => "MultiPoint",
        Value::LineString(_) => "LineString",
        Value::MultiLineString(_) => "MultiLineString",
        Value::Polygon(_) => "Polygon",
        Value::MultiPolygon(_) => "MultiPolygon",
        Value::GeometryCollection(_) => "GeometryCollection",
    }
}

fn geojson_kind(geojson: &GeoJson) -> &'static str {
    match geojson {
        GeoJson::Geometry(_) => "a bare Geometry",
        GeoJson::Feature(_) => "a single Feature",
        GeoJson::FeatureCollection(_) => "a FeatureCollection",
    }
}
