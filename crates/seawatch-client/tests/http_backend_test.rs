//! Integration tests for the HTTP backend against an in-process server

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use serde_json::{json, Value};

use seawatch_client::HttpBackend;
use seawatch_core::error::SeawatchError;
use seawatch_core::models::{LonLat, ZoneFeature, ZoneId};
use seawatch_core::ports::{OccupancyApi, ZoneApi};

#[derive(Clone, Default)]
struct ServerState {
    posted: Arc<Mutex<Vec<Value>>>,
    deleted: Arc<Mutex<Vec<String>>>,
}

async fn list_zones() -> Json<Value> {
    Json(json!({
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "properties": {"id": 7, "name": "Taiwan Bank"},
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[117.0, 22.0], [118.0, 22.0], [118.0, 23.0], [117.0, 22.0]]]
            }
        }]
    }))
}

async fn create_zones(State(state): State<ServerState>, Json(body): Json<Value>) -> StatusCode {
    state.posted.lock().unwrap().push(body);
    StatusCode::CREATED
}

async fn delete_zone(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> (StatusCode, String) {
    if id == "404" {
        return (StatusCode::NOT_FOUND, "no such zone".to_string());
    }
    state.deleted.lock().unwrap().push(id);
    (StatusCode::OK, String::new())
}

async fn occupancy() -> Json<Value> {
    Json(json!({
        "status": "success",
        "data": {"7": [{"shipname": "FU YUAN YU 081", "lat": 22.5, "lon": 117.5}]}
    }))
}

async fn slow_occupancy() -> Json<Value> {
    tokio::time::sleep(Duration::from_secs(2)).await;
    Json(json!({"status": "success", "data": {}}))
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route("/api/zones", get(list_zones).post(create_zones))
        .route("/api/zones/{id}", delete(delete_zone))
        .route("/api/zone-occupancy", get(occupancy))
        .route("/slow/zone-occupancy", get(slow_occupancy))
        .with_state(state)
}

async fn spawn_server(state: ServerState) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.unwrap();
    });
    format!("http://{}", addr)
}

fn triangle() -> Vec<LonLat> {
    vec![LonLat::new(121.0, 25.0), LonLat::new(121.5, 25.0), LonLat::new(121.5, 25.5)]
}

#[tokio::test]
async fn test_list_zones() {
    let base = spawn_server(ServerState::default()).await;
    let backend = HttpBackend::new(&format!("{}/api", base), Duration::from_secs(5)).unwrap();

    let zones = backend.list_zones().await.unwrap();
    assert_eq!(zones.len(), 1);
    assert_eq!(zones[0].id, Some(ZoneId::from("7")));
    assert_eq!(zones[0].name, "Taiwan Bank");
    assert_eq!(zones[0].vertices.len(), 3);
}

#[tokio::test]
async fn test_create_posts_feature_collection_without_ids() {
    let state = ServerState::default();
    let base = spawn_server(state.clone()).await;
    let backend = HttpBackend::new(&format!("{}/api", base), Duration::from_secs(5)).unwrap();

    let zones = vec![
        ZoneFeature::unsaved("A", triangle()),
        ZoneFeature::persisted("draft-should-not-leak", "B", triangle()),
    ];
    backend.create_zones(&zones).await.unwrap();

    let posted = state.posted.lock().unwrap();
    assert_eq!(posted.len(), 1);
    let body = &posted[0];
    assert_eq!(body["type"], "FeatureCollection");
    assert_eq!(body["features"].as_array().unwrap().len(), 2);
    for feature in body["features"].as_array().unwrap() {
        assert!(feature["properties"].get("id").is_none());
        let ring = feature["geometry"]["coordinates"][0].as_array().unwrap();
        assert_eq!(ring.first(), ring.last());
    }
}

#[tokio::test]
async fn test_delete_success_and_rejection() {
    let state = ServerState::default();
    let base = spawn_server(state.clone()).await;
    let backend = HttpBackend::new(&format!("{}/api", base), Duration::from_secs(5)).unwrap();

    backend.delete_zone(&ZoneId::from("7")).await.unwrap();
    assert_eq!(*state.deleted.lock().unwrap(), vec!["7".to_string()]);

    let err = backend.delete_zone(&ZoneId::from("404")).await.unwrap_err();
    match err {
        SeawatchError::ServerRejection { status, body } => {
            assert_eq!(status, 404);
            assert_eq!(body, "no such zone");
        }
        other => panic!("expected a rejection, got {:?}", other),
    }
}

#[tokio::test]
async fn test_fetch_occupancy() {
    let base = spawn_server(ServerState::default()).await;
    let backend = HttpBackend::new(&format!("{}/api", base), Duration::from_secs(5)).unwrap();

    let occupancy = backend.fetch_occupancy().await.unwrap();
    assert_eq!(occupancy[&ZoneId::from("7")][0].name, "FU YUAN YU 081");
}

#[tokio::test]
async fn test_request_timeout_is_a_network_failure() {
    let base = spawn_server(ServerState::default()).await;
    let backend = HttpBackend::new(&format!("{}/slow", base), Duration::from_millis(100)).unwrap();

    let err = backend.fetch_occupancy().await.unwrap_err();
    assert!(matches!(err, SeawatchError::Network { .. }));
}

#[tokio::test]
async fn test_unreachable_backend_is_a_network_failure() {
    // Bind and drop to get a port nothing listens on
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let backend =
        HttpBackend::new(&format!("http://{}/api", addr), Duration::from_secs(2)).unwrap();
    let err = backend.list_zones().await.unwrap_err();
    assert!(matches!(err, SeawatchError::Network { .. }));
}
