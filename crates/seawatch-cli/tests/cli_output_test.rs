//! Integration tests for the seawatch binary
//!
//! These tests verify JSON output and that failures exit non-zero with a
//! readable message.

use std::io::Write;
use std::process::{Command, Output};

use tempfile::NamedTempFile;

fn seawatch(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_seawatch"))
        .args(args)
        .env_remove("SEAWATCH_API_URL")
        .env_remove("SEAWATCH_POLL_INTERVAL_SECS")
        .env_remove("SEAWATCH_REQUEST_TIMEOUT_SECS")
        .env("RUST_LOG", "off")
        .output()
        .expect("Failed to execute seawatch")
}

/// Base URL of a port nothing listens on
fn unreachable_api() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/api", addr)
}

#[test]
fn test_config_json_reports_sources() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "poll_interval_secs = 20").unwrap();
    let path = file.path().to_str().unwrap();

    let output = seawatch(&["config", "--json", "--config", path, "--timeout", "7"]);
    assert!(output.status.success());

    let parsed: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("Output should be valid JSON");
    assert_eq!(parsed["status"], "success");

    let entries = parsed["data"].as_array().unwrap();
    let entry = |key: &str| entries.iter().find(|e| e["key"] == key).cloned().unwrap();
    assert_eq!(entry("api_url")["source"], "Default");
    assert_eq!(entry("poll_interval_secs")["value"], "20s");
    assert_eq!(entry("poll_interval_secs")["source"], "File");
    assert_eq!(entry("request_timeout_secs")["value"], "7s");
    assert_eq!(entry("request_timeout_secs")["source"], "Cli");
}

#[test]
fn test_draw_with_two_vertices_fails_before_any_request() {
    let api = unreachable_api();
    let output = seawatch(&[
        "draw",
        "--api-url",
        &api,
        "--name",
        "Line",
        "--vertex",
        "121.0,25.0",
        "--vertex",
        "121.5,25.0",
    ]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to draw zone"), "stderr: {}", stderr);
    assert!(stderr.contains("at least 3 vertices"), "stderr: {}", stderr);
}

#[test]
fn test_invalid_vertex_is_a_usage_error() {
    let output = seawatch(&["draw", "--name", "Bad", "--vertex", "200,10"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("longitude"));
}

#[test]
fn test_unreachable_backend_fails_zones() {
    let api = unreachable_api();
    let output = seawatch(&["zones", "--api-url", &api, "--timeout", "2"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to load zones"), "stderr: {}", stderr);
}

#[test]
fn test_missing_config_file_fails() {
    let output = seawatch(&["config", "--config", "/nonexistent/seawatch.toml"]);
    assert!(!output.status.success());
}
