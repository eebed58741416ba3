use clap::{Parser, Subcommand};
use std::path::PathBuf;

use seawatch_core::config::{parse_positive_secs, CliConfigOverrides};
use seawatch_core::models::LonLat;

/// SeaWatch - Maritime alarm-zone management
#[derive(Parser, Debug)]
#[command(name = "seawatch")]
#[command(about = "Maritime alarm-zone management", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to ./seawatch.toml when present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Backend API base URL (e.g., http://127.0.0.1:5000/api)
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Seconds between occupancy polls
    #[arg(long, global = true, value_name = "SECS", value_parser = parse_poll_interval)]
    pub poll_interval: Option<u64>,

    /// HTTP request timeout in seconds
    #[arg(long, global = true, value_name = "SECS", value_parser = parse_timeout)]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Configuration values given on the command line
    pub fn overrides(&self) -> CliConfigOverrides {
        CliConfigOverrides {
            api_url: self.api_url.clone(),
            poll_interval_secs: self.poll_interval,
            request_timeout_secs: self.timeout,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the zones stored on the backend
    Zones(ZonesArgs),

    /// Draw a zone from its vertices and save it
    Draw(DrawArgs),

    /// Delete a zone by id
    Delete(DeleteArgs),

    /// Poll zone occupancy and print every update
    Watch(WatchArgs),

    /// Show the effective configuration and where each value comes from
    Config,
}

#[derive(Parser, Debug)]
pub struct ZonesArgs {
    /// Fetch current occupancy once and show vessel counts
    #[arg(long)]
    pub occupancy: bool,

    /// List the vessels inside each zone (implies --occupancy)
    #[arg(long)]
    pub vessels: bool,
}

#[derive(Parser, Debug)]
pub struct DrawArgs {
    /// Zone name
    #[arg(long)]
    pub name: String,

    /// Zone vertex; repeat for each vertex, at least three
    /// Example: --vertex 121.0,25.0 --vertex 121.5,25.0 --vertex 121.5,25.5
    #[arg(
        long = "vertex",
        value_name = "LON,LAT",
        required = true,
        allow_hyphen_values = true,
        value_parser = parse_vertex
    )]
    pub vertices: Vec<LonLat>,
}

#[derive(Parser, Debug)]
pub struct DeleteArgs {
    /// Zone id as assigned by the backend
    pub id: String,
}

#[derive(Parser, Debug)]
pub struct WatchArgs {
    /// Stop after this many occupancy updates
    #[arg(long, value_name = "N")]
    pub ticks: Option<usize>,

    /// List the vessels inside each zone
    #[arg(long)]
    pub vessels: bool,
}

fn parse_poll_interval(s: &str) -> Result<u64, String> {
    parse_positive_secs("poll_interval_secs", s).map_err(|e| e.to_string())
}

fn parse_timeout(s: &str) -> Result<u64, String> {
    parse_positive_secs("request_timeout_secs", s).map_err(|e| e.to_string())
}

/// Parse a `LON,LAT` pair in degrees
pub fn parse_vertex(s: &str) -> Result<LonLat, String> {
    let (lon, lat) = s.split_once(',').ok_or_else(|| format!("expected LON,LAT, got '{}'", s))?;

    let lon: f64 = lon.trim().parse().map_err(|_| format!("invalid longitude '{}'", lon.trim()))?;
    let lat: f64 = lat.trim().parse().map_err(|_| format!("invalid latitude '{}'", lat.trim()))?;

    if !(-180.0..=180.0).contains(&lon) {
        return Err(format!("longitude {} is outside [-180, 180]", lon));
    }
    if !(-90.0..=90.0).contains(&lat) {
        return Err(format!("latitude {} is outside [-90, 90]", lat));
    }

    Ok(LonLat::new(lon, lat))
}
