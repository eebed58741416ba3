//! Command implementations

mod config;
mod delete;
mod draw;
mod watch;
mod zones;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::debug;

use seawatch_client::HttpBackend;
use seawatch_core::config::LayeredConfig;
use seawatch_zones::{HeadlessMap, ZonePanel, ZoneStore, ZoneSync};

use crate::cli::{Cli, Commands};
use crate::config_loader::load_config;
use crate::output::OutputWriter;

/// Execute a CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);
    let config = load_config(cli.config.as_deref(), cli.overrides())?;

    match cli.command {
        Commands::Zones(args) => zones::execute(args, &config, &output).await,
        Commands::Draw(args) => draw::execute(args, &config, &output).await,
        Commands::Delete(args) => delete::execute(args, &config, &output).await,
        Commands::Watch(args) => watch::execute(args, &config, &output).await,
        Commands::Config => config::execute(&config, &output),
    }
}

/// Zone components wired to the configured backend and a headless map
pub(crate) struct Session {
    pub map: Arc<HeadlessMap>,
    pub store: Arc<ZoneStore>,
    pub sync: Arc<ZoneSync>,
}

impl Session {
    pub fn connect(config: &LayeredConfig) -> Result<Self> {
        let backend =
            Arc::new(HttpBackend::from_config(config).context("Failed to create backend client")?);
        debug!(api_url = backend.base_url(), "Backend client ready");

        let map = Arc::new(HeadlessMap::new());
        let store = Arc::new(ZoneStore::new(backend.clone(), map.clone()));
        let sync = Arc::new(
            ZoneSync::new(backend, config.poll_interval()).context("Invalid poll interval")?,
        );

        Ok(Self { map, store, sync })
    }

    pub fn panel(&self) -> ZonePanel {
        ZonePanel::new(self.store.clone(), &self.sync)
    }
}
