//! Config command implementation

use anyhow::Result;

use seawatch_core::config::LayeredConfig;

use crate::output::OutputWriter;
use crate::output_types::{ConfigEntry, ConfigTableRow};

pub fn execute(config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let mut entries: Vec<ConfigEntry> = config
        .to_inspection_map()
        .into_iter()
        .map(|(key, (value, source))| ConfigEntry { key, value, source })
        .collect();

    // Sort by key for consistent output
    entries.sort_by(|a, b| a.key.cmp(&b.key));

    if output.is_json() {
        output.result(&entries)?;
    } else {
        output.section("Configuration Values");
        output.table(entries.iter().map(ConfigTableRow::from).collect());

        output.section("Configuration Precedence");
        output.info("CLI arguments > Environment variables > Config file > Defaults");
    }

    Ok(())
}
