//! Delete command implementation

use anyhow::{Context, Result};

use seawatch_core::config::LayeredConfig;
use seawatch_core::models::ZoneId;
use seawatch_zones::DeleteOutcome;

use super::Session;
use crate::cli::DeleteArgs;
use crate::output::OutputWriter;
use crate::output_types::DeleteOutput;

pub async fn execute(args: DeleteArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let session = Session::connect(config)?;
    session.store.load_from_server().await.context("Failed to load zones")?;

    let id = ZoneId::new(args.id.trim());
    let zone = session.store.get(&id).await.with_context(|| format!("No zone with id {}", id))?;

    let outcome = session
        .store
        .delete_zone(&id)
        .await
        .with_context(|| format!("Failed to delete zone {}", id))?;

    if output.is_json() {
        output.result(DeleteOutput {
            id: id.to_string(),
            name: zone.name,
            confirmed: outcome == DeleteOutcome::Confirmed,
        })?;
    } else {
        output.success(format!("Deleted zone '{}' ({})", zone.name, id));
    }

    Ok(())
}
