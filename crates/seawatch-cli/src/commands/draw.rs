//! Draw command implementation
//!
//! Replays the given vertices as picks on a headless map so the zone goes
//! through the same drawing and validation path as an interactive session.

use anyhow::{Context, Result};
use tracing::debug;

use seawatch_core::config::LayeredConfig;
use seawatch_zones::GeoDraw;

use super::Session;
use crate::cli::DrawArgs;
use crate::output::OutputWriter;
use crate::output_types::DrawOutput;

pub async fn execute(args: DrawArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let session = Session::connect(config)?;

    let mut draw = GeoDraw::new(session.map.clone());
    draw.begin();
    for vertex in &args.vertices {
        session.map.click(*vertex);
    }
    session.map.finish();

    let ring = draw
        .next_polygon()
        .await
        .context("Failed to draw zone")?
        .context("Drawing ended without a polygon")?;
    let vertices = ring.len() - 1;

    let id = session.store.create_draft(&args.name, ring).await.context("Invalid zone")?;
    debug!(zone = %id, vertices, "Draft ready to save");

    let report = session.store.save_drafts().await.context("Failed to save zone")?;
    let reload_error = report.reload_error.map(|e| e.to_string());

    if output.is_json() {
        output.result(DrawOutput {
            name: args.name.trim().to_string(),
            vertices,
            saved: report.saved,
            reload_error,
        })?;
    } else {
        output.success(format!("Saved zone '{}' with {} vertices", args.name.trim(), vertices));
        if let Some(e) = reload_error {
            output.warning(format!("Zone saved, but reloading zones failed: {}", e));
        }
    }

    Ok(())
}
