//! Zones command implementation

use anyhow::{Context, Result};

use seawatch_core::config::LayeredConfig;
use seawatch_zones::{PanelView, ZonePanel};

use super::Session;
use crate::cli::ZonesArgs;
use crate::output::OutputWriter;
use crate::output_types::{VesselTableRow, ZoneTableRow};

pub async fn execute(args: ZonesArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let session = Session::connect(config)?;
    session.store.load_from_server().await.context("Failed to load zones")?;

    let mut panel = session.panel();
    if args.occupancy || args.vessels {
        session.sync.tick().await;
    }
    if args.vessels {
        expand_all(&mut panel).await;
    }

    let view = panel.render().await;
    for notice in panel.take_notices() {
        output.notice(&notice);
    }
    print_view(&view, args.vessels, output)
}

/// Expand every row so the view carries vessel lists
pub(crate) async fn expand_all(panel: &mut ZonePanel) {
    let view = panel.render().await;
    for row in view.rows().filter(|row| !row.expanded) {
        panel.toggle_expanded(&row.id);
    }
}

pub(crate) fn print_view(view: &PanelView, show_vessels: bool, output: &OutputWriter) -> Result<()> {
    if output.is_json() {
        return output.result(view);
    }

    if let Some(fetched_at) = view.fetched_at {
        output.kv("Occupancy as of", fetched_at.format("%Y-%m-%d %H:%M:%S UTC"));
    }

    if !view.drafts.is_empty() {
        output.section(format!("Unsaved zones ({})", view.drafts.len()));
        output.table(view.drafts.iter().map(ZoneTableRow::from).collect());
    }

    output.section(format!("Saved zones ({})", view.saved.len()));
    output.table(view.saved.iter().map(ZoneTableRow::from).collect());

    if show_vessels {
        let vessels: Vec<VesselTableRow> = view
            .rows()
            .flat_map(|row| row.vessels.iter().map(|v| VesselTableRow::new(&row.name, v)))
            .collect();
        output.section("Vessels in zones");
        output.table(vessels);
    }

    Ok(())
}
