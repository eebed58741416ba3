//! Watch command implementation

use anyhow::Result;

use seawatch_core::config::LayeredConfig;
use seawatch_zones::PanelIntent;

use super::zones::{expand_all, print_view};
use super::Session;
use crate::cli::WatchArgs;
use crate::output::OutputWriter;

pub async fn execute(args: WatchArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let session = Session::connect(config)?;
    let mut panel = session.panel();

    panel.dispatch(PanelIntent::Reload).await;
    for notice in panel.take_notices() {
        output.notice(&notice);
    }
    if args.vessels {
        expand_all(&mut panel).await;
    }

    let poller = session.sync.spawn();
    if !output.is_json() {
        output.info(format!(
            "Polling occupancy every {}s, press Ctrl-C to stop",
            config.poll_interval_secs.value
        ));
    }

    let mut last_poll = None;
    let mut updates = 0;
    loop {
        tokio::select! {
            changed = panel.changed() => {
                if !changed {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }

        let view = panel.render().await;
        for notice in panel.take_notices() {
            output.notice(&notice);
        }
        // Only occupancy updates are printed
        if view.fetched_at.is_none() || view.fetched_at == last_poll {
            continue;
        }
        last_poll = view.fetched_at;
        updates += 1;

        print_view(&view, args.vessels, output)?;
        if args.ticks.is_some_and(|limit| updates >= limit) {
            break;
        }
    }

    if !poller.join().await {
        anyhow::bail!("Occupancy polling stopped unexpectedly");
    }
    Ok(())
}
