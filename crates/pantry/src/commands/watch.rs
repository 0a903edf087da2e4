//! `pantry watch`: keep an entry loaded and re-render after every poll.

use std::time::Duration;

use tracing::info;

use pantry_core::Hub;

use crate::cli::{GlobalOpts, WatchArgs};
use crate::config;
use crate::error::CliError;
use crate::output;

use super::{items, util};

pub async fn handle(args: WatchArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let loaded = config::load(global)?;
    let entry = util::select_entry(&loaded.config, args.entry.as_deref(), &loaded.path)?;

    let mut runtime = loaded.runtime(global)?;
    if let Some(secs) = args.interval {
        runtime.update_interval = Duration::from_secs(secs);
    }
    if runtime.update_interval.is_zero() {
        return Err(CliError::Validation {
            field: "interval".into(),
            reason: "polling is disabled (update_interval = 0); pass --interval <SECS>".into(),
        });
    }
    let interval = runtime.update_interval;
    let color = output::should_color(global.color_mode());

    let hub = Hub::new(runtime);
    let sensors = hub.setup_entry(entry).await?;
    let Some(coordinator) = hub.coordinator(&entry.entry_id) else {
        return Err(CliError::Internal("entry vanished right after setup".into()));
    };
    let mut updates = coordinator.handle();

    info!(entry_id = %entry.entry_id, interval_secs = interval.as_secs(), "watching pantry");
    let report = || -> Result<(), CliError> {
        let count = coordinator.data().map_or(0, |d| d.len());
        if !global.quiet {
            eprintln!("{}", output::status_line(&coordinator.status(), count, color));
        }
        let out = items::render_sensors(&sensors, global)?;
        output::print_output(&out, global.quiet);
        Ok(())
    };

    report()?;
    let result = loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break Ok(()),
            changed = updates.changed() => {
                if !changed {
                    break Ok(());
                }
                if let Err(e) = report() {
                    break Err(e);
                }
            }
        }
    };

    hub.shutdown().await;
    result
}
