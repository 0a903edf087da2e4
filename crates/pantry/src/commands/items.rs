//! `pantry items`: one fetch, one rendering of every sensor.

use std::time::Duration;

use tabled::Tabled;

use pantry_core::{Entity, EntitySnapshot, Hub, PantrySensor};

use crate::cli::{GlobalOpts, ItemsArgs};
use crate::config;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ItemRow {
    #[tabled(rename = "Entity")]
    unique_id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Unit")]
    unit: String,
    #[tabled(rename = "Expires")]
    expiry: String,
    #[tabled(rename = "Available")]
    available: String,
}

impl From<&EntitySnapshot> for ItemRow {
    fn from(s: &EntitySnapshot) -> Self {
        Self {
            unique_id: s.unique_id.clone(),
            name: s.name.clone(),
            state: s.state.to_string(),
            unit: s.unit_of_measurement.clone().unwrap_or_default(),
            expiry: s
                .attributes
                .get("expiry_date")
                .and_then(serde_json::Value::as_str)
                .unwrap_or_default()
                .to_owned(),
            available: if s.available { "yes" } else { "no" }.into(),
        }
    }
}

/// Render the current state of every sensor.
pub fn render_sensors(sensors: &[PantrySensor], global: &GlobalOpts) -> Result<String, CliError> {
    let snapshots: Vec<EntitySnapshot> = sensors.iter().map(Entity::snapshot).collect();
    output::render_list(
        &global.output_format(),
        &snapshots,
        |s| ItemRow::from(s),
        |s| format!("{}\t{}", s.unique_id, s.state),
    )
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(args: ItemsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let loaded = config::load(global)?;
    let entry = util::select_entry(&loaded.config, args.entry.as_deref(), &loaded.path)?;

    let mut runtime = loaded.runtime(global)?;
    // One-shot: no background polling.
    runtime.update_interval = Duration::ZERO;

    let hub = Hub::new(runtime);
    let sensors = hub.setup_entry(entry).await;
    hub.shutdown().await;
    let sensors = sensors?;

    let out = render_sensors(&sensors, global)?;
    output::print_output(&out, global.quiet);
    Ok(())
}
