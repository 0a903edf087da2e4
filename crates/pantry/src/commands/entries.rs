//! `pantry entries`: list and remove stored config entries.

use tabled::Tabled;

use pantry_core::ConfigEntry;

use crate::cli::{EntriesArgs, EntriesCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
pub struct EntryRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Strategy")]
    strategy: String,
    #[tabled(rename = "URL")]
    url: String,
    #[tabled(rename = "Created")]
    created: String,
}

impl From<&ConfigEntry> for EntryRow {
    fn from(e: &ConfigEntry) -> Self {
        Self {
            id: e.entry_id.to_string(),
            title: e.title.clone(),
            strategy: e.data.strategy.to_string(),
            url: e
                .data
                .base_url
                .as_ref()
                .map_or_else(|| "(fixed)".into(), ToString::to_string),
            created: e.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: EntriesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let mut loaded = config::load(global)?;

    match args.command {
        EntriesCommand::List => {
            let out = output::render_list(
                &global.output_format(),
                &loaded.config.entries,
                |e| EntryRow::from(e),
                |e| e.entry_id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        EntriesCommand::Remove { id } => {
            let entry = loaded
                .config
                .find_entry(&id)
                .map_err(|e| CliError::config(e, &loaded.path))?
                .clone();

            if !util::confirm(
                &format!("Remove entry '{}' ({})?", entry.title, entry.entry_id),
                global.yes,
            )? {
                return Ok(());
            }

            loaded
                .config
                .remove_entry(&entry.entry_id)
                .map_err(|e| CliError::config(e, &loaded.path))?;
            loaded.save()?;
            if !global.quiet {
                eprintln!("Entry removed");
            }
            Ok(())
        }
    }
}
