//! `pantry setup`: run the setup flow and store the resulting entry.

use tracing::debug;

use pantry_core::{ConfigEntry, ConfigFlow, FlowResult, ResolveStrategy};

use crate::cli::{GlobalOpts, SetupArgs};
use crate::config;
use crate::error::CliError;
use crate::output;

use super::entries::EntryRow;
use super::util;

pub async fn handle(args: SetupArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let mut loaded = config::load(global)?;
    let runtime = loaded.runtime(global)?;
    let strategy = ResolveStrategy::from(args.strategy);

    let flow = ConfigFlow::new(runtime.addon.clone(), runtime.supervisor_client()?, strategy);
    debug!(%strategy, supervised = runtime.supervisor.is_some(), "starting setup flow");

    match flow.step_user(&loaded.config.entries, false).await {
        FlowResult::ShowForm {
            description_placeholders,
            ..
        } => {
            let slug = description_placeholders
                .get("addon_slug")
                .map_or(runtime.addon.slug.as_str(), String::as_str);
            let prompt = format!("Set up pantry sensors for the '{slug}' add-on?");
            if !util::confirm(&prompt, global.yes)? {
                return Ok(());
            }
        }
        FlowResult::Abort(reason) => return Err(reason.into()),
        FlowResult::CreateEntry { .. } => {}
    }

    let (title, data) = match flow.step_user(&loaded.config.entries, true).await {
        FlowResult::CreateEntry { title, data } => (title, data),
        FlowResult::Abort(reason) => return Err(reason.into()),
        FlowResult::ShowForm { .. } => {
            return Err(CliError::Internal(
                "setup flow asked for confirmation twice".into(),
            ));
        }
    };

    let entry = ConfigEntry::new(title, data);
    loaded.config.add_entry(entry.clone());
    loaded.save()?;

    if !global.quiet {
        eprintln!("Entry created in {}", loaded.path.display());
    }
    let out = output::render_list(
        &global.output_format(),
        std::slice::from_ref(&entry),
        |e| EntryRow::from(e),
        |e| e.entry_id.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
