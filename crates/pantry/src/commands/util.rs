//! Shared helpers for command handlers.

use pantry_config::Config;
use pantry_core::ConfigEntry;

use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Pick the entry a command works on: the one named by `--entry`, or the
/// only stored entry.
pub fn select_entry<'a>(
    config: &'a Config,
    requested: Option<&str>,
    path: &std::path::Path,
) -> Result<&'a ConfigEntry, CliError> {
    if let Some(id) = requested {
        return config.find_entry(id).map_err(|e| CliError::config(e, path));
    }

    match config.entries.as_slice() {
        [] => Err(CliError::NoEntries),
        [only] => Ok(only),
        _ => Err(CliError::Validation {
            field: "entry".into(),
            reason: "several entries are configured; pass --entry <ID>".into(),
        }),
    }
}
