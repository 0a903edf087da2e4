//! `GlobalOpts`-aware wrappers around `pantry_config`.

use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;

use pantry_config::Config;
use pantry_core::PantryConfig;

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;

/// A loaded config together with the file it came from.
pub struct LoadedConfig {
    pub config: Config,
    pub path: PathBuf,
}

/// `--config` / `PANTRY_CONFIG`, else the platform default.
pub fn config_file(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(pantry_config::config_path)
}

pub fn load(global: &GlobalOpts) -> Result<LoadedConfig, CliError> {
    let path = config_file(global);
    let config =
        pantry_config::load_config_from(&path).map_err(|e| CliError::config(e, &path))?;
    Ok(LoadedConfig { config, path })
}

/// Fill `--output` / `--color` from `[defaults]` when not given on the command line.
pub fn apply_defaults(global: &mut GlobalOpts) -> Result<(), CliError> {
    if global.output.is_some() && global.color.is_some() {
        return Ok(());
    }
    let loaded = load(global)?;
    let defaults = &loaded.config.defaults;

    if global.output.is_none() {
        global.output = Some(parse_default::<OutputFormat>("defaults.output", &defaults.output)?);
    }
    if global.color.is_none() {
        global.color = Some(parse_default::<ColorMode>("defaults.color", &defaults.color)?);
    }
    Ok(())
}

fn parse_default<T: ValueEnum>(field: &str, value: &str) -> Result<T, CliError> {
    T::from_str(value, true).map_err(|reason| CliError::Validation {
        field: field.into(),
        reason,
    })
}

impl LoadedConfig {
    pub fn save(&self) -> Result<(), CliError> {
        pantry_config::save_config_to(&self.config, &self.path)
            .map_err(|e| CliError::config(e, &self.path))
    }

    /// Runtime settings with CLI flag overrides applied.
    pub fn runtime(&self, global: &GlobalOpts) -> Result<PantryConfig, CliError> {
        let mut runtime = self
            .config
            .to_pantry_config()
            .map_err(|e| CliError::config(e, &self.path))?;
        if let Some(secs) = global.timeout {
            runtime.timeout = Duration::from_secs(secs);
        }
        Ok(runtime)
    }
}
