//! Persisted configuration for pantry tools.
//!
//! One TOML file holds the global defaults, supervisor access, the add-on
//! location and every stored config entry. Environment variables prefixed
//! `PANTRY_` override file values (`PANTRY_DEFAULTS__TIMEOUT=30`).
//! [`Config::to_pantry_config`] turns the file into the runtime settings
//! `pantry_core` works with.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use pantry_core::config::{DEFAULT_TIMEOUT, DEFAULT_UPDATE_INTERVAL};
use pantry_core::{AddonSettings, ConfigEntry, PantryConfig, SupervisorSettings};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no config entry with id '{entry_id}'")]
    NoEntry { entry_id: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub defaults: Defaults,

    #[serde(default)]
    pub supervisor: Supervisor,

    #[serde(default)]
    pub addon: Addon,

    /// Config entries created by `pantry setup`.
    #[serde(default)]
    pub entries: Vec<ConfigEntry>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Poll interval in seconds. `0` disables scheduled polling.
    #[serde(default = "default_update_interval")]
    pub update_interval: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
            update_interval: default_update_interval(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}
fn default_update_interval() -> u64 {
    DEFAULT_UPDATE_INTERVAL.as_secs()
}

/// Supervisor API access.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Supervisor {
    #[serde(default = "default_supervisor_url")]
    pub url: String,

    /// Environment variable holding the supervisor token.
    #[serde(default = "default_token_env")]
    pub token_env: String,

    /// Token in plaintext (prefer `token_env`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Default for Supervisor {
    fn default() -> Self {
        Self {
            url: default_supervisor_url(),
            token_env: default_token_env(),
            token: None,
        }
    }
}

fn default_supervisor_url() -> String {
    pantry_api::supervisor::DEFAULT_SUPERVISOR_URL.into()
}
fn default_token_env() -> String {
    pantry_api::supervisor::SUPERVISOR_TOKEN_ENV.into()
}

/// Location of the pantry add-on.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Addon {
    #[serde(default = "default_slug")]
    pub slug: String,

    /// Internal hostname. Derived from the slug when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_api_path")]
    pub api_path: String,
}

impl Default for Addon {
    fn default() -> Self {
        Self {
            slug: default_slug(),
            hostname: None,
            port: default_port(),
            api_path: default_api_path(),
        }
    }
}

fn default_slug() -> String {
    pantry_core::DOMAIN.into()
}
fn default_port() -> u16 {
    pantry_api::pantry::ADDON_PORT
}
fn default_api_path() -> String {
    pantry_api::pantry::PANTRY_PATH.into()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "bogyikonya", "pantry").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("pantry");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the default file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from `path` + environment. A missing file yields the defaults.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("PANTRY_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    debug!(path = %path.display(), entries = cfg.entries.len(), "config saved");
    Ok(())
}

// ── Entries ─────────────────────────────────────────────────────────

impl Config {
    pub fn entry(&self, entry_id: &Uuid) -> Option<&ConfigEntry> {
        self.entries.iter().find(|e| &e.entry_id == entry_id)
    }

    /// Find an entry by full id or unambiguous id prefix.
    pub fn find_entry(&self, id: &str) -> Result<&ConfigEntry, ConfigError> {
        let mut matches = self
            .entries
            .iter()
            .filter(|e| e.entry_id.to_string().starts_with(id));
        match (matches.next(), matches.next()) {
            (Some(entry), None) if !id.is_empty() => Ok(entry),
            (Some(_), Some(_)) => Err(ConfigError::Validation {
                field: "entry id".into(),
                reason: format!("'{id}' matches more than one entry"),
            }),
            _ => Err(ConfigError::NoEntry {
                entry_id: id.into(),
            }),
        }
    }

    pub fn add_entry(&mut self, entry: ConfigEntry) {
        self.entries.push(entry);
    }

    pub fn remove_entry(&mut self, entry_id: &Uuid) -> Result<ConfigEntry, ConfigError> {
        let idx = self
            .entries
            .iter()
            .position(|e| &e.entry_id == entry_id)
            .ok_or_else(|| ConfigError::NoEntry {
                entry_id: entry_id.to_string(),
            })?;
        Ok(self.entries.remove(idx))
    }
}

// ── Runtime translation ─────────────────────────────────────────────

/// Resolve the supervisor token: the `token_env` variable first, then the
/// plaintext `token`. `None` means "not running supervised".
pub fn resolve_supervisor_token(supervisor: &Supervisor) -> Option<SecretString> {
    if let Ok(val) = std::env::var(&supervisor.token_env) {
        if !val.trim().is_empty() {
            return Some(SecretString::from(val));
        }
    }

    supervisor
        .token
        .as_ref()
        .filter(|t| !t.trim().is_empty())
        .map(|t| SecretString::from(t.clone()))
}

impl Addon {
    pub fn to_settings(&self) -> Result<AddonSettings, ConfigError> {
        if self.slug.trim().is_empty() {
            return Err(ConfigError::Validation {
                field: "addon.slug".into(),
                reason: "must not be empty".into(),
            });
        }
        if self.port == 0 {
            return Err(ConfigError::Validation {
                field: "addon.port".into(),
                reason: "must not be 0".into(),
            });
        }
        if !self.api_path.starts_with('/') {
            return Err(ConfigError::Validation {
                field: "addon.api_path".into(),
                reason: format!("must start with '/', got '{}'", self.api_path),
            });
        }

        let mut settings = AddonSettings::for_slug(&self.slug);
        if let Some(ref hostname) = self.hostname {
            settings.hostname.clone_from(hostname);
        }
        settings.port = self.port;
        settings.api_path.clone_from(&self.api_path);
        Ok(settings)
    }
}

impl Config {
    /// Build the runtime configuration. The supervisor section only counts
    /// when a token can be resolved.
    pub fn to_pantry_config(&self) -> Result<PantryConfig, ConfigError> {
        let supervisor = match resolve_supervisor_token(&self.supervisor) {
            Some(token) => {
                let url: url::Url =
                    self.supervisor
                        .url
                        .parse()
                        .map_err(|_| ConfigError::Validation {
                            field: "supervisor.url".into(),
                            reason: format!("invalid URL: {}", self.supervisor.url),
                        })?;
                Some(SupervisorSettings { url, token })
            }
            None => None,
        };

        Ok(PantryConfig {
            addon: self.addon.to_settings()?,
            supervisor,
            timeout: Duration::from_secs(self.defaults.timeout),
            update_interval: Duration::from_secs(self.defaults.update_interval),
        })
    }
}
