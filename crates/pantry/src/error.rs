//! CLI error types with miette diagnostics.
//!
//! Maps core and config errors into user-facing errors with help text.

use miette::Diagnostic;
use thiserror::Error;

use pantry_config::ConfigError;
use pantry_core::{AbortReason, CoreError};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
#[allow(unused_assignments)]
pub enum CliError {
    // ── Polling ──────────────────────────────────────────────────────
    #[error("Could not load pantry data: {message}")]
    #[diagnostic(
        code(pantry::update_failed),
        help(
            "Check that the pantry add-on is running.\n\
             The stored address may be stale; re-run `pantry setup` after removing the entry."
        )
    )]
    UpdateFailed { message: String },

    #[error("Setup of entry {entry_id} failed")]
    #[diagnostic(code(pantry::setup_failed), help("{message}"))]
    SetupFailed { entry_id: String, message: String },

    // ── Setup flow ───────────────────────────────────────────────────
    #[error("Setup aborted: {reason}")]
    #[diagnostic(code(pantry::aborted), help("{description}"))]
    Aborted {
        reason: AbortReason,
        description: &'static str,
    },

    // ── Entries ──────────────────────────────────────────────────────
    #[error("No config entries")]
    #[diagnostic(code(pantry::no_entries), help("Create one with: pantry setup"))]
    NoEntries,

    #[error("Entry '{identifier}' not found")]
    #[diagnostic(
        code(pantry::not_found),
        help("Run: pantry entries list to see stored entries")
    )]
    NotFound { identifier: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(pantry::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("{source}")]
    #[diagnostic(
        code(pantry::config),
        help("Check the config file at {path}")
    )]
    Config {
        #[source]
        source: ConfigError,
        path: String,
    },

    #[error("{0}")]
    #[diagnostic(code(pantry::internal))]
    Internal(String),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("JSON output failed: {0}")]
    #[diagnostic(code(pantry::json))]
    Json(#[from] serde_json::Error),

    #[error("YAML output failed: {0}")]
    #[diagnostic(code(pantry::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::UpdateFailed { .. } | Self::SetupFailed { .. } => exit_code::CONNECTION,
            Self::Aborted { reason, .. } => match reason {
                AbortReason::SingleInstanceAllowed => exit_code::CONFLICT,
                AbortReason::AddonNotFound => exit_code::NOT_FOUND,
                AbortReason::SupervisorApiUnavailable => exit_code::CONNECTION,
                AbortReason::NotHassio
                | AbortReason::AddonNotRunning
                | AbortReason::AddonInfoFailed => exit_code::GENERAL,
            },
            Self::NoEntries | Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Wrap a config error, remembering which file it concerns.
    pub fn config(source: ConfigError, path: &std::path::Path) -> Self {
        match source {
            ConfigError::NoEntry { entry_id } => Self::NotFound {
                identifier: entry_id,
            },
            ConfigError::Validation { field, reason } if field == "entry id" => {
                Self::Validation { field, reason }
            }
            source => Self::Config {
                source,
                path: path.display().to_string(),
            },
        }
    }
}

impl From<AbortReason> for CliError {
    fn from(reason: AbortReason) -> Self {
        Self::Aborted {
            reason,
            description: reason.description(),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::UpdateFailed { message } => CliError::UpdateFailed { message },
            CoreError::SetupFailed { entry_id, message } => {
                CliError::SetupFailed { entry_id, message }
            }
            CoreError::Config { message } => CliError::Validation {
                field: "configuration".into(),
                reason: message,
            },
            other @ (CoreError::AlreadyLoaded { .. } | CoreError::NotLoaded { .. }) => {
                CliError::Internal(other.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abort_exit_codes() {
        assert_eq!(
            CliError::from(AbortReason::SingleInstanceAllowed).exit_code(),
            exit_code::CONFLICT
        );
        assert_eq!(
            CliError::from(AbortReason::AddonNotFound).exit_code(),
            exit_code::NOT_FOUND
        );
        assert_eq!(
            CliError::from(AbortReason::AddonNotRunning).exit_code(),
            exit_code::GENERAL
        );
    }

    #[test]
    fn missing_entry_is_not_found() {
        let err = CliError::config(
            ConfigError::NoEntry {
                entry_id: "abc".into(),
            },
            std::path::Path::new("/tmp/config.toml"),
        );
        assert!(matches!(err, CliError::NotFound { ref identifier } if identifier == "abc"));
        assert_eq!(err.exit_code(), exit_code::NOT_FOUND);
    }
}
