// ── Core error types ──
//
// User-facing errors from pantry-core. Every transport-level failure of a
// poll collapses into `UpdateFailed` with a readable message; callers
// never match on HTTP status codes or JSON errors directly.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Polling ──────────────────────────────────────────────────────
    #[error("Update failed: {message}")]
    UpdateFailed { message: String },

    // ── Lifecycle ────────────────────────────────────────────────────
    #[error("Setup of entry {entry_id} failed: {message}")]
    SetupFailed { entry_id: String, message: String },

    #[error("Entry {entry_id} is already loaded")]
    AlreadyLoaded { entry_id: String },

    #[error("Entry {entry_id} is not loaded")]
    NotLoaded { entry_id: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    pub(crate) fn update_failed(message: impl Into<String>) -> Self {
        Self::UpdateFailed {
            message: message.into(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<pantry_api::Error> for CoreError {
    fn from(err: pantry_api::Error) -> Self {
        use pantry_api::Error as Api;

        match err {
            Api::Status { status, body } => Self::update_failed(format!(
                "pantry add-on returned HTTP {status}: {}",
                body.trim()
            )),
            Api::Deserialization { message, body: _ } => {
                Self::update_failed(format!("invalid JSON from pantry add-on: {message}"))
            }
            Api::UnexpectedShape { expected, found } => Self::update_failed(format!(
                "pantry add-on returned a JSON {found}, expected {expected}"
            )),
            Api::Timeout { timeout_secs } => Self::update_failed(format!(
                "pantry add-on did not answer within {timeout_secs}s"
            )),
            Api::Transport(e) => {
                Self::update_failed(format!("error communicating with pantry add-on: {e}"))
            }
            Api::Authentication { message } => {
                Self::update_failed(format!("pantry add-on rejected the request: {message}"))
            }
            Api::Supervisor { message } => {
                Self::update_failed(format!("add-on API error (supervisor): {message}"))
            }
            Api::AddonNotFound { slug } => {
                Self::update_failed(format!("add-on '{slug}' is not installed"))
            }
            Api::InvalidUrl(e) => Self::Config {
                message: format!("Invalid URL: {e}"),
            },
            Api::Client(message) => Self::Config { message },
        }
    }
}
