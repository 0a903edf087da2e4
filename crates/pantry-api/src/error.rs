use thiserror::Error;

/// Top-level error type for the `pantry-api` crate.
///
/// Covers every failure mode of both HTTP surfaces: the add-on's pantry
/// endpoint and the supervisor's add-on management API. `pantry-core`
/// folds these into a single "update failed" signal.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The supervisor rejected the token (HTTP 401/403).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// The HTTP client could not be built (bad header value, TLS setup).
    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    // ── Response ────────────────────────────────────────────────────
    /// Any response other than `200 OK`, with the body text attached.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// Well-formed JSON of the wrong shape (e.g. an object where an array
    /// was expected).
    #[error("Unexpected response shape: expected {expected}, got {found}")]
    UnexpectedShape {
        expected: &'static str,
        found: &'static str,
    },

    // ── Supervisor ──────────────────────────────────────────────────
    /// Error reported by the supervisor in its `{result, message}` envelope.
    #[error("Supervisor API error: {message}")]
    Supervisor { message: String },

    /// The supervisor does not know the requested add-on.
    #[error("Add-on '{slug}' not found")]
    AddonNotFound { slug: String },
}

impl Error {
    /// Returns `true` if the remote side could not be reached at all.
    pub fn is_unreachable(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_connect() || e.is_timeout(),
            Self::Timeout { .. } => true,
            _ => false,
        }
    }

    /// Returns `true` if this is a transient error worth retrying on the
    /// next scheduled poll.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Status { status, .. } => *status >= 500,
            other => other.is_unreachable(),
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::AddonNotFound { .. } | Self::Status { status: 404, .. }
        )
    }
}
