// Supervisor API client
//
// Only the add-on management surface is used: looking up an add-on's run
// state and network address at configuration time. Every call carries the
// supervisor token as a bearer header.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::{AddonInfo, SupervisorResponse};
use crate::transport::{TransportConfig, map_send_error};

/// Default supervisor root as seen from inside the host.
pub const DEFAULT_SUPERVISOR_URL: &str = "http://supervisor";

/// Environment variable the supervisor injects its token into.
pub const SUPERVISOR_TOKEN_ENV: &str = "SUPERVISOR_TOKEN";

/// HTTP client for the supervisor's add-on management API.
#[derive(Debug, Clone)]
pub struct SupervisorClient {
    http: reqwest::Client,
    base_url: Url,
    timeout_secs: u64,
}

impl SupervisorClient {
    /// Create a client from a `TransportConfig`. The config should carry
    /// the supervisor token; requests without it are rejected upstream.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        Ok(Self {
            http: transport.build_client()?,
            base_url,
            timeout_secs: transport.timeout_secs(),
        })
    }

    /// Build `{base}/{path}`.
    fn url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }

    /// Fetch runtime information about an add-on.
    ///
    /// `GET /addons/{slug}/info`
    pub async fn addon_info(&self, slug: &str) -> Result<AddonInfo, Error> {
        let url = self.url(&format!("addons/{slug}/info"))?;
        debug!(slug, "fetching add-on info");
        self.get(url, slug).await
    }

    async fn get<T: DeserializeOwned>(&self, url: Url, slug: &str) -> Result<T, Error> {
        debug!("GET {}", url);

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| map_send_error(e, self.timeout_secs))?;

        let status = resp.status();
        let body = resp.text().await.map_err(Error::Transport)?;

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(Error::Authentication {
                message: format!("supervisor rejected token (HTTP {})", status.as_u16()),
            });
        }

        if status == StatusCode::NOT_FOUND {
            return Err(Error::AddonNotFound { slug: slug.into() });
        }

        let envelope: SupervisorResponse<serde_json::Value> = match serde_json::from_str(&body) {
            Ok(env) => env,
            Err(_) if !status.is_success() => {
                return Err(Error::Status {
                    status: status.as_u16(),
                    body,
                });
            }
            Err(e) => {
                return Err(Error::Deserialization {
                    message: e.to_string(),
                    body,
                });
            }
        };

        if envelope.result != "ok" || !status.is_success() {
            let message = envelope.message.unwrap_or_else(|| {
                format!("result={} (HTTP {})", envelope.result, status.as_u16())
            });
            if looks_like_missing_addon(&message) {
                return Err(Error::AddonNotFound { slug: slug.into() });
            }
            return Err(Error::Supervisor { message });
        }

        let Some(data) = envelope.data else {
            return Err(Error::Deserialization {
                message: "supervisor response has no data".into(),
                body,
            });
        };

        serde_json::from_value(data).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }
}

/// The supervisor reports unknown add-ons as a generic error with a message.
fn looks_like_missing_addon(message: &str) -> bool {
    let msg = message.to_ascii_lowercase();
    msg.contains("not installed") || msg.contains("does not exist") || msg.contains("not found")
}
