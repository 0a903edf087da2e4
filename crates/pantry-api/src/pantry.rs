// Pantry endpoint client
//
// One GET per call against the add-on's inventory endpoint. The same client
// serves both addressing variants: a direct add-on URL
// (`http://<addon-ip>:8099/api/pantry`) and the supervisor proxy path
// (`http://supervisor/addons/<slug>/api/pantry`, bearer token required).

use reqwest::StatusCode;
use serde_json::Value;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::models::{InventoryRecord, json_kind};
use crate::transport::{TransportConfig, map_send_error};

/// Port the pantry add-on listens on inside the supervisor network.
pub const ADDON_PORT: u16 = 8099;

/// Path of the inventory endpoint, relative to the add-on root.
pub const PANTRY_PATH: &str = "/api/pantry";

/// Compose a direct add-on URL: `http://{host}:{port}{api_path}`.
pub fn addon_url(host: &str, port: u16, api_path: &str) -> Result<Url, Error> {
    let path = api_path.trim_start_matches('/');
    Ok(Url::parse(&format!("http://{host}:{port}/{path}"))?)
}

/// Compose the supervisor proxy URL: `{supervisor}/addons/{slug}{api_path}`.
pub fn proxy_url(supervisor: &Url, slug: &str, api_path: &str) -> Result<Url, Error> {
    let base = supervisor.as_str().trim_end_matches('/');
    let path = api_path.trim_start_matches('/');
    Ok(Url::parse(&format!("{base}/addons/{slug}/{path}"))?)
}

/// HTTP client for the add-on's `GET /api/pantry` endpoint.
#[derive(Debug, Clone)]
pub struct PantryClient {
    http: reqwest::Client,
    endpoint: Url,
    timeout_secs: u64,
}

impl PantryClient {
    /// Create a client for `endpoint` from a `TransportConfig`.
    pub fn new(endpoint: Url, transport: &TransportConfig) -> Result<Self, Error> {
        Ok(Self {
            http: transport.build_client()?,
            endpoint,
            timeout_secs: transport.timeout_secs(),
        })
    }

    /// The full URL polled by this client.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Fetch the current inventory.
    ///
    /// Succeeds only on `200 OK` with a JSON array body. Elements of the
    /// array are parsed leniently (see [`InventoryRecord::from_value`]).
    pub async fn fetch_inventory(&self) -> Result<Vec<InventoryRecord>, Error> {
        debug!("GET {}", self.endpoint);

        let resp = self
            .http
            .get(self.endpoint.clone())
            .send()
            .await
            .map_err(|e| map_send_error(e, self.timeout_secs))?;

        let status = resp.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Authentication {
                message: format!("HTTP {}: {}", status.as_u16(), body.trim()),
            });
        }

        if status != StatusCode::OK {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        parse_inventory(&body)
    }
}

/// Parse a pantry response body. Anything but a JSON array is an error.
pub(crate) fn parse_inventory(body: &str) -> Result<Vec<InventoryRecord>, Error> {
    let value: Value = serde_json::from_str(body).map_err(|e| {
        let preview: String = body.chars().take(200).collect();
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body: body.to_owned(),
        }
    })?;

    match value {
        Value::Array(items) => {
            trace!(count = items.len(), "parsed pantry records");
            Ok(items.into_iter().map(InventoryRecord::from_value).collect())
        }
        other => Err(Error::UnexpectedShape {
            expected: "array",
            found: json_kind(&other),
        }),
    }
}
