// ── Runtime configuration ──
//
// These types describe *where* the add-on lives and *how often* to poll it.
// They never touch disk: `pantry-config` (or any other host adapter) builds
// a `PantryConfig` and hands it in.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use pantry_api::pantry::{ADDON_PORT, PANTRY_PATH, addon_url, proxy_url};
use pantry_api::supervisor::DEFAULT_SUPERVISOR_URL;
use pantry_api::{SupervisorClient, TransportConfig};

use crate::error::CoreError;
use crate::model::{ConfigEntry, ResolveStrategy};

/// Default poll interval: once an hour.
pub const DEFAULT_UPDATE_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Where the pantry add-on is expected to be found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddonSettings {
    /// Add-on slug as known to the supervisor.
    pub slug: String,
    /// Fixed internal hostname of the add-on container.
    pub hostname: String,
    pub port: u16,
    pub api_path: String,
}

impl Default for AddonSettings {
    fn default() -> Self {
        Self::for_slug(crate::DOMAIN)
    }
}

impl AddonSettings {
    /// Settings for a locally installed add-on. The supervisor names such
    /// containers `local-<slug>` with underscores turned into dashes.
    pub fn for_slug(slug: &str) -> Self {
        Self {
            slug: slug.to_owned(),
            hostname: format!("local-{}", slug.replace('_', "-")),
            port: ADDON_PORT,
            api_path: PANTRY_PATH.to_owned(),
        }
    }

    /// `http://<hostname>:<port><api_path>`
    pub fn internal_url(&self) -> Result<Url, CoreError> {
        Ok(addon_url(&self.hostname, self.port, &self.api_path)?)
    }

    /// `http://<host>:<port><api_path>` for a discovered host.
    pub fn url_for_host(&self, host: &str) -> Result<Url, CoreError> {
        Ok(addon_url(host, self.port, &self.api_path)?)
    }
}

/// Access to the supervisor API. Absent when not running supervised.
#[derive(Debug, Clone)]
pub struct SupervisorSettings {
    pub url: Url,
    pub token: SecretString,
}

impl SupervisorSettings {
    pub fn new(token: SecretString) -> Result<Self, CoreError> {
        let url = Url::parse(DEFAULT_SUPERVISOR_URL).map_err(|e| CoreError::Config {
            message: format!("invalid supervisor URL: {e}"),
        })?;
        Ok(Self { url, token })
    }

    pub fn client(&self, timeout: Duration) -> Result<SupervisorClient, CoreError> {
        let transport = TransportConfig::default()
            .with_timeout(timeout)
            .with_bearer_token(self.token.clone());
        Ok(SupervisorClient::new(self.url.clone(), &transport)?)
    }
}

/// The URL actually polled, and how to authenticate against it.
#[derive(Debug, Clone)]
pub enum Endpoint {
    /// Talk to the add-on directly; no authentication.
    Direct(Url),
    /// Go through the supervisor's add-on proxy with its token.
    SupervisorProxy { url: Url, token: SecretString },
}

impl Endpoint {
    pub fn url(&self) -> &Url {
        match self {
            Self::Direct(url) | Self::SupervisorProxy { url, .. } => url,
        }
    }

    pub fn transport(&self, timeout: Duration) -> TransportConfig {
        let transport = TransportConfig::default().with_timeout(timeout);
        match self {
            Self::Direct(_) => transport,
            Self::SupervisorProxy { token, .. } => transport.with_bearer_token(token.clone()),
        }
    }
}

/// Everything a coordinator needs for one config entry.
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    pub endpoint: Endpoint,
    pub timeout: Duration,
    /// Poll interval. `Duration::ZERO` disables scheduled polling.
    pub update_interval: Duration,
}

/// Session-wide settings shared by the setup flow and the hub.
#[derive(Debug, Clone)]
pub struct PantryConfig {
    pub addon: AddonSettings,
    pub supervisor: Option<SupervisorSettings>,
    pub timeout: Duration,
    pub update_interval: Duration,
}

impl Default for PantryConfig {
    fn default() -> Self {
        Self {
            addon: AddonSettings::default(),
            supervisor: None,
            timeout: DEFAULT_TIMEOUT,
            update_interval: DEFAULT_UPDATE_INTERVAL,
        }
    }
}

impl PantryConfig {
    /// Supervisor client, if the session runs supervised.
    pub fn supervisor_client(&self) -> Result<Option<SupervisorClient>, CoreError> {
        self.supervisor
            .as_ref()
            .map(|s| s.client(self.timeout))
            .transpose()
    }

    /// Resolve the endpoint an entry should be polled at.
    ///
    /// A stored `base_url` always wins. Without one, the entry's strategy
    /// decides between the fixed internal hostname and the supervisor proxy.
    pub fn endpoint_for(&self, entry: &ConfigEntry) -> Result<Endpoint, CoreError> {
        if let Some(ref url) = entry.data.base_url {
            return Ok(Endpoint::Direct(url.clone()));
        }

        match entry.data.strategy {
            ResolveStrategy::Discover | ResolveStrategy::InternalHostname => {
                Ok(Endpoint::Direct(self.addon.internal_url()?))
            }
            ResolveStrategy::SupervisorProxy => {
                let supervisor = self.supervisor.as_ref().ok_or_else(|| CoreError::Config {
                    message: "supervisor proxy requires a supervisor token".into(),
                })?;
                let url = proxy_url(&supervisor.url, &self.addon.slug, &self.addon.api_path)?;
                Ok(Endpoint::SupervisorProxy {
                    url,
                    token: supervisor.token.clone(),
                })
            }
        }
    }

    pub fn coordinator_config(&self, entry: &ConfigEntry) -> Result<CoordinatorConfig, CoreError> {
        Ok(CoordinatorConfig {
            endpoint: self.endpoint_for(entry)?,
            timeout: self.timeout,
            update_interval: self.update_interval,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::EntryData;

    fn entry(strategy: ResolveStrategy, base_url: Option<&str>) -> ConfigEntry {
        ConfigEntry::new(
            crate::ENTRY_TITLE,
            EntryData {
                strategy,
                base_url: base_url.map(|u| Url::parse(u).unwrap()),
            },
        )
    }

    #[test]
    fn default_addon_settings() {
        let addon = AddonSettings::default();
        assert_eq!(addon.slug, "bogyikonya");
        assert_eq!(
            addon.internal_url().unwrap().as_str(),
            "http://local-bogyikonya:8099/api/pantry"
        );
    }

    #[test]
    fn stored_url_wins() {
        let cfg = PantryConfig::default();
        let ep = cfg
            .endpoint_for(&entry(
                ResolveStrategy::Discover,
                Some("http://172.30.33.2:8099/api/pantry"),
            ))
            .unwrap();
        assert!(matches!(ep, Endpoint::Direct(_)));
        assert_eq!(ep.url().as_str(), "http://172.30.33.2:8099/api/pantry");
    }

    #[test]
    fn internal_hostname_without_url() {
        let cfg = PantryConfig::default();
        let ep = cfg
            .endpoint_for(&entry(ResolveStrategy::InternalHostname, None))
            .unwrap();
        assert_eq!(ep.url().as_str(), "http://local-bogyikonya:8099/api/pantry");
    }

    #[test]
    fn proxy_needs_supervisor() {
        let cfg = PantryConfig::default();
        let err = cfg
            .endpoint_for(&entry(ResolveStrategy::SupervisorProxy, None))
            .unwrap_err();
        assert!(matches!(err, CoreError::Config { .. }));

        let cfg = PantryConfig {
            supervisor: Some(SupervisorSettings::new(SecretString::from("t")).unwrap()),
            ..PantryConfig::default()
        };
        let ep = cfg
            .endpoint_for(&entry(ResolveStrategy::SupervisorProxy, None))
            .unwrap();
        assert!(matches!(ep, Endpoint::SupervisorProxy { .. }));
        assert_eq!(
            ep.url().as_str(),
            "http://supervisor/addons/bogyikonya/api/pantry"
        );
    }
}
