// ── Config entries ──
//
// One persisted record per configured integration instance. The setup
// flow produces the `EntryData`; storage is the host adapter's business.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use url::Url;
use uuid::Uuid;

/// How the add-on's address was (or will be) determined.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ResolveStrategy {
    /// Ask the supervisor for the add-on's IP and store the resulting URL.
    #[default]
    Discover,
    /// Use the add-on's fixed internal hostname; nothing is stored.
    InternalHostname,
    /// Poll through the supervisor's add-on proxy with the supervisor token.
    SupervisorProxy,
}

/// Data persisted with a config entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryData {
    #[serde(default)]
    pub strategy: ResolveStrategy,
    /// Discovered base URL. Absent means the strategy's fixed address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<Url>,
}

/// A configured integration instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigEntry {
    pub entry_id: Uuid,
    pub domain: String,
    pub title: String,
    #[serde(default)]
    pub data: EntryData,
    pub created_at: DateTime<Utc>,
}

impl ConfigEntry {
    pub fn new(title: impl Into<String>, data: EntryData) -> Self {
        Self {
            entry_id: Uuid::new_v4(),
            domain: crate::DOMAIN.to_owned(),
            title: title.into(),
            data,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn strategy_string_forms() {
        assert_eq!(ResolveStrategy::SupervisorProxy.to_string(), "supervisor_proxy");
        assert_eq!(
            ResolveStrategy::from_str("internal_hostname").unwrap(),
            ResolveStrategy::InternalHostname
        );
        assert!(ResolveStrategy::from_str("dns").is_err());
    }

    #[test]
    fn new_entry_uses_domain() {
        let entry = ConfigEntry::new("x", EntryData::default());
        assert_eq!(entry.domain, crate::DOMAIN);
        assert_eq!(entry.data.strategy, ResolveStrategy::Discover);
    }
}
