// ── Setup flow ──
//
// The one-step wizard that creates a config entry. It enforces a single
// instance, asks for confirmation, then resolves the add-on's address with
// the configured strategy. Every problem is an `AbortReason` shown to the
// user; nothing here is an error for the host.

use std::collections::BTreeMap;

use serde::Serialize;
use strum::{AsRefStr, Display, EnumString};
use tracing::{debug, info, warn};

use pantry_api::{AddonInfo, SupervisorClient};

use crate::config::AddonSettings;
use crate::model::{ConfigEntry, EntryData, ResolveStrategy};

/// Why the wizard stopped without creating an entry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, AsRefStr, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AbortReason {
    SingleInstanceAllowed,
    NotHassio,
    AddonNotFound,
    AddonNotRunning,
    AddonInfoFailed,
    SupervisorApiUnavailable,
}

impl AbortReason {
    /// Explanation suitable for the user.
    pub fn description(self) -> &'static str {
        match self {
            Self::SingleInstanceAllowed => "The pantry integration is already configured.",
            Self::NotHassio => "The supervisor API is not available; not running supervised.",
            Self::AddonNotFound => "The pantry add-on is not installed.",
            Self::AddonNotRunning => "The pantry add-on is installed but not started.",
            Self::AddonInfoFailed => "Could not read the pantry add-on's details.",
            Self::SupervisorApiUnavailable => "The supervisor API could not be reached.",
        }
    }
}

/// Outcome of one wizard step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowResult {
    /// Ask the user to confirm before anything is looked up.
    ShowForm {
        step_id: &'static str,
        description_placeholders: BTreeMap<&'static str, String>,
    },
    /// Persist a new entry with this data.
    CreateEntry { title: String, data: EntryData },
    Abort(AbortReason),
}

/// The setup wizard.
pub struct ConfigFlow {
    addon: AddonSettings,
    supervisor: Option<SupervisorClient>,
    strategy: ResolveStrategy,
}

impl ConfigFlow {
    /// `supervisor` is `None` when not running supervised.
    pub fn new(
        addon: AddonSettings,
        supervisor: Option<SupervisorClient>,
        strategy: ResolveStrategy,
    ) -> Self {
        Self {
            addon,
            supervisor,
            strategy,
        }
    }

    pub fn strategy(&self) -> ResolveStrategy {
        self.strategy
    }

    /// The user step.
    ///
    /// `existing` are the entries already configured; any entry for this
    /// domain aborts immediately. Without `confirmed` the confirmation form
    /// is returned.
    pub async fn step_user(&self, existing: &[ConfigEntry], confirmed: bool) -> FlowResult {
        if existing.iter().any(|e| e.domain == crate::DOMAIN) {
            debug!("pantry already configured");
            return FlowResult::Abort(AbortReason::SingleInstanceAllowed);
        }

        if !confirmed {
            return FlowResult::ShowForm {
                step_id: "user",
                description_placeholders: BTreeMap::from([("addon_slug", self.addon.slug.clone())]),
            };
        }

        match self.resolve().await {
            Ok(data) => {
                info!(strategy = %self.strategy, url = ?data.base_url, "pantry add-on resolved");
                FlowResult::CreateEntry {
                    title: crate::ENTRY_TITLE.to_owned(),
                    data,
                }
            }
            Err(reason) => {
                warn!(%reason, "pantry setup aborted");
                FlowResult::Abort(reason)
            }
        }
    }

    /// Determine the entry data for the configured strategy.
    pub async fn resolve(&self) -> Result<EntryData, AbortReason> {
        let base_url = match self.strategy {
            ResolveStrategy::InternalHostname => None,
            ResolveStrategy::SupervisorProxy => {
                self.running_addon().await?;
                None
            }
            ResolveStrategy::Discover => {
                let info = self.running_addon().await?;
                let host = info.reachable_host().ok_or(AbortReason::AddonInfoFailed)?;
                let url = self
                    .addon
                    .url_for_host(host)
                    .map_err(|_| AbortReason::AddonInfoFailed)?;
                Some(url)
            }
        };

        Ok(EntryData {
            strategy: self.strategy,
            base_url,
        })
    }

    /// Look the add-on up and require it to be started.
    async fn running_addon(&self) -> Result<AddonInfo, AbortReason> {
        let supervisor = self.supervisor.as_ref().ok_or(AbortReason::NotHassio)?;

        let info = supervisor
            .addon_info(&self.addon.slug)
            .await
            .map_err(|e| {
                warn!(error = %e, slug = %self.addon.slug, "add-on lookup failed");
                classify_lookup_error(&e)
            })?;

        if !info.is_started() {
            debug!(state = ?info.state, "add-on not started");
            return Err(AbortReason::AddonNotRunning);
        }
        Ok(info)
    }
}

fn classify_lookup_error(err: &pantry_api::Error) -> AbortReason {
    if err.is_not_found() {
        AbortReason::AddonNotFound
    } else if err.is_unreachable() || matches!(err, pantry_api::Error::Authentication { .. }) {
        AbortReason::SupervisorApiUnavailable
    } else {
        AbortReason::AddonInfoFailed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abort_reason_strings() {
        assert_eq!(
            AbortReason::SingleInstanceAllowed.to_string(),
            "single_instance_allowed"
        );
        assert_eq!(AbortReason::NotHassio.as_ref(), "not_hassio");
        assert_eq!(
            AbortReason::SupervisorApiUnavailable.to_string(),
            "supervisor_api_unavailable"
        );
    }

    #[test]
    fn lookup_error_classification() {
        assert_eq!(
            classify_lookup_error(&pantry_api::Error::AddonNotFound { slug: "x".into() }),
            AbortReason::AddonNotFound
        );
        assert_eq!(
            classify_lookup_error(&pantry_api::Error::Timeout { timeout_secs: 10 }),
            AbortReason::SupervisorApiUnavailable
        );
        assert_eq!(
            classify_lookup_error(&pantry_api::Error::Supervisor {
                message: "boom".into()
            }),
            AbortReason::AddonInfoFailed
        );
    }

    #[tokio::test]
    async fn existing_entry_aborts_before_anything_else() {
        let flow = ConfigFlow::new(AddonSettings::default(), None, ResolveStrategy::Discover);
        let existing = [ConfigEntry::new(crate::ENTRY_TITLE, EntryData::default())];

        assert_eq!(
            flow.step_user(&existing, true).await,
            FlowResult::Abort(AbortReason::SingleInstanceAllowed)
        );
        assert_eq!(
            flow.step_user(&existing, false).await,
            FlowResult::Abort(AbortReason::SingleInstanceAllowed)
        );
    }

    #[tokio::test]
    async fn unconfirmed_shows_form() {
        let flow = ConfigFlow::new(AddonSettings::default(), None, ResolveStrategy::Discover);
        let FlowResult::ShowForm {
            step_id,
            description_placeholders,
        } = flow.step_user(&[], false).await
        else {
            panic!("expected form");
        };
        assert_eq!(step_id, "user");
        assert_eq!(
            description_placeholders.get("addon_slug").map(String::as_str),
            Some("bogyikonya")
        );
    }

    #[tokio::test]
    async fn discover_without_supervisor_is_not_hassio() {
        let flow = ConfigFlow::new(AddonSettings::default(), None, ResolveStrategy::Discover);
        assert_eq!(
            flow.step_user(&[], true).await,
            FlowResult::Abort(AbortReason::NotHassio)
        );
    }

    #[tokio::test]
    async fn internal_hostname_needs_no_lookup() {
        let flow = ConfigFlow::new(
            AddonSettings::default(),
            None,
            ResolveStrategy::InternalHostname,
        );
        assert_eq!(
            flow.step_user(&[], true).await,
            FlowResult::CreateEntry {
                title: crate::ENTRY_TITLE.into(),
                data: EntryData {
                    strategy: ResolveStrategy::InternalHostname,
                    base_url: None,
                },
            }
        );
    }
}
