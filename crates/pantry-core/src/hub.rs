// ── Entry lifecycle ──
//
// The hub owns everything a loaded config entry needs at runtime: its
// coordinator (and background schedule) and the sensors built from the
// first snapshot. Entries are keyed by `entry_id`; there is no global
// registry, each session creates its own hub.

use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::PantryConfig;
use crate::coordinator::Coordinator;
use crate::error::CoreError;
use crate::model::{ConfigEntry, PantrySensor};
use crate::reconcile::build_entities;
use crate::store::Snapshot;

struct LoadedEntry {
    entry: ConfigEntry,
    coordinator: Coordinator,
    entities: Vec<PantrySensor>,
}

/// Session object holding every loaded entry.
pub struct Hub {
    config: PantryConfig,
    entries: DashMap<Uuid, LoadedEntry>,
}

impl Hub {
    pub fn new(config: PantryConfig) -> Self {
        Self {
            config,
            entries: DashMap::new(),
        }
    }

    pub fn config(&self) -> &PantryConfig {
        &self.config
    }

    /// Load an entry: fetch once, build its sensors, start polling.
    ///
    /// A failed first fetch fails the setup and leaves nothing registered.
    pub async fn setup_entry(&self, entry: &ConfigEntry) -> Result<Vec<PantrySensor>, CoreError> {
        let id = entry.entry_id;
        if self.entries.contains_key(&id) {
            return Err(CoreError::AlreadyLoaded {
                entry_id: id.to_string(),
            });
        }

        let coordinator_config = self.config.coordinator_config(entry)?;
        let coordinator = Coordinator::from_config(entry.title.clone(), &coordinator_config)?;
        debug!(entry_id = %id, url = %coordinator_config.endpoint.url(), "setting up pantry entry");

        coordinator
            .first_refresh()
            .await
            .map_err(|e| CoreError::SetupFailed {
                entry_id: id.to_string(),
                message: e.to_string(),
            })?;

        // Register first, then attach the sensors built from the first snapshot.
        let entities = match self.entries.entry(id) {
            Entry::Occupied(_) => {
                return Err(CoreError::AlreadyLoaded {
                    entry_id: id.to_string(),
                });
            }
            Entry::Vacant(slot) => {
                let mut loaded = slot.insert(LoadedEntry {
                    entry: entry.clone(),
                    coordinator: coordinator.clone(),
                    entities: Vec::new(),
                });
                loaded.entities = build_entities(&coordinator.handle());
                loaded.entities.clone()
            }
        };

        coordinator.start().await;
        info!(entry_id = %id, sensors = entities.len(), "pantry entry loaded");
        Ok(entities)
    }

    /// Stop polling and forget the entry. `false` if it was not loaded.
    pub async fn unload_entry(&self, entry_id: &Uuid) -> bool {
        let Some((_, loaded)) = self.entries.remove(entry_id) else {
            debug!(entry_id = %entry_id, "unload of unknown entry");
            return false;
        };

        loaded.coordinator.shutdown().await;
        info!(
            entry_id = %entry_id,
            sensors = loaded.entities.len(),
            "pantry entry unloaded"
        );
        true
    }

    /// Poll an entry's add-on right now, outside the schedule.
    pub async fn refresh_entry(&self, entry_id: &Uuid) -> Result<Arc<Snapshot>, CoreError> {
        let coordinator = self
            .coordinator(entry_id)
            .ok_or_else(|| CoreError::NotLoaded {
                entry_id: entry_id.to_string(),
            })?;
        coordinator.refresh().await
    }

    pub fn is_loaded(&self, entry_id: &Uuid) -> bool {
        self.entries.contains_key(entry_id)
    }

    pub fn entities(&self, entry_id: &Uuid) -> Option<Vec<PantrySensor>> {
        self.entries.get(entry_id).map(|e| e.entities.clone())
    }

    pub fn coordinator(&self, entry_id: &Uuid) -> Option<Coordinator> {
        self.entries.get(entry_id).map(|e| e.coordinator.clone())
    }

    pub fn loaded_entries(&self) -> Vec<ConfigEntry> {
        self.entries.iter().map(|e| e.entry.clone()).collect()
    }

    /// Unload every entry.
    pub async fn shutdown(&self) {
        let ids: Vec<Uuid> = self.entries.iter().map(|e| *e.key()).collect();
        for id in ids {
            if !self.unload_entry(&id).await {
                warn!(entry_id = %id, "entry vanished during shutdown");
            }
        }
    }
}
