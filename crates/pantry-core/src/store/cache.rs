// ── Snapshot cache ──
//
// The coordinator is the only writer. Each successful poll replaces the
// whole snapshot with one `watch` send, so readers observe either the old
// or the new `Arc<Snapshot>`, never a mix. Failed polls only touch the
// status channel.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;

use pantry_api::{InventoryRecord, RecordId};

/// One successful poll result.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub records: Vec<InventoryRecord>,
    pub fetched_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn new(records: Vec<InventoryRecord>) -> Self {
        Self {
            records,
            fetched_at: Utc::now(),
        }
    }

    /// Linear scan for the first record with `id`.
    pub fn find(&self, id: &RecordId) -> Option<&InventoryRecord> {
        self.records.iter().find(|r| r.id.as_ref() == Some(id))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Outcome of the most recent poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UpdateStatus {
    /// No poll has completed yet.
    Pending,
    Ok { at: DateTime<Utc> },
    Failed { message: String, at: DateTime<Utc> },
}

impl UpdateStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok { .. })
    }

    /// Failure message of the most recent poll, if it failed.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed { message, .. } => Some(message),
            Self::Pending | Self::Ok { .. } => None,
        }
    }
}

/// Writer side, owned by the coordinator.
pub(crate) struct FetchCache {
    data: watch::Sender<Option<Arc<Snapshot>>>,
    status: watch::Sender<UpdateStatus>,
}

impl FetchCache {
    pub(crate) fn new() -> Self {
        let (data, _) = watch::channel(None);
        let (status, _) = watch::channel(UpdateStatus::Pending);
        Self { data, status }
    }

    /// Replace the snapshot and mark the poll successful.
    pub(crate) fn publish(&self, records: Vec<InventoryRecord>) -> Arc<Snapshot> {
        let snapshot = Arc::new(Snapshot::new(records));
        let at = snapshot.fetched_at;
        // `send_replace` updates unconditionally, even with zero receivers.
        self.data.send_replace(Some(Arc::clone(&snapshot)));
        self.status.send_replace(UpdateStatus::Ok { at });
        snapshot
    }

    /// Record a failed poll. The snapshot is left as it was.
    pub(crate) fn mark_failed(&self, message: String) {
        self.status.send_replace(UpdateStatus::Failed {
            message,
            at: Utc::now(),
        });
    }

    pub(crate) fn current(&self) -> Option<Arc<Snapshot>> {
        self.data.borrow().clone()
    }

    pub(crate) fn status(&self) -> UpdateStatus {
        self.status.borrow().clone()
    }

    pub(crate) fn handle(&self) -> CacheHandle {
        CacheHandle {
            data: self.data.subscribe(),
            status: self.status.subscribe(),
        }
    }
}

/// Read-only view of a cache, handed to entities and UI consumers.
#[derive(Debug, Clone)]
pub struct CacheHandle {
    data: watch::Receiver<Option<Arc<Snapshot>>>,
    status: watch::Receiver<UpdateStatus>,
}

impl CacheHandle {
    /// Latest snapshot (cheap `Arc` clone).
    pub fn current(&self) -> Option<Arc<Snapshot>> {
        self.data.borrow().clone()
    }

    pub fn status(&self) -> UpdateStatus {
        self.status.borrow().clone()
    }

    /// `true` while the most recent poll succeeded.
    pub fn last_update_success(&self) -> bool {
        self.status.borrow().is_ok()
    }

    pub fn last_error(&self) -> Option<String> {
        self.status.borrow().error().map(str::to_owned)
    }

    /// Wait for the next poll outcome (success or failure).
    ///
    /// Returns `false` once the owning coordinator is gone.
    pub async fn changed(&mut self) -> bool {
        self.status.changed().await.is_ok()
    }
}
