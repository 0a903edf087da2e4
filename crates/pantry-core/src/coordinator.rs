// ── Polling coordinator ──
//
// Owns one data source and its fetch cache. `refresh()` performs exactly
// one fetch; the background task calls it on a fixed interval. Failed
// polls are logged, surfaced through `UpdateStatus`, and otherwise left to
// the next tick.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use pantry_api::PantryClient;

use crate::config::CoordinatorConfig;
use crate::error::CoreError;
use crate::source::DataSource;
use crate::store::{CacheHandle, FetchCache, Snapshot, UpdateStatus};

/// Poll-and-cache coordinator for one config entry.
///
/// Cheaply cloneable via `Arc<CoordinatorInner>`.
pub struct Coordinator<S: DataSource = PantryClient> {
    inner: Arc<CoordinatorInner<S>>,
}

impl<S: DataSource> Clone for Coordinator<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct CoordinatorInner<S> {
    name: String,
    source: S,
    update_interval: Duration,
    cache: FetchCache,
    /// Held for the duration of a fetch: at most one in flight.
    refresh_lock: Mutex<()>,
    cancel: CancellationToken,
    task: Mutex<Option<(JoinHandle<()>, CancellationToken)>>,
}

impl Coordinator<PantryClient> {
    /// Build a coordinator polling the configured endpoint over HTTP.
    pub fn from_config(name: impl Into<String>, config: &CoordinatorConfig) -> Result<Self, CoreError> {
        let transport = config.endpoint.transport(config.timeout);
        let client = PantryClient::new(config.endpoint.url().clone(), &transport)?;
        Ok(Self::new(name, client, config.update_interval))
    }
}

impl<S: DataSource> Coordinator<S> {
    /// Create a coordinator. Does NOT poll -- call
    /// [`first_refresh()`](Self::first_refresh) and [`start()`](Self::start).
    pub fn new(name: impl Into<String>, source: S, update_interval: Duration) -> Self {
        Self {
            inner: Arc::new(CoordinatorInner {
                name: name.into(),
                source,
                update_interval,
                cache: FetchCache::new(),
                refresh_lock: Mutex::new(()),
                cancel: CancellationToken::new(),
                task: Mutex::new(None),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn source(&self) -> &S {
        &self.inner.source
    }

    pub fn update_interval(&self) -> Duration {
        self.inner.update_interval
    }

    // ── Polling ──────────────────────────────────────────────────

    /// Fetch once and, on success, replace the cached snapshot.
    ///
    /// On failure the previous snapshot stays in place and the status
    /// flips to [`UpdateStatus::Failed`]. Concurrent callers queue behind
    /// the fetch already in flight.
    pub async fn refresh(&self) -> Result<Arc<Snapshot>, CoreError> {
        let _guard = self.inner.refresh_lock.lock().await;
        debug!(coordinator = %self.inner.name, source = %self.inner.source.describe(), "refreshing");

        match self.inner.source.fetch().await {
            Ok(records) => {
                let snapshot = self.inner.cache.publish(records);
                debug!(
                    coordinator = %self.inner.name,
                    records = snapshot.len(),
                    "refresh complete"
                );
                Ok(snapshot)
            }
            Err(e) => {
                let err = CoreError::from(e);
                warn!(coordinator = %self.inner.name, error = %err, "refresh failed");
                self.inner.cache.mark_failed(err.to_string());
                Err(err)
            }
        }
    }

    /// Initial fetch performed during setup. Identical to
    /// [`refresh()`](Self::refresh), logged at `info`.
    pub async fn first_refresh(&self) -> Result<Arc<Snapshot>, CoreError> {
        let snapshot = self.refresh().await?;
        info!(
            coordinator = %self.inner.name,
            records = snapshot.len(),
            "initial pantry data loaded"
        );
        Ok(snapshot)
    }

    // ── Schedule ─────────────────────────────────────────────────

    /// Spawn the periodic refresh task. No-op when already running or when
    /// the update interval is zero.
    pub async fn start(&self) {
        if self.inner.update_interval.is_zero() {
            debug!(coordinator = %self.inner.name, "scheduled polling disabled");
            return;
        }

        let mut slot = self.inner.task.lock().await;
        if slot.is_some() {
            return;
        }

        let cancel = self.inner.cancel.child_token();
        let handle = tokio::spawn(refresh_task(self.clone(), cancel.clone()));
        *slot = Some((handle, cancel));
        debug!(
            coordinator = %self.inner.name,
            interval_secs = self.inner.update_interval.as_secs(),
            "scheduled polling started"
        );
    }

    /// Stop the periodic task and wait for it to finish. A fetch in
    /// flight is abandoned at its next suspension point.
    pub async fn shutdown(&self) {
        let running = self.inner.task.lock().await.take();
        if let Some((handle, cancel)) = running {
            cancel.cancel();
            let _ = handle.await;
            debug!(coordinator = %self.inner.name, "scheduled polling stopped");
        }
    }

    pub async fn is_running(&self) -> bool {
        self.inner.task.lock().await.is_some()
    }

    // ── State observation ────────────────────────────────────────

    /// Latest successful snapshot, if any.
    pub fn data(&self) -> Option<Arc<Snapshot>> {
        self.inner.cache.current()
    }

    pub fn status(&self) -> UpdateStatus {
        self.inner.cache.status()
    }

    pub fn last_update_success(&self) -> bool {
        self.inner.cache.status().is_ok()
    }

    /// Message of the last failed poll, cleared by the next success.
    pub fn last_error(&self) -> Option<String> {
        self.inner.cache.status().error().map(str::to_owned)
    }

    /// Read-only handle for entities and UI consumers.
    pub fn handle(&self) -> CacheHandle {
        self.inner.cache.handle()
    }
}

/// Periodic refresh loop.
async fn refresh_task<S: DataSource>(coordinator: Coordinator<S>, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(coordinator.update_interval());
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => break,
                    // Failures are logged and recorded by `refresh` itself.
                    _ = coordinator.refresh() => {}
                }
            }
        }
    }
}
