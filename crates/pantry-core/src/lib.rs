//! Host-agnostic core of the pantry integration.
//!
//! Turns the pantry add-on's JSON inventory into a stable set of sensor
//! entities:
//!
//! - **[`Coordinator`]** — polls a [`DataSource`] on a fixed schedule (one
//!   hour by default), publishes each successful result as an immutable
//!   [`Snapshot`], and records failures without touching the cached data.
//!
//! - **[`reconcile`]** — builds one [`PantrySensor`] per identifiable record
//!   at setup time. Sensors re-read the latest snapshot on demand; an item
//!   that disappears upstream leaves its sensor in the `unknown` state.
//!
//! - **[`ConfigFlow`]** — the one-step setup wizard. Resolves the add-on's
//!   address with a pluggable [`ResolveStrategy`] and reports problems as
//!   [`AbortReason`] values.
//!
//! - **[`Hub`]** — per-session owner of loaded config entries: setup with a
//!   mandatory first refresh, unload, and lookup.

pub mod config;
pub mod coordinator;
pub mod error;
pub mod flow;
pub mod hub;
pub mod model;
pub mod reconcile;
pub mod source;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{AddonSettings, CoordinatorConfig, Endpoint, PantryConfig, SupervisorSettings};
pub use coordinator::Coordinator;
pub use error::CoreError;
pub use flow::{AbortReason, ConfigFlow, FlowResult};
pub use hub::Hub;
pub use model::{
    ConfigEntry, Entity, EntityState, EntitySnapshot, EntryData, PantrySensor, ResolveStrategy,
    normalize_unit,
};
pub use source::DataSource;
pub use store::{CacheHandle, Snapshot, UpdateStatus};

pub use pantry_api::{InventoryRecord, RecordId};

/// Integration domain; prefixes every entity's unique id.
pub const DOMAIN: &str = "bogyikonya";

/// Title given to the config entry created by the setup flow.
pub const ENTRY_TITLE: &str = "Bogyi Konyha (Add-on)";
