// pantry-api: Async Rust client for the pantry add-on and the supervisor API

pub mod error;
pub mod models;
pub mod pantry;
pub mod supervisor;
pub mod transport;

pub use error::Error;
pub use models::{AddonInfo, AddonState, InventoryRecord, RecordId};
pub use pantry::PantryClient;
pub use supervisor::SupervisorClient;
pub use transport::TransportConfig;
