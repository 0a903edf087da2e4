// ── Pollable data source ──
//
// The coordinator only needs "fetch the whole inventory once". Keeping that
// behind a trait lets tests script poll outcomes without an HTTP server.

use std::future::Future;

use pantry_api::{InventoryRecord, PantryClient};

/// Something that can be polled for the full inventory.
pub trait DataSource: Send + Sync + 'static {
    /// Perform exactly one fetch. No retries.
    fn fetch(&self) -> impl Future<Output = Result<Vec<InventoryRecord>, pantry_api::Error>> + Send;

    /// Human-readable location, for logs.
    fn describe(&self) -> String;
}

impl DataSource for PantryClient {
    fn fetch(&self) -> impl Future<Output = Result<Vec<InventoryRecord>, pantry_api::Error>> + Send {
        self.fetch_inventory()
    }

    fn describe(&self) -> String {
        self.endpoint().to_string()
    }
}
