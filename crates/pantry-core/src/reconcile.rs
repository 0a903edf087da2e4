// ── Entity reconciliation ──
//
// Runs once per config entry, right after the first successful refresh.
// There is no deletion path: sensors created here live until the entry is
// unloaded, whatever later snapshots contain.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::model::{Entity, PantrySensor};
use crate::store::CacheHandle;

/// Build one sensor per identifiable record in the current snapshot.
///
/// Records without an id or a name are skipped with a warning. An absent
/// or empty snapshot yields no sensors (and a warning), never an error.
pub fn build_entities(cache: &CacheHandle) -> Vec<PantrySensor> {
    let Some(snapshot) = cache.current() else {
        warn!("no pantry data available to create sensors from");
        return Vec::new();
    };

    if snapshot.is_empty() {
        warn!("pantry data is empty, no sensors created");
        return Vec::new();
    }

    let mut seen = HashSet::new();
    let mut sensors = Vec::with_capacity(snapshot.len());

    for record in &snapshot.records {
        let Some(sensor) = PantrySensor::from_record(record, cache.clone()) else {
            warn!(?record, "skipping pantry item without 'id' or 'name'");
            continue;
        };

        // `7` and `"7"` are different records but render the same unique id.
        if seen.insert(sensor.unique_id().to_owned()) {
            sensors.push(sensor);
        } else {
            warn!(id = %sensor.record_id(), "skipping duplicate pantry item id");
        }
    }

    debug!(count = sensors.len(), "pantry sensors created");
    sensors
}
