// ── Sensor entities ──
//
// A `PantrySensor` is created once per inventory item and never stores the
// item's values: every read re-scans the latest snapshot for its id. If the
// id vanishes upstream the sensor stays registered and reports `Unknown`.

use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use pantry_api::{InventoryRecord, RecordId};

use crate::model::unit::normalize_unit;
use crate::store::CacheHandle;

pub const PANTRY_ICON: &str = "mdi:food-apple";

// ── EntityState ─────────────────────────────────────────────────────

/// Current value of a sensor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EntityState {
    Value(f64),
    Unknown,
}

impl EntityState {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(*v),
            Self::Unknown => None,
        }
    }
}

impl fmt::Display for EntityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => write!(f, "{v}"),
            Self::Unknown => f.write_str("unknown"),
        }
    }
}

impl Serialize for EntityState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Value(v) => serializer.serialize_f64(*v),
            Self::Unknown => serializer.serialize_str("unknown"),
        }
    }
}

// ── Entity capability ───────────────────────────────────────────────

/// A host-visible, individually addressable state object.
pub trait Entity {
    fn unique_id(&self) -> &str;
    fn name(&self) -> &str;

    fn icon(&self) -> Option<&str> {
        None
    }

    fn state(&self) -> EntityState;
    fn unit_of_measurement(&self) -> Option<String>;
    fn attributes(&self) -> Map<String, Value>;

    fn available(&self) -> bool {
        true
    }

    /// Render the full current state in one go.
    fn snapshot(&self) -> EntitySnapshot {
        EntitySnapshot {
            unique_id: self.unique_id().to_owned(),
            name: self.name().to_owned(),
            icon: self.icon().map(str::to_owned),
            state: self.state(),
            unit_of_measurement: self.unit_of_measurement(),
            attributes: self.attributes(),
            available: self.available(),
        }
    }
}

/// Point-in-time rendering of an [`Entity`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntitySnapshot {
    pub unique_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub state: EntityState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_of_measurement: Option<String>,
    pub attributes: Map<String, Value>,
    pub available: bool,
}

// ── PantrySensor ────────────────────────────────────────────────────

/// Sensor for one pantry item, keyed by the record id.
#[derive(Debug, Clone)]
pub struct PantrySensor {
    record_id: RecordId,
    unique_id: String,
    name: String,
    cache: CacheHandle,
}

impl PantrySensor {
    /// Create a sensor from the record it was first seen in. Returns
    /// `None` if the record lacks an id or a name.
    pub fn from_record(record: &InventoryRecord, cache: CacheHandle) -> Option<Self> {
        let record_id = record.id.clone()?;
        let item_name = record.name.as_deref()?;

        Some(Self {
            unique_id: format!("{}_pantry_{record_id}", crate::DOMAIN),
            name: format!("Pantry: {}", capitalize(item_name)),
            record_id,
            cache,
        })
    }

    pub fn record_id(&self) -> &RecordId {
        &self.record_id
    }

    /// Look up this sensor's record in the latest snapshot and map it.
    fn with_record<T>(&self, f: impl FnOnce(&InventoryRecord) -> Option<T>) -> Option<T> {
        let snapshot = self.cache.current()?;
        snapshot.find(&self.record_id).and_then(f)
    }
}

impl Entity for PantrySensor {
    fn unique_id(&self) -> &str {
        &self.unique_id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn icon(&self) -> Option<&str> {
        Some(PANTRY_ICON)
    }

    fn state(&self) -> EntityState {
        self.with_record(|r| r.quantity)
            .map_or(EntityState::Unknown, EntityState::Value)
    }

    fn unit_of_measurement(&self) -> Option<String> {
        self.with_record(|r| normalize_unit(r.unit.as_deref()))
    }

    fn attributes(&self) -> Map<String, Value> {
        self.with_record(|r| Some(record_attributes(r)))
            .unwrap_or_default()
    }

    fn available(&self) -> bool {
        self.cache.last_update_success()
    }
}

/// Auxiliary attributes: expiry and creation dates plus every unmodelled
/// field of the record, keyed in snake_case.
fn record_attributes(record: &InventoryRecord) -> Map<String, Value> {
    let mut attrs = Map::new();
    if let Some(ref expiry) = record.expiry_date {
        attrs.insert("expiry_date".into(), Value::String(expiry.clone()));
    }
    if let Some(ref created) = record.created_at {
        attrs.insert("created_at".into(), Value::String(created.clone()));
    }
    for (key, value) in &record.extra {
        attrs
            .entry(snake_case(key))
            .or_insert_with(|| value.clone());
    }
    attrs
}

/// Upper-case the first character, lower-case the rest.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// `storageLocation` -> `storage_location`.
fn snake_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for (i, c) in key.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}
