// Wire models for the pantry add-on and the supervisor API.
//
// Inventory records are parsed leniently: the add-on is free to add fields
// or send odd values, and a single bad record must never fail a whole poll.
// Only the outer array shape is strict (see `PantryClient`).

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

// ── RecordId ────────────────────────────────────────────────────────

/// Identifier of an inventory record.
///
/// The add-on emits numeric ids, but string ids are accepted too. `7` and
/// `"7"` are distinct identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl RecordId {
    /// Extract an id from a raw JSON value. `null`, blank strings and
    /// non-scalar values yield `None`.
    ///
    /// This is not a truthiness test: `0` is a real id, while `""` and
    /// `"  "` are not. Names follow the same blank rule.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Some(
                n.as_i64()
                    .map_or_else(|| Self::Text(n.to_string()), Self::Number),
            ),
            Value::String(s) if !s.trim().is_empty() => Some(Self::Text(s.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

// ── InventoryRecord ─────────────────────────────────────────────────

/// One pantry item as reported by the add-on's `GET /api/pantry`.
///
/// Every field is optional. Keys other than the known ones are preserved
/// in [`extra`](Self::extra) so they can surface as entity attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl InventoryRecord {
    /// Build a record from an arbitrary JSON value.
    ///
    /// Non-object values produce an empty record, which downstream code
    /// treats as "missing id and name".
    pub fn from_value(value: Value) -> Self {
        let Value::Object(mut obj) = value else {
            return Self::default();
        };

        let id = obj.remove("id").as_ref().and_then(RecordId::from_value);
        let name = obj.remove("name").and_then(non_empty_string);
        let quantity = obj.remove("quantity").as_ref().and_then(lenient_f64);
        let unit = obj.remove("unit").and_then(non_empty_string);
        let expiry_date = obj.remove("expiryDate").and_then(non_empty_string);
        let created_at = obj.remove("createdAt").and_then(non_empty_string);

        Self {
            id,
            name,
            quantity,
            unit,
            expiry_date,
            created_at,
            extra: obj,
        }
    }

    /// `true` if the record carries both an id and a name.
    pub fn is_identifiable(&self) -> bool {
        self.id.is_some() && self.name.is_some()
    }
}

impl<'de> Deserialize<'de> for InventoryRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from_value)
    }
}

fn non_empty_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s),
        _ => None,
    }
}

/// Numbers pass through; numeric strings (`"2.5"`) are parsed.
fn lenient_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Short name of a JSON value's kind, for shape errors.
pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ── Supervisor models ───────────────────────────────────────────────

/// Supervisor response envelope: `{ "result": "ok"|"error", "message", "data" }`.
#[derive(Debug, Deserialize)]
pub(crate) struct SupervisorResponse<T> {
    pub result: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
}

/// Run state of an add-on as reported by the supervisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddonState {
    Started,
    Stopped,
    Startup,
    Error,
    #[serde(other)]
    Unknown,
}

/// Runtime information about an add-on (`GET /addons/{slug}/info`).
///
/// Only the fields needed to locate the add-on are modelled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddonInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    pub state: AddonState,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub hostname: Option<String>,
}

impl AddonInfo {
    pub fn is_started(&self) -> bool {
        self.state == AddonState::Started
    }

    /// Address other containers can reach the add-on at: the IP address
    /// if reported, otherwise its internal hostname.
    pub fn reachable_host(&self) -> Option<&str> {
        self.ip_address
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.hostname.as_deref().filter(|s| !s.is_empty()))
    }
}
