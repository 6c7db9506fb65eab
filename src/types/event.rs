//! Normalized vessel-state event types

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::json;

/// Prefix of every vessel context identifier.
pub const VESSEL_CONTEXT_PREFIX: &str = "vessels.urn:mrn:imo:mmsi:";

/// Build the vessel context identifier for an MMSI.
pub fn vessel_context(mmsi: &str) -> String {
    format!("{VESSEL_CONTEXT_PREFIX}{mmsi}")
}

/// A converted field value.
///
/// Serializes to plain JSON: numbers, strings, or small objects.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NormalizedValue {
    Number(f64),
    Text(String),
    /// `design.length`
    Length { overall: f64 },
    /// `design.draft`
    Draft { maximum: f64 },
    /// `navigation.position` (degrees)
    Position {
        latitude: f64,
        #[serde(skip_serializing_if = "Option::is_none")]
        longitude: Option<f64>,
    },
    /// `design.aisShipType`
    ShipType { id: i64, name: String },
    /// Synthetic object holding the root-level identity fields
    Root(RootObject),
}

impl NormalizedValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            NormalizedValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            NormalizedValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Insertion-ordered object of root-level values keyed by destination path.
///
/// Setting an existing key replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RootObject {
    entries: Vec<(String, NormalizedValue)>,
}

impl RootObject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &str, value: NormalizedValue) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key.to_string(), value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&NormalizedValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for RootObject {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// One `{path, value}` pair of an event. Root-level values use an empty path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathValue {
    pub path: String,
    pub value: NormalizedValue,
}

/// Vendor-neutral vessel state produced from one raw record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedEvent {
    /// `vessels.urn:mrn:imo:mmsi:<MMSI>`
    pub context: String,
    /// ISO 8601, UTC
    pub timestamp: String,
    /// `marinetraffic-<DSRC>`
    pub source_label: String,
    pub values: Vec<PathValue>,
}

impl NormalizedEvent {
    /// First value written at `path`.
    pub fn value(&self, path: &str) -> Option<&NormalizedValue> {
        self.values.iter().find(|pv| pv.path == path).map(|pv| &pv.value)
    }

    /// The synthetic root object, if any root-level field resolved.
    pub fn root(&self) -> Option<&RootObject> {
        match self.value("") {
            Some(NormalizedValue::Root(root)) => Some(root),
            _ => None,
        }
    }

    /// Render as a Signal K delta message.
    pub fn to_delta(&self) -> serde_json::Value {
        json!({
            "context": self.context,
            "updates": [{
                "source": { "label": self.source_label },
                "timestamp": self.timestamp,
                "values": self.values,
            }]
        })
    }
}
