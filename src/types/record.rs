//! Raw MarineTraffic vessel record types

use serde_json::{Map, Number, Value};
use std::collections::HashMap;

/// MarineTraffic field codes consumed by the mapping table.
pub mod fields {
    pub const MMSI: &str = "MMSI";
    pub const IMO: &str = "IMO";
    pub const SHIPNAME: &str = "SHIPNAME";
    pub const CALLSIGN: &str = "CALLSIGN";
    pub const LAT: &str = "LAT";
    pub const LON: &str = "LON";
    pub const SPEED: &str = "SPEED";
    pub const HEADING: &str = "HEADING";
    pub const COURSE: &str = "COURSE";
    pub const STATUS: &str = "STATUS";
    pub const SHIPTYPE: &str = "SHIPTYPE";
    pub const DESTINATION: &str = "DESTINATION";
    pub const ETA: &str = "ETA";
    pub const DISTANCE_TRAVELLED: &str = "DISTANCE_TRAVELLED";
    pub const DRAUGHT: &str = "DRAUGHT";
    /// Antenna to bow (m)
    pub const TO_BOW: &str = "A";
    /// Antenna to stern (m)
    pub const TO_STERN: &str = "B";
    /// Antenna to port (m)
    pub const TO_PORT: &str = "C";
    /// Antenna to starboard (m)
    pub const TO_STARBOARD: &str = "D";
    pub const TIMESTAMP: &str = "TIMESTAMP";
    /// Data source: `TER` (terrestrial) or `SAT` (satellite)
    pub const DSRC: &str = "DSRC";
}

/// A single vendor field value.
///
/// MarineTraffic's `jsono` protocol sends nearly everything as strings, but
/// numbers show up too depending on the endpoint version.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Text(String),
    Number(Number),
}

impl RawValue {
    /// Interpret the value as a finite number.
    ///
    /// Text is trimmed before parsing. Returns `None` for anything that is
    /// not a finite number.
    pub fn as_f64(&self) -> Option<f64> {
        let v = match self {
            RawValue::Number(n) => n.as_f64()?,
            RawValue::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        v.is_finite().then_some(v)
    }

    /// Interpret the value as an integer code (status, ship type).
    ///
    /// Whole floats such as `5.0` count; `5.5` does not.
    pub fn as_i64(&self) -> Option<i64> {
        let exact = match self {
            RawValue::Number(n) => n.as_i64(),
            RawValue::Text(s) => s.trim().parse::<i64>().ok(),
        };
        exact.or_else(|| {
            let v = self.as_f64()?;
            // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive
            (v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64).then_some(v as i64)
        })
    }

    /// String form without any locale formatting.
    ///
    /// Numbers keep their JSON text, so `304010417` never becomes
    /// `304010417.0`.
    pub fn to_text(&self) -> String {
        match self {
            RawValue::Text(s) => s.clone(),
            RawValue::Number(n) => n.to_string(),
        }
    }

    /// True for a zero-length text value.
    pub fn is_empty_text(&self) -> bool {
        matches!(self, RawValue::Text(s) if s.is_empty())
    }
}

/// One vessel entry from a MarineTraffic export batch.
///
/// Only string and number fields are kept; `null`, booleans, arrays and
/// nested objects are treated as absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawVesselRecord {
    fields: HashMap<String, RawValue>,
}

impl RawVesselRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from a JSON object.
    pub fn from_json_object(object: &Map<String, Value>) -> Self {
        let fields = object
            .iter()
            .filter_map(|(key, value)| {
                let raw = match value {
                    Value::String(s) => RawValue::Text(s.clone()),
                    Value::Number(n) => RawValue::Number(n.clone()),
                    _ => return None,
                };
                Some((key.clone(), raw))
            })
            .collect();
        Self { fields }
    }

    /// Set a text field (builder style, mostly for tests and fixtures).
    pub fn with_text(mut self, key: &str, value: &str) -> Self {
        self.fields
            .insert(key.to_string(), RawValue::Text(value.to_string()));
        self
    }

    /// Set a numeric field.
    pub fn with_number(mut self, key: &str, value: impl Into<Number>) -> Self {
        self.fields
            .insert(key.to_string(), RawValue::Number(value.into()));
        self
    }

    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.fields.get(key)
    }

    /// Numeric value of a field, if present and parseable.
    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(RawValue::as_f64)
    }

    /// Non-empty text of a field.
    pub fn text(&self, key: &str) -> Option<String> {
        self.get(key)
            .filter(|v| !v.is_empty_text())
            .map(RawValue::to_text)
    }

    /// The vessel MMSI, trimmed. Blank or whitespace-only values are unusable.
    pub fn mmsi(&self) -> Option<String> {
        let mmsi = self.text(fields::MMSI)?;
        let trimmed = mmsi.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_object_keeps_strings_and_numbers() {
        let value = json!({
            "MMSI": "304010417",
            "SPEED": 74,
            "SHIPNAME": null,
            "FLAG": true,
            "EXTRA": {"nested": 1}
        });
        let record = RawVesselRecord::from_json_object(value.as_object().unwrap());

        assert_eq!(record.len(), 2);
        assert_eq!(record.mmsi().as_deref(), Some("304010417"));
        assert_eq!(record.number("SPEED"), Some(74.0));
        assert!(record.get("SHIPNAME").is_none());
        assert!(record.get("FLAG").is_none());
    }

    #[test]
    fn test_numeric_text_parsing() {
        assert_eq!(RawValue::Text(" 47.758499 ".into()).as_f64(), Some(47.758499));
        assert_eq!(RawValue::Text("abc".into()).as_f64(), None);
        assert_eq!(RawValue::Text("NaN".into()).as_f64(), None);
        assert_eq!(RawValue::Text("7".into()).as_i64(), Some(7));
    }

    #[test]
    fn test_number_to_text_has_no_decimal_suffix() {
        let record = RawVesselRecord::new().with_number(fields::MMSI, 304010417u64);
        assert_eq!(record.mmsi().as_deref(), Some("304010417"));
    }

    #[test]
    fn test_empty_mmsi_is_unresolvable() {
        let record = RawVesselRecord::new().with_text(fields::MMSI, "");
        assert!(record.mmsi().is_none());
        let record = RawVesselRecord::new().with_text(fields::MMSI, "   ");
        assert!(record.mmsi().is_none());
    }

    #[test]
    fn test_padded_mmsi_is_trimmed() {
        let record = RawVesselRecord::new().with_text(fields::MMSI, " 304010417 ");
        assert_eq!(record.mmsi().as_deref(), Some("304010417"));
    }

    #[test]
    fn test_whole_floats_are_integer_codes() {
        let five = serde_json::Number::from_f64(5.0).unwrap();
        assert_eq!(RawValue::Number(five).as_i64(), Some(5));
        assert_eq!(RawValue::Text("70.0".into()).as_i64(), Some(70));
        assert_eq!(RawValue::Text("5.5".into()).as_i64(), None);
        let half = serde_json::Number::from_f64(5.5).unwrap();
        assert_eq!(RawValue::Number(half).as_i64(), None);
        assert_eq!(RawValue::Text("1e30".into()).as_i64(), None);
    }
}
