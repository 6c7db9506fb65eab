//! Record Normalizer
//!
//! Applies the mapping table to one raw MarineTraffic record and builds a
//! [`NormalizedEvent`]. All cross-field derivation happens inside the
//! converters; this module owns the walk, the skip rules and the root
//! object merge.

use std::sync::Arc;

use crate::mapping::{AisShipTypes, ConversionContext, MappingRule, ShipTypeResolver, MAPPING_RULES};
use crate::types::{
    fields, vessel_context, NormalizedEvent, NormalizedValue, PathValue, RawVesselRecord, RootObject,
};

/// Prefix of every event's source label.
pub const SOURCE_LABEL_PREFIX: &str = "marinetraffic-";

/// Turns raw vendor records into normalized events.
///
/// Stateless between calls; share it freely across tasks.
#[derive(Clone)]
pub struct RecordNormalizer {
    rules: &'static [MappingRule],
    ship_types: Arc<dyn ShipTypeResolver>,
}

impl RecordNormalizer {
    /// Normalizer with the default mapping table and the built-in AIS ship types.
    pub fn new() -> Self {
        Self {
            rules: MAPPING_RULES,
            ship_types: Arc::new(AisShipTypes),
        }
    }

    /// Replace the ship-type taxonomy.
    pub fn with_ship_types(mut self, resolver: Arc<dyn ShipTypeResolver>) -> Self {
        self.ship_types = resolver;
        self
    }

    /// Replace the mapping table.
    pub fn with_rules(mut self, rules: &'static [MappingRule]) -> Self {
        self.rules = rules;
        self
    }

    /// Normalize one record.
    ///
    /// Returns `None` when the record has no usable MMSI. An event with no
    /// values is still an event.
    pub fn normalize(&self, record: &RawVesselRecord) -> Option<NormalizedEvent> {
        let mmsi = record.mmsi()?;

        let ctx = ConversionContext {
            record,
            ship_types: self.ship_types.as_ref(),
        };

        let mut values: Vec<PathValue> = Vec::new();
        // Index of the root object entry in `values`, once one exists
        let mut root_slot: Option<usize> = None;

        for rule in self.rules {
            let Some(raw) = record.get(rule.source_key) else {
                continue;
            };
            if raw.is_empty_text() {
                continue;
            }

            let converted = match rule.convert {
                Some(convert) => convert(&ctx, raw),
                None => Some(NormalizedValue::Text(raw.to_text())),
            };
            let Some(value) = converted else {
                continue;
            };

            if rule.root_level {
                let slot = *root_slot.get_or_insert_with(|| {
                    values.push(PathValue {
                        path: String::new(),
                        value: NormalizedValue::Root(RootObject::new()),
                    });
                    values.len() - 1
                });
                if let NormalizedValue::Root(root) = &mut values[slot].value {
                    root.insert(rule.destination_path, value);
                }
            } else {
                values.push(PathValue {
                    path: rule.destination_path.to_string(),
                    value,
                });
            }
        }

        Some(NormalizedEvent {
            context: vessel_context(&mmsi),
            timestamp: event_timestamp(record),
            source_label: format!(
                "{SOURCE_LABEL_PREFIX}{}",
                record.text(fields::DSRC).unwrap_or_default()
            ),
            values,
        })
    }
}

impl Default for RecordNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RecordNormalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordNormalizer")
            .field("rules", &self.rules.len())
            .finish_non_exhaustive()
    }
}

/// Vendor TIMESTAMP marked as UTC, or now when the record carries none.
fn event_timestamp(record: &RawVesselRecord) -> String {
    match record.text(fields::TIMESTAMP) {
        Some(ts) => format!("{ts}Z"),
        None => chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
    }
}
