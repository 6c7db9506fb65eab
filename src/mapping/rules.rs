//! The field mapping table
//!
//! One rule per output field. Rule order is output order: the normalizer
//! walks this slice front to back and appends values as they resolve.

use super::conversions::*;
use crate::types::fields;

/// How one vendor field becomes one output value.
#[derive(Clone, Copy)]
pub struct MappingRule {
    /// Dotted output path, or the key inside the root object for root-level rules
    pub destination_path: &'static str,
    /// Vendor field that triggers the rule
    pub source_key: &'static str,
    /// Write into the synthetic root object instead of a path entry
    pub root_level: bool,
    /// `None` passes the raw value through unchanged
    pub convert: Option<ConvertFn>,
}

impl MappingRule {
    const fn path(source_key: &'static str, destination_path: &'static str, convert: ConvertFn) -> Self {
        Self {
            destination_path,
            source_key,
            root_level: false,
            convert: Some(convert),
        }
    }

    const fn root(source_key: &'static str, key: &'static str, convert: Option<ConvertFn>) -> Self {
        Self {
            destination_path: key,
            source_key,
            root_level: true,
            convert,
        }
    }

    const fn passthrough(source_key: &'static str, destination_path: &'static str) -> Self {
        Self {
            destination_path,
            source_key,
            root_level: false,
            convert: None,
        }
    }
}

impl std::fmt::Debug for MappingRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MappingRule")
            .field("destination_path", &self.destination_path)
            .field("source_key", &self.source_key)
            .field("root_level", &self.root_level)
            .field("convert", &self.convert.is_some())
            .finish()
    }
}

/// MarineTraffic export fields to Signal K paths.
pub static MAPPING_RULES: &[MappingRule] = &[
    // Identity
    MappingRule::root(fields::MMSI, "mmsi", Some(numeric_identifier_to_string)),
    MappingRule::root(fields::SHIPNAME, "name", None),
    MappingRule::root(fields::CALLSIGN, "callsign", None),
    MappingRule::root(fields::IMO, "imo", Some(numeric_identifier_to_string)),
    // Kinematics
    MappingRule::path(fields::COURSE, "navigation.courseOverGroundTrue", course_conversion),
    MappingRule::path(fields::HEADING, "navigation.headingTrue", heading_conversion),
    MappingRule::path(fields::SPEED, "navigation.speedOverGround", speed_conversion),
    MappingRule::path(fields::LAT, "navigation.position", position_conversion),
    MappingRule::path(fields::STATUS, "navigation.state", navigation_state_conversion),
    // Voyage
    MappingRule::passthrough(fields::DESTINATION, "navigation.destination.commonName"),
    MappingRule::path(fields::ETA, "navigation.destination.eta", timestamp_conversion),
    MappingRule::path(fields::DISTANCE_TRAVELLED, "navigation.trip.log", distance_conversion),
    // Design
    MappingRule::path(fields::TO_BOW, "design.length", length_conversion),
    MappingRule::path(fields::TO_PORT, "design.beam", beam_conversion),
    MappingRule::path(fields::DRAUGHT, "design.draft", draught_conversion),
    MappingRule::path(fields::SHIPTYPE, "design.aisShipType", ship_type_conversion),
    // Antenna placement
    MappingRule::path(fields::TO_BOW, "sensors.ais.fromBow", from_bow_conversion),
    MappingRule::path(fields::TO_PORT, "sensors.ais.fromCenter", from_center_conversion),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_root_rules_come_first() {
        let root: Vec<&str> = MAPPING_RULES
            .iter()
            .filter(|r| r.root_level)
            .map(|r| r.destination_path)
            .collect();
        assert_eq!(root, vec!["mmsi", "name", "callsign", "imo"]);
        assert!(MAPPING_RULES[..4].iter().all(|r| r.root_level));
    }

    #[test]
    fn test_destination_paths_unique() {
        let mut seen = HashSet::new();
        for rule in MAPPING_RULES {
            assert!(seen.insert(rule.destination_path), "duplicate {}", rule.destination_path);
        }
    }

    #[test]
    fn test_offset_rules_share_source_keys() {
        let from_a: Vec<&str> = MAPPING_RULES
            .iter()
            .filter(|r| r.source_key == fields::TO_BOW)
            .map(|r| r.destination_path)
            .collect();
        assert_eq!(from_a, vec!["design.length", "sensors.ais.fromBow"]);

        let from_c: Vec<&str> = MAPPING_RULES
            .iter()
            .filter(|r| r.source_key == fields::TO_PORT)
            .map(|r| r.destination_path)
            .collect();
        assert_eq!(from_c, vec!["design.beam", "sensors.ais.fromCenter"]);
    }
}
