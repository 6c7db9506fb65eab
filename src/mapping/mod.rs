//! Declarative field mapping
//!
//! Turns MarineTraffic vendor fields into Signal K paths:
//! - `conversions`: unit and sentinel converters
//! - `rules`: the ordered mapping table
//! - `ship_types`: AIS ship-type taxonomy lookup

pub mod conversions;
pub mod rules;
pub mod ship_types;

pub use conversions::{ConversionContext, ConvertFn};
pub use rules::{MappingRule, MAPPING_RULES};
pub use ship_types::{ais_ship_type_name, AisShipTypes, ShipTypeResolver};
