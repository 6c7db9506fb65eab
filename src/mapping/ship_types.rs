//! AIS ship-type taxonomy
//!
//! AIS message 5 encodes the ship and cargo type as a two-digit code
//! (ITU-R M.1371, table 53). The first digit is the category, the second
//! the hazard class or sub-type.

/// Resolves a human-readable name for an AIS ship-type code.
pub trait ShipTypeResolver: Send + Sync {
    fn resolve(&self, code: i64) -> Option<&str>;
}

/// Built-in static AIS ship-type table.
#[derive(Debug, Clone, Copy, Default)]
pub struct AisShipTypes;

impl ShipTypeResolver for AisShipTypes {
    fn resolve(&self, code: i64) -> Option<&str> {
        ais_ship_type_name(code)
    }
}

/// Look up the standard name of an AIS ship-type code.
pub fn ais_ship_type_name(code: i64) -> Option<&'static str> {
    let name = match code {
        20 => "Wing In Ground",
        21 => "Wing In Ground, hazardous category A",
        22 => "Wing In Ground, hazardous category B",
        23 => "Wing In Ground, hazardous category C",
        24 => "Wing In Ground, hazardous category D",
        29 => "Wing In Ground (no other information)",
        30 => "Fishing",
        31 => "Towing",
        32 => "Towing exceeds 200m or wider than 25m",
        33 => "Engaged in dredging or underwater operations",
        34 => "Engaged in diving operations",
        35 => "Engaged in military operations",
        36 => "Sailing",
        37 => "Pleasure",
        40 => "High speed craft",
        41 => "High speed craft carrying dangerous goods",
        42 => "High speed craft hazard cat B",
        43 => "High speed craft hazard cat C",
        44 => "High speed craft hazard cat D",
        49 => "High speed craft (no additional information)",
        50 => "Pilot vessel",
        51 => "SAR",
        52 => "Tug",
        53 => "Port tender",
        54 => "Anti-pollution",
        55 => "Law enforcement",
        56 | 57 => "Spare",
        58 => "Medical",
        59 => "RR Resolution No.18",
        60 => "Passenger ship",
        61..=64 => "Passenger ship, hazardous",
        69 => "Passenger ship (no additional information)",
        70 => "Cargo ship",
        71 => "Cargo ship carrying dangerous goods",
        72 => "Cargo ship hazard cat B",
        73 => "Cargo ship hazard cat C",
        74 => "Cargo ship hazard cat D",
        79 => "Cargo ship (no additional information)",
        80 => "Tanker",
        81 => "Tanker carrying dangerous goods",
        82 => "Tanker hazard cat B",
        83 => "Tanker hazard cat C",
        84 => "Tanker hazard cat D",
        89 => "Tanker (no additional information)",
        90 => "Other",
        91 => "Other, hazardous category A",
        92 => "Other, hazardous category B",
        93 => "Other, hazardous category C",
        94 => "Other, hazardous category D",
        99 => "Other (no additional information)",
        _ => return None,
    };
    Some(name)
}
