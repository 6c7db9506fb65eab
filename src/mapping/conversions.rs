//! Unit and sentinel converters
//!
//! Every converter has the shape `(context, raw) -> Option<NormalizedValue>`.
//! `None` means the field must not appear in the output at all: a sentinel
//! code, a zero that stands for "unknown", or a value that does not parse.
//!
//! Converters receive the whole record through [`ConversionContext`] so the
//! dimension rules can combine the four antenna offsets.

use std::f64::consts::PI;

use super::ship_types::ShipTypeResolver;
use crate::types::{fields, NormalizedValue, RawValue, RawVesselRecord};

/// MarineTraffic COURSE value meaning "no course available".
pub const COURSE_NOT_AVAILABLE: f64 = 360.0;

/// MarineTraffic HEADING value meaning "no heading available".
pub const HEADING_NOT_AVAILABLE: f64 = 511.0;

/// Metres per second in one knot, as used by the upstream integration.
pub const KNOTS_TO_MPS: f64 = 0.514444;

/// Metres in one nautical mile.
pub const METRES_PER_NAUTICAL_MILE: f64 = 1852.0;

/// Everything a converter may look at besides its own raw value.
pub struct ConversionContext<'a> {
    pub record: &'a RawVesselRecord,
    pub ship_types: &'a dyn ShipTypeResolver,
}

/// A converter slot in the mapping table.
pub type ConvertFn = fn(&ConversionContext<'_>, &RawValue) -> Option<NormalizedValue>;

pub fn degrees_to_radians(degrees: f64) -> f64 {
    degrees * PI / 180.0
}

/// COURSE (degrees) to radians; 360 is the "not available" sentinel.
pub fn course_conversion(_ctx: &ConversionContext<'_>, raw: &RawValue) -> Option<NormalizedValue> {
    let course = raw.as_f64()?;
    if course == COURSE_NOT_AVAILABLE {
        return None;
    }
    Some(NormalizedValue::Number(degrees_to_radians(course)))
}

/// HEADING (degrees) to radians; 511 is the "not available" sentinel.
pub fn heading_conversion(_ctx: &ConversionContext<'_>, raw: &RawValue) -> Option<NormalizedValue> {
    let heading = raw.as_f64()?;
    if heading == HEADING_NOT_AVAILABLE {
        return None;
    }
    Some(NormalizedValue::Number(degrees_to_radians(heading)))
}

/// SPEED in tenths of a knot to m/s.
pub fn speed_conversion(_ctx: &ConversionContext<'_>, raw: &RawValue) -> Option<NormalizedValue> {
    let tenths_of_knot = raw.as_f64()?;
    Some(NormalizedValue::Number(tenths_of_knot / 10.0 * KNOTS_TO_MPS))
}

/// DRAUGHT in tenths of a metre; zero means unknown.
pub fn draught_conversion(_ctx: &ConversionContext<'_>, raw: &RawValue) -> Option<NormalizedValue> {
    let tenths_of_metre = raw.as_f64()?;
    if tenths_of_metre == 0.0 {
        return None;
    }
    Some(NormalizedValue::Draft {
        maximum: tenths_of_metre / 10.0,
    })
}

/// DISTANCE_TRAVELLED divided by 1852.
pub fn distance_conversion(_ctx: &ConversionContext<'_>, raw: &RawValue) -> Option<NormalizedValue> {
    let distance = raw.as_f64()?;
    Some(NormalizedValue::Number(distance / METRES_PER_NAUTICAL_MILE))
}

/// Mark a vendor timestamp as UTC by appending `Z`. The string is not validated.
pub fn timestamp_conversion(_ctx: &ConversionContext<'_>, raw: &RawValue) -> Option<NormalizedValue> {
    Some(NormalizedValue::Text(format!("{}Z", raw.to_text())))
}

/// Stringify MMSI / IMO without locale formatting. Surrounding whitespace is
/// dropped; a blank identifier is suppressed.
pub fn numeric_identifier_to_string(
    _ctx: &ConversionContext<'_>,
    raw: &RawValue,
) -> Option<NormalizedValue> {
    let text = raw.to_text();
    let id = text.trim();
    (!id.is_empty()).then(|| NormalizedValue::Text(id.to_string()))
}

/// SHIPTYPE code to `{id, name}` through the taxonomy resolver.
pub fn ship_type_conversion(ctx: &ConversionContext<'_>, raw: &RawValue) -> Option<NormalizedValue> {
    let code = raw.as_i64()?;
    let name = ctx.ship_types.resolve(code)?;
    Some(NormalizedValue::ShipType {
        id: code,
        name: name.to_string(),
    })
}

/// Map an AIS navigational status code to its state name.
pub fn navigation_state_name(code: i64) -> Option<&'static str> {
    let state = match code {
        0 => "motoring",
        1 => "anchored",
        2 => "not under command",
        3 => "restricted manoeuvrability",
        4 => "constrained by draft",
        5 => "moored",
        6 => "aground",
        7 => "fishing",
        8 => "sailing",
        9 => "hazardous material high speed",
        10 => "hazardous material wing in ground",
        14 => "ais-sart",
        // 15 is "undefined" in AIS; 11-13 are reserved
        _ => return None,
    };
    Some(state)
}

/// STATUS code to navigation state.
pub fn navigation_state_conversion(
    _ctx: &ConversionContext<'_>,
    raw: &RawValue,
) -> Option<NormalizedValue> {
    let code = raw.as_i64()?;
    navigation_state_name(code).map(|s| NormalizedValue::Text(s.to_string()))
}

/// LAT + LON into a position. Longitude may be missing.
pub fn position_conversion(ctx: &ConversionContext<'_>, raw: &RawValue) -> Option<NormalizedValue> {
    let latitude = raw.as_f64()?;
    Some(NormalizedValue::Position {
        latitude,
        longitude: ctx.record.number(fields::LON),
    })
}

/// Offset of the partner field, missing counts as zero.
fn partner_offset(ctx: &ConversionContext<'_>, key: &str) -> f64 {
    ctx.record.number(key).unwrap_or(0.0)
}

/// `{overall: A + B}`, suppressed when the sum is zero.
pub fn length_conversion(ctx: &ConversionContext<'_>, raw: &RawValue) -> Option<NormalizedValue> {
    let overall = raw.as_f64()? + partner_offset(ctx, fields::TO_STERN);
    (overall != 0.0).then_some(NormalizedValue::Length { overall })
}

/// `C + D`, suppressed when the sum is zero.
pub fn beam_conversion(ctx: &ConversionContext<'_>, raw: &RawValue) -> Option<NormalizedValue> {
    let beam = raw.as_f64()? + partner_offset(ctx, fields::TO_STARBOARD);
    (beam != 0.0).then_some(NormalizedValue::Number(beam))
}

/// Antenna distance from the bow (A), suppressed when A + B is zero.
pub fn from_bow_conversion(ctx: &ConversionContext<'_>, raw: &RawValue) -> Option<NormalizedValue> {
    let to_bow = raw.as_f64()?;
    if to_bow + partner_offset(ctx, fields::TO_STERN) == 0.0 {
        return None;
    }
    Some(NormalizedValue::Number(to_bow))
}

/// Antenna offset from the centerline; starboard is negative.
pub fn from_center_conversion(ctx: &ConversionContext<'_>, raw: &RawValue) -> Option<NormalizedValue> {
    let to_port = raw.as_f64()?;
    let to_starboard = partner_offset(ctx, fields::TO_STARBOARD);
    antenna_from_center(to_port, to_starboard).map(NormalizedValue::Number)
}

/// Signed antenna offset from the centerline given the port/starboard
/// distances. `None` when the beam is zero.
pub fn antenna_from_center(to_port: f64, to_starboard: f64) -> Option<f64> {
    let width = to_port + to_starboard;
    if width == 0.0 {
        return None;
    }
    let half = width / 2.0;
    if to_starboard > half {
        Some(-(to_starboard - half))
    } else {
        Some(half - to_starboard)
    }
}
