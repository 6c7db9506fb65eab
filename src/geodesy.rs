//! Great-circle dead reckoning
//!
//! Projects a position along a heading on a spherical earth. Used to
//! estimate where a vessel is between two MarineTraffic reports.
//!
//! The formulas follow the aviation formulary, which counts longitude
//! positive west; the heading is mirrored (`2π - heading`) to keep the
//! usual east-positive convention on input and output.

use std::f64::consts::PI;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Minutes of arc per radian (`180 * 60 / π`).
const ARC_MINUTES_PER_RADIAN: f64 = 180.0 * 60.0 / PI;

/// Kilometres per nautical mile.
const KM_PER_NAUTICAL_MILE: f64 = 1.852;

/// A position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPosition {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPosition {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// Floor-based modulo, always in `[0, x)` for positive `x`.
fn floor_mod(y: f64, x: f64) -> f64 {
    y - x * (y / x).floor()
}

/// Wrap a longitude in radians into `[-π, π)`. `+π` maps to `-π`.
pub fn wrap_longitude(lon_rad: f64) -> f64 {
    floor_mod(lon_rad + PI, 2.0 * PI) - PI
}

/// Project `position` by `distance_m` metres along `heading_rad` (true,
/// radians, clockwise from north).
///
/// The resulting longitude is normalized into `[-180, 180)`.
pub fn project(position: GeoPosition, heading_rad: f64, distance_m: f64) -> GeoPosition {
    // Distance as great-circle arc in radians (1 nm = 1 arc minute)
    let d = distance_m / 1000.0 / KM_PER_NAUTICAL_MILE / ARC_MINUTES_PER_RADIAN;
    let tc = 2.0 * PI - heading_rad;

    let lat1 = position.latitude.to_radians();
    let lon1 = position.longitude.to_radians();

    let lat = (lat1.sin() * d.cos() + lat1.cos() * d.sin() * tc.cos()).asin();
    let dlon = (tc.sin() * d.sin() * lat1.cos()).atan2(d.cos() - lat1.sin() * lat.sin());
    let lon = wrap_longitude(lon1 - dlon);

    GeoPosition {
        latitude: lat.to_degrees(),
        longitude: lon.to_degrees(),
    }
}

/// Estimate the position after `elapsed` at constant course and speed.
pub fn dead_reckon(
    position: GeoPosition,
    course_rad: f64,
    speed_mps: f64,
    elapsed: Duration,
) -> GeoPosition {
    project(position, course_rad, speed_mps * elapsed.as_secs_f64())
}
