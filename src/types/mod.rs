//! Shared data structures for the MarineTraffic normalization pipeline
//!
//! - `RawVesselRecord`: one vendor record from an export batch
//! - `NormalizedEvent`: the vendor-neutral vessel state handed to publishers

mod event;
mod record;

pub use event::*;
pub use record::*;
