//! marinetraffic-bridge: MarineTraffic AIS ingestion for Signal K
//!
//! Turns MarineTraffic export payloads (flat, uppercase-keyed vessel records)
//! into Signal K style vessel-state events with SI units.
//!
//! ## Architecture
//!
//! - **Types**: raw vessel records and normalized events
//! - **Mapping**: unit/sentinel converters and the field mapping table
//! - **Normalizer**: applies the mapping table to one record
//! - **Acquisition**: batch translator and the export API client
//! - **Pipeline**: batch sources, processing loop and delta publisher
//! - **Geodesy**: great-circle dead reckoning between reports

pub mod acquisition;
pub mod config;
pub mod geodesy;
pub mod mapping;
pub mod normalizer;
pub mod pipeline;
pub mod types;

// Re-export configuration
pub use config::BridgeConfig;

// Re-export commonly used types
pub use types::{NormalizedEvent, NormalizedValue, PathValue, RawValue, RawVesselRecord, RootObject};

// Re-export the translation path
pub use acquisition::{BatchOutcome, BatchStats, TranslateError, Translator};
pub use normalizer::RecordNormalizer;

pub use geodesy::{dead_reckon, project, GeoPosition};
