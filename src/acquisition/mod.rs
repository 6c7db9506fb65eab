//! Vessel data acquisition module
//!
//! Fetches MarineTraffic export batches and translates them into
//! normalized events.

pub mod client;
pub mod translator;

pub use client::{ApiClientError, MarineTrafficClient, QueryTier};
pub use translator::{BatchOutcome, BatchStats, TranslateError, Translator};
