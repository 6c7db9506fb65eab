//! Batch Translator
//!
//! Parses a MarineTraffic export payload and runs every vessel entry through
//! the [`RecordNormalizer`]. The payload is either a JSON array of vessel
//! records or an error envelope:
//!
//! ```text
//! [{"MMSI":"304010417","LAT":"47.758499",...}, ...]
//! {"errors":[{"code":"5","detail":"INVALID API KEY"}]}
//! ```
//!
//! An error envelope is an upstream failure, not ours: it is logged and
//! yields no events. A payload that is not JSON at all is an error for the
//! caller.

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::normalizer::RecordNormalizer;
use crate::types::{NormalizedEvent, RawVesselRecord};

/// Batch translation errors
#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("Malformed payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    #[error("Unexpected payload shape: expected a vessel array or error envelope, got {0}")]
    UnexpectedShape(&'static str),
}

/// Per-batch counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct BatchStats {
    /// Entries in the vessel array
    pub received: usize,
    /// Events produced
    pub emitted: usize,
    /// Records without a usable MMSI
    pub skipped_no_mmsi: usize,
    /// Entries that were not JSON objects
    pub rejected: usize,
}

/// Result of translating one payload.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchOutcome {
    /// Vessel list translated; events in input order
    Events {
        events: Vec<NormalizedEvent>,
        stats: BatchStats,
    },
    /// The API answered with an error envelope
    ApiError { detail: String },
}

impl BatchOutcome {
    /// Events of the batch; empty for an API error.
    pub fn into_events(self) -> Vec<NormalizedEvent> {
        match self {
            BatchOutcome::Events { events, .. } => events,
            BatchOutcome::ApiError { .. } => Vec::new(),
        }
    }
}

/// Translates raw export payloads into normalized events.
#[derive(Debug, Clone, Default)]
pub struct Translator {
    normalizer: RecordNormalizer,
}

impl Translator {
    pub fn new(normalizer: RecordNormalizer) -> Self {
        Self { normalizer }
    }

    /// Translate a payload into its events.
    ///
    /// An API error envelope is logged and yields an empty list.
    pub fn translate(&self, payload: &str) -> Result<Vec<NormalizedEvent>, TranslateError> {
        Ok(self.translate_batch(payload)?.into_events())
    }

    /// Translate a payload, keeping the API error detail and batch counters.
    pub fn translate_batch(&self, payload: &str) -> Result<BatchOutcome, TranslateError> {
        let parsed: Value = serde_json::from_str(payload)?;

        match parsed {
            Value::Object(envelope) => match envelope.get("errors") {
                Some(errors) => {
                    let detail = first_error_detail(errors);
                    warn!(detail = %detail, "MarineTraffic API returned an error");
                    Ok(BatchOutcome::ApiError { detail })
                }
                None => Err(TranslateError::UnexpectedShape("object without errors")),
            },
            Value::Array(entries) => {
                let (events, stats) = self.translate_entries(&entries);
                debug!(
                    received = stats.received,
                    emitted = stats.emitted,
                    skipped_no_mmsi = stats.skipped_no_mmsi,
                    rejected = stats.rejected,
                    "Translated MarineTraffic batch"
                );
                Ok(BatchOutcome::Events { events, stats })
            }
            other => Err(TranslateError::UnexpectedShape(json_kind(&other))),
        }
    }

    fn translate_entries(&self, entries: &[Value]) -> (Vec<NormalizedEvent>, BatchStats) {
        let mut stats = BatchStats {
            received: entries.len(),
            ..BatchStats::default()
        };
        let mut events = Vec::with_capacity(entries.len());

        for (index, entry) in entries.iter().enumerate() {
            let Some(object) = entry.as_object() else {
                stats.rejected += 1;
                debug!(index, kind = json_kind(entry), "Skipping non-object vessel entry");
                continue;
            };

            let record = RawVesselRecord::from_json_object(object);
            match self.normalizer.normalize(&record) {
                Some(event) => events.push(event),
                None => stats.skipped_no_mmsi += 1,
            }
        }

        stats.emitted = events.len();
        (events, stats)
    }
}

/// `detail` of the first error in the envelope.
fn first_error_detail(errors: &Value) -> String {
    let first = errors.as_array().and_then(|list| list.first());
    match first.and_then(|e| e.get("detail")) {
        Some(Value::String(detail)) => detail.clone(),
        Some(other) => other.to_string(),
        None => "unknown error".to_string(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
