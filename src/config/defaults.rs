//! System-wide default constants.
//!
//! Centralises magic numbers for the fetch layer and publisher.
//! Grouped by subsystem for easy discovery.

// ============================================================================
// MarineTraffic API
// ============================================================================

/// Base URL of the MarineTraffic web services.
pub const API_BASE_URL: &str = "https://services.marinetraffic.com/api";

/// Default query timespan (minutes). Positions older than this are not returned.
pub const API_TIMESPAN_MINUTES: u32 = 20;

/// HTTP request timeout for export calls (seconds).
pub const API_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Protocol segment selecting the JSON-object response format.
pub const API_PROTOCOL: &str = "jsono";

// ============================================================================
// Polling tiers
// ============================================================================

/// Simple tier (positions only) interval (seconds).
pub const SIMPLE_POLL_INTERVAL_SECS: u64 = 120;

/// Extended tier (positions + voyage + dimensions) interval (seconds).
pub const EXTENDED_POLL_INTERVAL_SECS: u64 = 600;

/// Full tier interval (seconds). 0 = disabled by default.
pub const FULL_POLL_INTERVAL_SECS: u64 = 0;

/// Random jitter added to every poll interval (seconds).
pub const POLL_JITTER_SECS: u64 = 5;

/// Cap on the exponential backoff exponent after failed fetches.
///
/// 2^5 = 32x the base retry delay.
pub const POLL_MAX_BACKOFF_EXPONENT: u32 = 5;

/// Base retry delay after a failed fetch (seconds).
pub const POLL_RETRY_BASE_SECS: u64 = 5;

/// Upper bound on any retry delay (seconds).
pub const POLL_MAX_RETRY_DELAY_SECS: u64 = 600;

// ============================================================================
// Publisher
// ============================================================================

/// Capacity of the event channel between processing loops and the publisher.
pub const EVENT_CHANNEL_CAPACITY: usize = 1_024;
