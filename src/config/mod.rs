//! Bridge Configuration Module
//!
//! Provides the fetch-layer configuration loaded from TOML files: API key,
//! query timespan, optional single-vessel filter and per-tier polling
//! intervals. None of it changes how records are normalized.
//!
//! ## Loading Order
//!
//! 1. `MT_BRIDGE_CONFIG` environment variable (path to TOML file)
//! 2. `bridge_config.toml` in the current working directory
//! 3. Built-in defaults
//!
//! ## Usage
//!
//! ```ignore
//! // In main():
//! config::init(BridgeConfig::load());
//!
//! // Anywhere in the codebase:
//! let timespan = config::get().api.timespan_minutes;
//! ```

mod bridge_config;
pub mod defaults;
pub mod validation;

pub use bridge_config::*;

use std::sync::OnceLock;

/// Global bridge configuration, initialized once at startup.
static BRIDGE_CONFIG: OnceLock<BridgeConfig> = OnceLock::new();

/// Initialize the global bridge configuration.
///
/// Later calls are ignored with a warning.
pub fn init(config: BridgeConfig) {
    if BRIDGE_CONFIG.set(config).is_err() {
        tracing::warn!("config::init() called more than once, ignoring");
    }
}

/// Get a reference to the global bridge configuration.
///
/// Panics if `init()` has not been called. A missing config is a fatal
/// startup error, not a recoverable condition.
pub fn get() -> &'static BridgeConfig {
    BRIDGE_CONFIG
        .get()
        .expect("config::get() called before config::init()")
}

/// Check whether the config has been initialized.
pub fn is_initialized() -> bool {
    BRIDGE_CONFIG.get().is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    // The only test in this crate that touches the global
    #[test]
    fn test_init_then_get() {
        let mut config = BridgeConfig::default();
        config.api.timespan_minutes = 7;

        init(config);
        assert!(is_initialized());
        assert_eq!(get().api.timespan_minutes, 7);

        // Second init is ignored
        init(BridgeConfig::default());
        assert_eq!(get().api.timespan_minutes, 7);
    }
}
