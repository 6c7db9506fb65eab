//! Bridge Configuration - fetch-layer settings as operator-tunable TOML values
//!
//! Each struct implements `Default` with the values in [`super::defaults`],
//! so the bridge runs with no config file at all (file and stdin modes need
//! no API key).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

use super::defaults;
use crate::acquisition::QueryTier;

/// Environment variable pointing at the config file.
pub const CONFIG_ENV_VAR: &str = "MT_BRIDGE_CONFIG";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "bridge_config.toml";

/// Largest valid MMSI (nine digits).
const MAX_MMSI: u64 = 999_999_999;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for a bridge deployment.
///
/// Load with `BridgeConfig::load()` which searches:
/// 1. `$MT_BRIDGE_CONFIG` env var
/// 2. `./bridge_config.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// MarineTraffic API access
    #[serde(default)]
    pub api: ApiConfig,

    /// Per-tier polling cadence
    #[serde(default)]
    pub polling: PollingConfig,

    /// Event output formatting
    #[serde(default)]
    pub output: OutputConfig,
}

impl BridgeConfig {
    /// Load configuration using the standard search order.
    pub fn load() -> Self {
        // 1. Check env var
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded bridge config from {}", CONFIG_ENV_VAR);
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from {}, falling back", CONFIG_ENV_VAR);
                    }
                }
            } else {
                warn!(path = %path, "{} points to non-existent file, falling back", CONFIG_ENV_VAR);
            }
        }

        // 2. Check ./bridge_config.toml
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded bridge config from ./{}", LOCAL_CONFIG_FILE);
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./{}, using defaults", LOCAL_CONFIG_FILE);
                }
            }
        }

        // 3. Defaults
        info!("No {} found, using built-in defaults", LOCAL_CONFIG_FILE);
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_toml_str(&contents).map_err(|e| match e {
            ConfigError::Parse(_, inner) => ConfigError::Parse(path.to_path_buf(), inner),
            other => other,
        })
    }

    /// Parse and validate a TOML document.
    ///
    /// Unknown keys are reported as warnings, never as errors.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        for w in super::validation::validate_unknown_keys(contents) {
            warn!("{}", w);
        }

        let config: Self =
            toml::from_str(contents).map_err(|e| ConfigError::Parse(PathBuf::new(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the current config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Validate settings that apply in every mode.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors: Vec<String> = Vec::new();
        let api = &self.api;

        if api.timespan_minutes == 0 {
            errors.push("api.timespan_minutes must be > 0".to_string());
        }
        if api.request_timeout_secs == 0 {
            errors.push("api.request_timeout_secs must be > 0".to_string());
        }
        if !(api.base_url.starts_with("http://") || api.base_url.starts_with("https://")) {
            errors.push(format!(
                "api.base_url must be an http(s) URL, got '{}'",
                api.base_url
            ));
        }
        if let Some(mmsi) = api.mmsi {
            if mmsi == 0 || mmsi > MAX_MMSI {
                errors.push(format!("api.mmsi = {mmsi} is not a nine-digit MMSI"));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Extra checks before polling the live API.
    pub fn validate_for_polling(&self) -> Result<(), ConfigError> {
        let mut errors: Vec<String> = Vec::new();

        if let Err(ConfigError::Validation(base)) = self.validate() {
            errors.extend(base);
        }
        if self.api.key.trim().is_empty() {
            errors.push("api.key is required to poll the MarineTraffic API".to_string());
        }
        if self.polling.enabled_tiers().is_empty() {
            errors.push("polling: at least one tier interval must be > 0".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(PathBuf, std::io::Error),
    Parse(PathBuf, toml::de::Error),
    Serialize(toml::ser::Error),
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(path, e) => write!(f, "Config I/O error ({}): {}", path.display(), e),
            ConfigError::Parse(path, e) => {
                write!(f, "Config parse error ({}): {}", path.display(), e)
            }
            ConfigError::Serialize(e) => write!(f, "Config serialization error: {}", e),
            ConfigError::Validation(errors) => {
                writeln!(f, "Config validation failed:")?;
                for e in errors {
                    writeln!(f, "  - {}", e)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// API
// ============================================================================

/// MarineTraffic API access settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API key, sent as a URL path segment
    #[serde(default)]
    pub key: String,

    /// Web services base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Only return positions received within this many minutes
    #[serde(default = "default_timespan")]
    pub timespan_minutes: u32,

    /// Track a single vessel instead of the whole fleet
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mmsi: Option<u64>,

    /// HTTP request timeout (seconds)
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    defaults::API_BASE_URL.to_string()
}
fn default_timespan() -> u32 {
    defaults::API_TIMESPAN_MINUTES
}
fn default_request_timeout() -> u64 {
    defaults::API_REQUEST_TIMEOUT_SECS
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            key: String::new(),
            base_url: default_base_url(),
            timespan_minutes: default_timespan(),
            mmsi: None,
            request_timeout_secs: default_request_timeout(),
        }
    }
}

// The key must not end up in logs.
impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("key", &if self.key.is_empty() { "<unset>" } else { "<redacted>" })
            .field("base_url", &self.base_url)
            .field("timespan_minutes", &self.timespan_minutes)
            .field("mmsi", &self.mmsi)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

// ============================================================================
// Polling
// ============================================================================

/// Interval per query tier. 0 disables the tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_simple_interval")]
    pub simple_interval_secs: u64,

    #[serde(default = "default_extended_interval")]
    pub extended_interval_secs: u64,

    #[serde(default = "default_full_interval")]
    pub full_interval_secs: u64,

    /// Random jitter added to each interval (seconds)
    #[serde(default = "default_jitter")]
    pub jitter_secs: u64,
}

fn default_simple_interval() -> u64 {
    defaults::SIMPLE_POLL_INTERVAL_SECS
}
fn default_extended_interval() -> u64 {
    defaults::EXTENDED_POLL_INTERVAL_SECS
}
fn default_full_interval() -> u64 {
    defaults::FULL_POLL_INTERVAL_SECS
}
fn default_jitter() -> u64 {
    defaults::POLL_JITTER_SECS
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            simple_interval_secs: default_simple_interval(),
            extended_interval_secs: default_extended_interval(),
            full_interval_secs: default_full_interval(),
            jitter_secs: default_jitter(),
        }
    }
}

impl PollingConfig {
    /// Poll interval of a tier, `None` when the tier is disabled.
    pub fn interval(&self, tier: QueryTier) -> Option<Duration> {
        let secs = match tier {
            QueryTier::Simple => self.simple_interval_secs,
            QueryTier::Extended => self.extended_interval_secs,
            QueryTier::Full => self.full_interval_secs,
        };
        (secs > 0).then(|| Duration::from_secs(secs))
    }

    /// Tiers with a non-zero interval, cheapest first.
    pub fn enabled_tiers(&self) -> Vec<QueryTier> {
        QueryTier::ALL
            .into_iter()
            .filter(|tier| self.interval(*tier).is_some())
            .collect()
    }
}

// ============================================================================
// Output
// ============================================================================

/// Publisher output settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Pretty-print each delta instead of one compact JSON line
    #[serde(default)]
    pub pretty: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = BridgeConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.api.base_url, defaults::API_BASE_URL);
        assert_eq!(
            config.polling.enabled_tiers(),
            vec![QueryTier::Simple, QueryTier::Extended]
        );
    }

    #[test]
    fn test_defaults_cannot_poll_without_key() {
        let err = BridgeConfig::default().validate_for_polling().unwrap_err();
        assert!(err.to_string().contains("api.key"));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = BridgeConfig::from_toml_str(
            r#"
[api]
key = "abc123"
mmsi = 304010417

[polling]
full_interval_secs = 3600
"#,
        )
        .unwrap();
        assert_eq!(config.api.mmsi, Some(304010417));
        assert_eq!(config.api.timespan_minutes, defaults::API_TIMESPAN_MINUTES);
        assert_eq!(config.polling.interval(QueryTier::Full), Some(Duration::from_secs(3600)));
        assert!(config.validate_for_polling().is_ok());
    }

    #[test]
    fn test_validation_collects_all_errors() {
        let mut config = BridgeConfig::default();
        config.api.timespan_minutes = 0;
        config.api.base_url = "ftp://example".to_string();
        config.api.mmsi = Some(1_000_000_000);

        match config.validate() {
            Err(ConfigError::Validation(errors)) => assert_eq!(errors.len(), 3),
            other => panic!("expected validation errors, got {other:?}"),
        }
    }

    #[test]
    fn test_all_tiers_disabled() {
        let mut config = BridgeConfig::default();
        config.api.key = "k".to_string();
        config.polling.simple_interval_secs = 0;
        config.polling.extended_interval_secs = 0;
        let err = config.validate_for_polling().unwrap_err();
        assert!(err.to_string().contains("at least one tier"));
    }

    #[test]
    fn test_debug_redacts_key() {
        let mut api = ApiConfig::default();
        api.key = "super-secret".to_string();
        let rendered = format!("{api:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_toml_round_trip_keeps_values() {
        let mut config = BridgeConfig::default();
        config.api.timespan_minutes = 60;
        config.output.pretty = true;
        let text = config.to_toml().unwrap();
        let back = BridgeConfig::from_toml_str(&text).unwrap();
        assert_eq!(back.api.timespan_minutes, 60);
        assert!(back.output.pretty);
    }
}
