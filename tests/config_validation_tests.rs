//! Config Validation Tests
//!
//! Loading, typo detection and polling readiness for `bridge_config.toml`,
//! exercised through the public config API.

use std::io::Write;
use std::time::Duration;

use marinetraffic_bridge::acquisition::{MarineTrafficClient, QueryTier};
use marinetraffic_bridge::config::validation::validate_unknown_keys;
use marinetraffic_bridge::config::{BridgeConfig, ConfigError};

// ============================================================================
// Typo Detection
// ============================================================================

#[test]
fn typo_in_api_section_warns_with_suggestion() {
    let toml_str = r#"
[api]
timespan_minuts = 10
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].field.contains("timespan_minuts"));
    assert_eq!(warnings[0].suggestion.as_deref(), Some("api.timespan_minutes"));
}

#[test]
fn valid_config_produces_zero_warnings() {
    let toml_str = r#"
[api]
key = "abc123"
timespan_minutes = 10

[polling]
simple_interval_secs = 60
extended_interval_secs = 0

[output]
pretty = true
"#;
    assert!(validate_unknown_keys(toml_str).is_empty());
}

// ============================================================================
// Loading
// ============================================================================

#[test]
fn load_from_file_reads_all_sections() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[api]
key = "abc123"
timespan_minutes = 5
mmsi = 304010417

[polling]
simple_interval_secs = 60
extended_interval_secs = 0
full_interval_secs = 3600
jitter_secs = 0
"#
    )
    .unwrap();

    let config = BridgeConfig::load_from_file(file.path()).unwrap();
    assert_eq!(config.api.key, "abc123");
    assert_eq!(config.api.timespan_minutes, 5);
    assert_eq!(config.api.mmsi, Some(304_010_417));
    assert!(!config.output.pretty);

    assert_eq!(
        config.polling.enabled_tiers(),
        vec![QueryTier::Simple, QueryTier::Full]
    );
    assert_eq!(
        config.polling.interval(QueryTier::Full),
        Some(Duration::from_secs(3600))
    );
    assert_eq!(config.polling.interval(QueryTier::Extended), None);
    assert!(config.validate_for_polling().is_ok());
}

#[test]
fn load_from_missing_file_is_io_error() {
    let err = BridgeConfig::load_from_file(std::path::Path::new("/nonexistent/bridge.toml"))
        .unwrap_err();
    assert!(matches!(err, ConfigError::Io(..)));
}

#[test]
fn invalid_values_are_collected() {
    let err = BridgeConfig::from_toml_str(
        r#"
[api]
timespan_minutes = 0
base_url = "ftp://example.com"
"#,
    )
    .unwrap_err();
    match err {
        ConfigError::Validation(errors) => assert_eq!(errors.len(), 2),
        other => panic!("expected validation error, got {other}"),
    }
}

#[test]
fn polling_requires_a_key() {
    let config = BridgeConfig::default();
    assert!(config.validate().is_ok());
    match config.validate_for_polling() {
        Err(ConfigError::Validation(errors)) => {
            assert!(errors.iter().any(|e| e.contains("api.key")));
        }
        other => panic!("expected missing key, got {other:?}"),
    }
}

// ============================================================================
// Client wiring
// ============================================================================

#[test]
fn client_urls_follow_config() {
    let mut config = BridgeConfig::from_toml_str(
        r#"
[api]
key = "abc123"
base_url = "https://example.com/api/"
timespan_minutes = 20
"#,
    )
    .unwrap();

    let client = MarineTrafficClient::new(&config.api).unwrap();
    assert_eq!(
        client.export_url(QueryTier::Simple),
        "https://example.com/api/exportvessels/v:8/abc123/timespan:20/msgtype:simple/protocol:jsono"
    );
    assert!(!format!("{client:?}").contains("abc123"));

    config.api.mmsi = Some(304_010_417);
    let client = MarineTrafficClient::new(&config.api).unwrap();
    assert_eq!(
        client.export_url(QueryTier::Extended),
        "https://example.com/api/exportvessel/v:5/abc123/timespan:20/mmsi:304010417/msgtype:extended/protocol:jsono"
    );
}
