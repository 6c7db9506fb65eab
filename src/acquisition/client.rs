//! MarineTraffic export API client
//!
//! Fetches raw export batches. The body is returned untouched; turning it
//! into events is the translator's job.
//!
//! Endpoints:
//! - fleet (PS06): `exportvessels/v:8/{key}/timespan:{t}/msgtype:{tier}/protocol:jsono`
//! - single vessel (PS07): `exportvessel/v:5/{key}/timespan:{t}/mmsi:{mmsi}/msgtype:{tier}/protocol:jsono`

use std::time::Duration;

use crate::config::{defaults, ApiConfig};

/// API client errors
#[derive(Debug, thiserror::Error)]
pub enum ApiClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Server returned status {0}")]
    Status(reqwest::StatusCode),
    #[error("API key is not configured")]
    MissingKey,
}

/// Response detail level. Richer tiers cost more API credits, so they are
/// polled less often.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryTier {
    /// Position, speed, course, heading, status
    Simple,
    /// Simple plus name, type, dimensions, voyage
    Extended,
    /// Extended plus last/next port details
    Full,
}

impl QueryTier {
    pub const ALL: [QueryTier; 3] = [QueryTier::Simple, QueryTier::Extended, QueryTier::Full];

    /// `msgtype` path segment value.
    pub fn msgtype(self) -> &'static str {
        match self {
            QueryTier::Simple => "simple",
            QueryTier::Extended => "extended",
            QueryTier::Full => "full",
        }
    }
}

impl std::fmt::Display for QueryTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.msgtype())
    }
}

/// HTTP client for the export endpoints
#[derive(Clone)]
pub struct MarineTrafficClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    timespan_minutes: u32,
    mmsi: Option<u64>,
}

impl MarineTrafficClient {
    /// Create a client from the API section of the config.
    pub fn new(api: &ApiConfig) -> Result<Self, ApiClientError> {
        if api.key.trim().is_empty() {
            return Err(ApiClientError::MissingKey);
        }
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(api.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: api.base_url.trim_end_matches('/').to_string(),
            api_key: api.key.trim().to_string(),
            timespan_minutes: api.timespan_minutes,
            mmsi: api.mmsi,
        })
    }

    /// Export URL for a tier. Contains the API key; never log it.
    pub fn export_url(&self, tier: QueryTier) -> String {
        match self.mmsi {
            Some(mmsi) => format!(
                "{}/exportvessel/v:5/{}/timespan:{}/mmsi:{}/msgtype:{}/protocol:{}",
                self.base_url,
                self.api_key,
                self.timespan_minutes,
                mmsi,
                tier.msgtype(),
                defaults::API_PROTOCOL
            ),
            None => format!(
                "{}/exportvessels/v:8/{}/timespan:{}/msgtype:{}/protocol:{}",
                self.base_url,
                self.api_key,
                self.timespan_minutes,
                tier.msgtype(),
                defaults::API_PROTOCOL
            ),
        }
    }

    /// Fetch one raw export batch.
    ///
    /// MarineTraffic answers API-level failures (bad key, no credits) with a
    /// 200 and an error envelope, which passes through here as a payload.
    pub async fn fetch(&self, tier: QueryTier) -> Result<String, ApiClientError> {
        // reqwest errors carry the request URL, which embeds the key
        let resp = self
            .http
            .get(self.export_url(tier))
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ApiClientError::Status(status));
        }
        resp.text()
            .await
            .map_err(|e| ApiClientError::Http(e.without_url()))
    }
}

impl std::fmt::Debug for MarineTrafficClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarineTrafficClient")
            .field("base_url", &self.base_url)
            .field("timespan_minutes", &self.timespan_minutes)
            .field("mmsi", &self.mmsi)
            .finish_non_exhaustive()
    }
}
