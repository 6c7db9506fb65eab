//! Batch source abstraction for MarineTraffic payloads.
//!
//! Provides a unified trait for reading raw export batches from different
//! sources: a saved payload file, newline-delimited payloads on stdin, and
//! the live export API polled at a tier's cadence.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, warn};

use crate::acquisition::{MarineTrafficClient, QueryTier};
use crate::config::defaults::{
    POLL_MAX_BACKOFF_EXPONENT, POLL_MAX_RETRY_DELAY_SECS, POLL_RETRY_BASE_SECS,
};

/// Events produced by a batch source.
#[derive(Debug, PartialEq, Eq)]
pub enum BatchEvent {
    /// A raw payload was read.
    Batch(String),
    /// Source reached end of data.
    Eof,
}

/// Trait abstracting where raw payloads come from.
///
/// The processing loop calls [`next_batch`](BatchSource::next_batch) in a
/// `select!` with cancellation, so implementations may wait freely.
#[async_trait]
pub trait BatchSource: Send + 'static {
    /// Read the next payload from the source.
    ///
    /// Returns `BatchEvent::Eof` when no more data is available.
    async fn next_batch(&mut self) -> Result<BatchEvent>;

    /// Human-readable name for logging (e.g. "file", "stdin", "api-simple").
    fn source_name(&self) -> &str;
}

// ============================================================================
// File Source (one saved payload)
// ============================================================================

/// Reads one payload from a file, then ends.
pub struct FileSource {
    path: PathBuf,
    done: bool,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            done: false,
        }
    }
}

#[async_trait]
impl BatchSource for FileSource {
    async fn next_batch(&mut self) -> Result<BatchEvent> {
        if self.done {
            return Ok(BatchEvent::Eof);
        }
        self.done = true;
        let payload = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read payload file {}", self.path.display()))?;
        Ok(BatchEvent::Batch(payload))
    }

    fn source_name(&self) -> &str {
        "file"
    }
}

// ============================================================================
// Line Source (one payload per line, e.g. stdin)
// ============================================================================

/// Reads one payload per non-empty line.
pub struct LineSource<R> {
    reader: R,
    line_buffer: String,
    name: &'static str,
}

/// Payloads piped on stdin: `curl ... | marinetraffic-bridge --stdin`
pub type StdinSource = LineSource<BufReader<tokio::io::Stdin>>;

impl StdinSource {
    pub fn stdin() -> Self {
        LineSource::new(BufReader::new(tokio::io::stdin()), "stdin")
    }
}

impl<R> LineSource<R>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    pub fn new(reader: R, name: &'static str) -> Self {
        Self {
            reader,
            line_buffer: String::with_capacity(16 * 1024),
            name,
        }
    }
}

#[async_trait]
impl<R> BatchSource for LineSource<R>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    async fn next_batch(&mut self) -> Result<BatchEvent> {
        loop {
            self.line_buffer.clear();
            let bytes = self.reader.read_line(&mut self.line_buffer).await?;
            if bytes == 0 {
                return Ok(BatchEvent::Eof);
            }
            let line = self.line_buffer.trim();
            if !line.is_empty() {
                return Ok(BatchEvent::Batch(line.to_string()));
            }
        }
    }

    fn source_name(&self) -> &str {
        self.name
    }
}

// ============================================================================
// API Source (live export endpoint, one tier)
// ============================================================================

/// Polls the export API for one query tier.
///
/// The first fetch happens immediately; afterwards each fetch waits the
/// tier interval plus random jitter. Failed fetches are retried with
/// exponential backoff and never end the source.
pub struct ApiSource {
    client: MarineTrafficClient,
    tier: QueryTier,
    interval: Duration,
    jitter_secs: u64,
    name: String,
    fetched_once: bool,
    consecutive_failures: u32,
}

impl ApiSource {
    pub fn new(client: MarineTrafficClient, tier: QueryTier, interval: Duration, jitter_secs: u64) -> Self {
        Self {
            client,
            tier,
            interval,
            jitter_secs,
            name: format!("api-{tier}"),
            fetched_once: false,
            consecutive_failures: 0,
        }
    }

    fn jitter(&self) -> Duration {
        if self.jitter_secs == 0 {
            return Duration::ZERO;
        }
        use rand::Rng;
        Duration::from_secs(rand::thread_rng().gen_range(0..self.jitter_secs))
    }
}

/// Delay before the next attempt after `failures` consecutive failed fetches.
pub fn retry_delay(failures: u32) -> Duration {
    let backoff = 1u64 << failures.saturating_sub(1).min(POLL_MAX_BACKOFF_EXPONENT);
    Duration::from_secs(
        POLL_RETRY_BASE_SECS
            .saturating_mul(backoff)
            .min(POLL_MAX_RETRY_DELAY_SECS),
    )
}

#[async_trait]
impl BatchSource for ApiSource {
    async fn next_batch(&mut self) -> Result<BatchEvent> {
        if self.fetched_once {
            tokio::time::sleep(self.interval + self.jitter()).await;
        }

        loop {
            match self.client.fetch(self.tier).await {
                Ok(payload) => {
                    self.fetched_once = true;
                    self.consecutive_failures = 0;
                    debug!(tier = %self.tier, bytes = payload.len(), "Fetched export batch");
                    return Ok(BatchEvent::Batch(payload));
                }
                Err(e) => {
                    self.consecutive_failures = self.consecutive_failures.saturating_add(1);
                    let delay = retry_delay(self.consecutive_failures) + self.jitter();
                    warn!(
                        tier = %self.tier,
                        error = %e,
                        consecutive_failures = self.consecutive_failures,
                        next_retry_secs = delay.as_secs(),
                        "Export fetch failed, backing off"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    fn source_name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_line_source_skips_blank_lines() {
        let input: &'static [u8] = b"[{\"MMSI\":\"1\"}]\n\n   \n{\"errors\":[]}\n";
        let mut source = LineSource::new(BufReader::new(input), "test");

        assert_eq!(
            source.next_batch().await.unwrap(),
            BatchEvent::Batch("[{\"MMSI\":\"1\"}]".to_string())
        );
        assert_eq!(
            source.next_batch().await.unwrap(),
            BatchEvent::Batch("{\"errors\":[]}".to_string())
        );
        assert_eq!(source.next_batch().await.unwrap(), BatchEvent::Eof);
        assert_eq!(source.source_name(), "test");
    }

    #[tokio::test]
    async fn test_line_source_joins_split_reads() {
        // One payload delivered across two reads, as a pipe may do
        let mock = tokio_test::io::Builder::new()
            .read(b"[{\"MMSI\":")
            .read(b"\"2\"}]\n")
            .build();
        let mut source = LineSource::new(BufReader::new(mock), "pipe");

        let first = tokio_test::assert_ok!(source.next_batch().await);
        assert_eq!(first, BatchEvent::Batch("[{\"MMSI\":\"2\"}]".to_string()));
        assert_eq!(source.next_batch().await.unwrap(), BatchEvent::Eof);
    }

    #[tokio::test]
    async fn test_file_source_yields_once() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[]").unwrap();

        let mut source = FileSource::new(file.path());
        assert_eq!(source.next_batch().await.unwrap(), BatchEvent::Batch("[]".to_string()));
        assert_eq!(source.next_batch().await.unwrap(), BatchEvent::Eof);
    }

    #[tokio::test]
    async fn test_file_source_missing_file_errors() {
        let mut source = FileSource::new("/nonexistent/batch.json");
        assert!(source.next_batch().await.is_err());
    }

    #[test]
    fn test_retry_delay_doubles_and_caps() {
        assert_eq!(retry_delay(1), Duration::from_secs(POLL_RETRY_BASE_SECS));
        assert_eq!(retry_delay(2), Duration::from_secs(POLL_RETRY_BASE_SECS * 2));
        assert_eq!(retry_delay(3), Duration::from_secs(POLL_RETRY_BASE_SECS * 4));
        let capped = retry_delay(50);
        assert!(capped <= Duration::from_secs(POLL_MAX_RETRY_DELAY_SECS));
        assert_eq!(capped, retry_delay(60));
    }
}
