//! Unified batch processing loop shared across all input modes.
//!
//! One loop per source: read a payload, translate it, forward the events
//! to the publisher channel in translation order.

use serde::Serialize;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::source::{BatchEvent, BatchSource};
use crate::acquisition::{BatchOutcome, Translator};
use crate::types::NormalizedEvent;

/// Counters for one processing loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoopStats {
    /// Payloads read from the source
    pub batches: u64,
    /// Events forwarded to the publisher
    pub events: u64,
    /// Payloads answered with an API error envelope
    pub api_errors: u64,
    /// Payloads that could not be translated
    pub failed_batches: u64,
}

/// Why a processing loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    /// Source reached end of data
    Eof,
    /// Cancellation token fired
    Cancelled,
    /// Publisher side of the channel is gone
    PublisherClosed,
    /// Source returned an unrecoverable error
    SourceError,
}

/// Owns what one source needs: translator, output channel, cancellation.
pub struct ProcessingLoop {
    translator: Translator,
    events: mpsc::Sender<NormalizedEvent>,
    cancel_token: CancellationToken,
}

impl ProcessingLoop {
    pub fn new(
        translator: Translator,
        events: mpsc::Sender<NormalizedEvent>,
        cancel_token: CancellationToken,
    ) -> Self {
        Self {
            translator,
            events,
            cancel_token,
        }
    }

    /// Run until the source is exhausted, fails, or cancellation.
    pub async fn run<S: BatchSource>(self, source: &mut S) -> (LoopStats, LoopExit) {
        let mut stats = LoopStats::default();
        let name = source.source_name().to_string();
        info!(source = %name, "Processing MarineTraffic batches");

        let exit = loop {
            let event = tokio::select! {
                _ = self.cancel_token.cancelled() => {
                    info!(source = %name, "Shutdown signal received");
                    break LoopExit::Cancelled;
                }
                result = source.next_batch() => match result {
                    Ok(ev) => ev,
                    Err(e) => {
                        warn!(source = %name, error = %e, "Source error");
                        break LoopExit::SourceError;
                    }
                }
            };

            let payload = match event {
                BatchEvent::Batch(payload) => payload,
                BatchEvent::Eof => {
                    info!(source = %name, batches = stats.batches, "Source reached end");
                    break LoopExit::Eof;
                }
            };
            stats.batches += 1;

            let events = match self.translator.translate_batch(&payload) {
                Ok(BatchOutcome::Events { events, .. }) => events,
                Ok(BatchOutcome::ApiError { .. }) => {
                    stats.api_errors += 1;
                    continue;
                }
                Err(e) => {
                    stats.failed_batches += 1;
                    warn!(source = %name, error = %e, "Dropping untranslatable batch");
                    continue;
                }
            };

            let count = events.len();
            if !self.forward(events).await {
                warn!(source = %name, "Publisher closed, stopping");
                break LoopExit::PublisherClosed;
            }
            stats.events += count as u64;
            debug!(source = %name, events = count, "Batch forwarded");
        };

        info!(
            source = %name,
            batches = stats.batches,
            events = stats.events,
            api_errors = stats.api_errors,
            failed_batches = stats.failed_batches,
            "Processing loop finished"
        );
        (stats, exit)
    }

    /// Send a batch in order. False once the receiver is gone.
    async fn forward(&self, events: Vec<NormalizedEvent>) -> bool {
        for event in events {
            if self.events.send(event).await.is_err() {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::source::LineSource;
    use tokio::io::BufReader;

    const BATCHES: &[u8] = b"[{\"MMSI\":\"111\"},{\"MMSI\":\"222\"}]\n\
{\"errors\":[{\"detail\":\"ABOVE SERVICE CALL LIMIT\"}]}\n\
not json\n\
[{\"MMSI\":\"333\"}]\n";

    #[tokio::test]
    async fn test_loop_forwards_in_order_and_survives_bad_batches() {
        let (tx, mut rx) = mpsc::channel(16);
        let mut source = LineSource::new(BufReader::new(BATCHES), "test");
        let processing = ProcessingLoop::new(Translator::default(), tx, CancellationToken::new());

        let (stats, exit) = processing.run(&mut source).await;
        assert_eq!(exit, LoopExit::Eof);
        assert_eq!(
            stats,
            LoopStats { batches: 4, events: 3, api_errors: 1, failed_batches: 1 }
        );

        let mut contexts = Vec::new();
        while let Some(event) = rx.recv().await {
            contexts.push(event.context);
        }
        assert_eq!(
            contexts,
            vec![
                "vessels.urn:mrn:imo:mmsi:111",
                "vessels.urn:mrn:imo:mmsi:222",
                "vessels.urn:mrn:imo:mmsi:333",
            ]
        );
    }

    #[tokio::test]
    async fn test_loop_stops_on_cancel() {
        let (tx, _rx) = mpsc::channel(16);
        let token = CancellationToken::new();
        token.cancel();

        // A source that never yields
        let (_keep_open, reader) = tokio::io::duplex(64);
        let mut source = LineSource::new(BufReader::new(reader), "pending");
        let (stats, exit) = ProcessingLoop::new(Translator::default(), tx, token)
            .run(&mut source)
            .await;
        assert_eq!(exit, LoopExit::Cancelled);
        assert_eq!(stats.batches, 0);
    }

    #[tokio::test]
    async fn test_loop_stops_when_publisher_gone() {
        let (tx, rx) = mpsc::channel(16);
        drop(rx);
        let mut source = LineSource::new(BufReader::new(BATCHES), "test");
        let (_, exit) = ProcessingLoop::new(Translator::default(), tx, CancellationToken::new())
            .run(&mut source)
            .await;
        assert_eq!(exit, LoopExit::PublisherClosed);
    }
}
