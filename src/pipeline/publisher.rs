//! Event publisher
//!
//! Drains normalized events from the processing loops and writes each as a
//! Signal K delta, one JSON document per line, in the order received.

use anyhow::{Context, Result};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::types::NormalizedEvent;

/// Writes deltas to any async writer (stdout in the binary).
pub struct Publisher<W> {
    writer: W,
    pretty: bool,
    published: u64,
}

impl<W> Publisher<W>
where
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            pretty: false,
            published: 0,
        }
    }

    /// Pretty-print each delta.
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Write one event.
    pub async fn publish(&mut self, event: &NormalizedEvent) -> Result<()> {
        let delta = event.to_delta();
        let mut line = if self.pretty {
            serde_json::to_string_pretty(&delta)?
        } else {
            serde_json::to_string(&delta)?
        };
        line.push('\n');
        self.writer
            .write_all(line.as_bytes())
            .await
            .context("Failed to write delta")?;
        self.published += 1;
        Ok(())
    }

    /// Publish until every sender is gone. Returns the number of deltas written.
    pub async fn run(mut self, mut events: mpsc::Receiver<NormalizedEvent>) -> Result<u64> {
        info!("[Publisher] Task starting");
        while let Some(event) = events.recv().await {
            self.publish(&event).await?;
            // Flush per event so downstream readers see deltas immediately
            self.writer.flush().await?;
            debug!(context = %event.context, "Published delta");
        }
        self.writer.flush().await?;
        info!(published = self.published, "[Publisher] Event channel closed");
        Ok(self.published)
    }

    pub fn published(&self) -> u64 {
        self.published
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{vessel_context, NormalizedValue, PathValue};

    fn event(mmsi: &str) -> NormalizedEvent {
        NormalizedEvent {
            context: vessel_context(mmsi),
            timestamp: "2017-05-19T09:39:57Z".to_string(),
            source_label: "marinetraffic-TER".to_string(),
            values: vec![PathValue {
                path: "navigation.state".to_string(),
                value: NormalizedValue::Text("moored".to_string()),
            }],
        }
    }

    #[tokio::test]
    async fn test_run_writes_lines_in_order() {
        let (tx, rx) = mpsc::channel(8);
        tx.send(event("111")).await.unwrap();
        tx.send(event("222")).await.unwrap();
        drop(tx);

        let mut out: Vec<u8> = Vec::new();
        let count = Publisher::new(&mut out).run(rx).await.unwrap();
        assert_eq!(count, 2);

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<serde_json::Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["context"], "vessels.urn:mrn:imo:mmsi:111");
        assert_eq!(lines[1]["context"], "vessels.urn:mrn:imo:mmsi:222");
        assert_eq!(lines[0]["updates"][0]["values"][0]["value"], "moored");
    }

    #[tokio::test]
    async fn test_pretty_output_spans_lines() {
        let mut publisher = Publisher::new(Vec::new()).pretty(true);
        publisher.publish(&event("111")).await.unwrap();
        assert_eq!(publisher.published(), 1);
        let text = String::from_utf8(publisher.into_inner()).unwrap();
        assert!(text.lines().count() > 1);
    }
}
