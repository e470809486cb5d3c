//! Diagnostic stream from the request handlers to the control loop.
//!
//! Capacity is one message: a handler waits on `emit` while the consumer
//! is behind, so lines reach stdout in the order they were produced.

use tokio::sync::mpsc;

/// Producer side of the diagnostic stream.
#[derive(Debug, Clone)]
pub struct Diagnostics {
    tx: mpsc::Sender<String>,
}

/// Consumer side of the diagnostic stream.
#[derive(Debug)]
pub struct DiagnosticStream {
    rx: mpsc::Receiver<String>,
}

/// Create a connected producer/consumer pair.
pub fn diagnostic_channel() -> (Diagnostics, DiagnosticStream) {
    let (tx, rx) = mpsc::channel(1);
    (Diagnostics { tx }, DiagnosticStream { rx })
}

impl Diagnostics {
    /// Emit one diagnostic line, waiting for room in the stream.
    pub async fn emit(&self, line: impl Into<String>) {
        let line = line.into();
        if let Err(mpsc::error::SendError(line)) = self.tx.send(line).await {
            tracing::debug!(diagnostic = %line, "Diagnostic stream closed, dropping line");
        }
    }
}

impl DiagnosticStream {
    /// Next line, or `None` once every producer is gone.
    pub async fn recv(&mut self) -> Option<String> {
        self.rx.recv().await
    }

    /// Lines already queued, without waiting.
    pub fn drain_pending(&mut self) -> Vec<String> {
        let mut lines = Vec::new();
        while let Ok(line) = self.rx.try_recv() {
            lines.push(line);
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lines_arrive_in_order() {
        let (diagnostics, mut stream) = diagnostic_channel();
        let producer = tokio::spawn(async move {
            for i in 0..5 {
                diagnostics.emit(format!("line {i}")).await;
            }
        });

        let mut received = Vec::new();
        while let Some(line) = stream.recv().await {
            received.push(line);
        }
        producer.await.unwrap();

        assert_eq!(received, (0..5).map(|i| format!("line {i}")).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_drain_pending() {
        let (diagnostics, mut stream) = diagnostic_channel();
        diagnostics.emit("queued").await;
        assert_eq!(stream.drain_pending(), vec!["queued".to_string()]);
        assert!(stream.drain_pending().is_empty());
    }

    #[tokio::test]
    async fn test_emit_after_consumer_dropped() {
        let (diagnostics, stream) = diagnostic_channel();
        drop(stream);
        diagnostics.emit("nobody listening").await;
    }
}
