//! IRC -> Slack relay.
//!
//! The read loop hands formatted lines to a bounded queue drained by a single
//! forwarder task, so a slow webhook never stalls PING handling and order
//! within the IRC -> Slack direction is preserved.

use async_trait::async_trait;
use slirc_line::IrcEvent;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::warn;

use crate::metrics;

/// Queue depth between the IRC read loop and the Slack forwarder.
pub const RELAY_QUEUE_SIZE: usize = 256;

/// Destination for IRC traffic. Delivery is best-effort: implementations
/// log their own failures.
#[async_trait]
pub trait MessageSink: Send + Sync {
    async fn post(&self, text: &str);
}

/// Render an IRC event as Slack text.
///
/// Returns the metrics label and the text, or `None` for events that are not
/// relayed (PING, ignored lines, messages with no text).
pub fn format_for_slack(event: &IrcEvent<'_>) -> Option<(&'static str, String)> {
    match *event {
        IrcEvent::Message { nick, text } if !text.is_empty() => {
            Some(("message", format!("<{nick}> {text}")))
        }
        IrcEvent::Action { nick, text } if text.is_empty() => Some(("action", format!("_{nick}_"))),
        IrcEvent::Action { nick, text } => Some(("action", format!("_{nick} {text}_"))),
        IrcEvent::Join { nick } => Some(("join", format!("*{nick} has joined the channel*"))),
        IrcEvent::Part { nick } => Some(("part", format!("*{nick} has left the channel*"))),
        IrcEvent::Message { .. } | IrcEvent::Ping | IrcEvent::Ignored => None,
    }
}

/// Handle to the forwarder task.
///
/// Holds at most [`RELAY_QUEUE_SIZE`] lines waiting for Slack. When the queue
/// is full, [`forward`](Self::forward) drops the new line instead of waiting,
/// so delivery stays best-effort and the read loop never blocks.
#[derive(Clone)]
pub struct Relay {
    tx: mpsc::Sender<String>,
}

impl Relay {
    /// Spawn the forwarder draining into `sink`.
    pub fn spawn(sink: Arc<dyn MessageSink>) -> Self {
        let (tx, mut rx) = mpsc::channel::<String>(RELAY_QUEUE_SIZE);
        tokio::spawn(async move {
            while let Some(text) = rx.recv().await {
                sink.post(&text).await;
            }
        });
        Self { tx }
    }

    /// Queue `text` for Slack. Drops it when the queue is full.
    pub fn forward(&self, kind: &'static str, text: String) {
        match self.tx.try_send(text) {
            Ok(()) => metrics::record_to_slack(kind),
            Err(TrySendError::Full(_)) => {
                metrics::record_post_failure();
                warn!(kind = kind, "Slack relay queue full, dropping message");
            }
            Err(TrySendError::Closed(_)) => {
                warn!(kind = kind, "Slack forwarder stopped, dropping message");
            }
        }
    }
}
