//! Incoming-webhook poster.
//!
//! Delivery is best-effort: one attempt, failures are logged and counted,
//! nothing is queued or retried.

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{SlackError, SlackResult};
use crate::irc::relay::MessageSink;
use crate::metrics;

#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    text: &'a str,
}

/// Posts text to a Slack incoming webhook.
pub struct SlackPoster {
    client: reqwest::Client,
    webhook_url: String,
}

impl SlackPoster {
    pub fn new(client: reqwest::Client, webhook_url: impl Into<String>) -> Self {
        Self {
            client,
            webhook_url: webhook_url.into(),
        }
    }

    /// Single delivery attempt, surfacing the failure.
    pub async fn try_post(&self, text: &str) -> SlackResult<()> {
        let response = self
            .client
            .post(&self.webhook_url)
            .json(&WebhookPayload { text })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SlackError::Status(status));
        }
        Ok(())
    }
}

#[async_trait]
impl MessageSink for SlackPoster {
    async fn post(&self, text: &str) {
        match self.try_post(text).await {
            Ok(()) => debug!(len = text.len(), "Posted to Slack"),
            Err(e) => {
                metrics::record_post_failure();
                warn!(error = %e, "Dropping message for Slack");
            }
        }
    }
}
