//! Slack Events API payloads and the relay filter.

use serde::Deserialize;
use std::collections::HashSet;

use crate::config::SlackConfig;

/// Envelope type Slack sends once when the request URL is registered.
pub const URL_VERIFICATION: &str = "url_verification";
/// Envelope type wrapping every subscribed event.
pub const EVENT_CALLBACK: &str = "event_callback";

/// Outer Events API envelope.
///
/// `event` stays untyped until the envelope says it is a callback: Slack
/// delivers many event shapes and only `message` is decoded further.
#[derive(Debug, Clone, Deserialize)]
pub struct EventEnvelope {
    #[serde(rename = "type")]
    pub envelope_type: String,
    #[serde(default)]
    pub challenge: Option<String>,
    #[serde(default)]
    pub event: Option<serde_json::Value>,
}

/// A `message` event.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageEvent {
    #[serde(rename = "type", default)]
    pub event_type: String,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub channel: Option<String>,
    /// Set for edits, deletions, joins and other system messages.
    #[serde(default)]
    pub subtype: Option<String>,
    /// Set when a bot or integration authored the message.
    #[serde(default)]
    pub bot_id: Option<String>,
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

impl MessageEvent {
    pub fn user(&self) -> Option<&str> {
        non_empty(&self.user)
    }

    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }

    pub fn channel(&self) -> Option<&str> {
        non_empty(&self.channel)
    }

    pub fn subtype(&self) -> Option<&str> {
        non_empty(&self.subtype)
    }

    pub fn bot_id(&self) -> Option<&str> {
        non_empty(&self.bot_id)
    }
}

/// Which Slack messages make it to IRC.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    pub ignore_bots: bool,
    pub ignored_users: HashSet<String>,
    pub channel_id: Option<String>,
}

impl From<&SlackConfig> for EventFilter {
    fn from(config: &SlackConfig) -> Self {
        Self {
            ignore_bots: config.ignore_bots,
            ignored_users: config.ignored_users.clone(),
            channel_id: config.channel_id.clone().filter(|c| !c.is_empty()),
        }
    }
}

/// Decide whether a message event is relayed.
///
/// Dropped: any subtyped event, bot-authored events when bots are ignored,
/// events without a sender, ignored senders, events from a channel other
/// than the configured one, and blank messages.
pub fn should_process_message(event: &MessageEvent, filter: &EventFilter) -> bool {
    if event.subtype().is_some() {
        return false;
    }
    if filter.ignore_bots && event.bot_id().is_some() {
        return false;
    }
    let Some(user) = event.user() else {
        return false;
    };
    if filter.ignored_users.contains(user) {
        return false;
    }
    if let Some(wanted) = &filter.channel_id
        && event.channel() != Some(wanted.as_str())
    {
        return false;
    }
    !event.text().trim().is_empty()
}
