//! Slack side of the bridge.
//!
//! - [`api`]: Web API client (`users.info`)
//! - [`identity`]: time-bounded user ID -> display name cache
//! - [`poster`]: incoming-webhook poster for IRC traffic
//! - [`events`]: Events API envelope types and the relay filter
//! - [`format`]: Slack markup -> plain IRC text

pub mod api;
pub mod events;
pub mod format;
pub mod identity;
pub mod poster;

pub use api::{ProfileLookup, SlackApi, UserProfile};
pub use events::{EventEnvelope, EventFilter, MessageEvent, should_process_message};
pub use identity::IdentityCache;
pub use poster::SlackPoster;

use crate::error::SlackResult;
use std::time::Duration;

/// Per-request timeout for every Slack HTTP call.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Build the HTTP client shared by the poster and the API client.
pub fn http_client() -> SlackResult<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .user_agent(concat!("slircbridge/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}
