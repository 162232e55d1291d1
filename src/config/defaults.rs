//! Default value functions for configuration.

use std::net::SocketAddr;

/// Returns `true` (for serde defaults).
pub fn default_true() -> bool {
    true
}

// =============================================================================
// IRC Defaults
// =============================================================================

pub fn default_reconnect_delay() -> u64 {
    5
}

// =============================================================================
// Slack Defaults
// =============================================================================

pub fn default_listen() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

pub fn default_api_base() -> String {
    "https://slack.com/api".to_string()
}
