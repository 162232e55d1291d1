//! Unified error handling for slirc-bridge.
//!
//! Steady-state faults never terminate the bridge: callers log these and
//! drop the message. The only fatal path is [`SessionError`] out of the
//! very first IRC connection attempt.

use slirc_line::LineError;
use thiserror::Error;

// ============================================================================
// IRC session errors
// ============================================================================

/// Errors on the IRC side of the bridge.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to connect to {server}: {source}")]
    Connect {
        server: String,
        #[source]
        source: std::io::Error,
    },

    #[error("TLS handshake with {server} failed: {reason}")]
    Tls { server: String, reason: String },

    #[error("no live IRC connection")]
    NotConnected,

    #[error("write failed: {0}")]
    Write(#[source] std::io::Error),

    #[error("read failed: {0}")]
    Read(#[from] LineError),
}

impl SessionError {
    /// Get a static error code string for metrics labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Connect { .. } => "connect",
            Self::Tls { .. } => "tls",
            Self::NotConnected => "not_connected",
            Self::Write(_) => "write",
            Self::Read(_) => "read",
        }
    }
}

// ============================================================================
// Slack errors
// ============================================================================

/// Errors talking to Slack (webhook posts and Web API calls).
#[derive(Debug, Error)]
pub enum SlackError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(reqwest::StatusCode),

    /// Web API answered `ok: false`.
    #[error("slack api error: {0}")]
    Api(String),
}

pub type SlackResult<T> = Result<T, SlackError>;
