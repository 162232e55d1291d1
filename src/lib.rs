//! slirc-bridge - IRC <-> Slack relay
//!
//! Keeps one IRC session joined to a channel, forwards channel traffic to a
//! Slack incoming webhook, and writes Slack Events API messages back to IRC.

pub mod config;
pub mod error;
pub mod http;
pub mod irc;
pub mod metrics;
pub mod slack;
pub mod telemetry;
