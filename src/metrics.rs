//! Prometheus metrics for slirc-bridge.
//!
//! Exposed on `GET /metrics` next to the webhook endpoint.
//!
//! - `bridge_irc_lines_total` - raw lines read from IRC
//! - `bridge_irc_reconnects_total{reason}` - sessions lost and failed reconnects
//! - `bridge_to_slack_total{kind}` - IRC events posted to Slack
//! - `bridge_slack_post_failures_total` - webhook posts dropped
//! - `bridge_to_irc_total` - Slack lines written to IRC
//! - `bridge_identity_lookups_total{result}` - cache hits, misses, failures

use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::OnceLock;

/// Global Prometheus registry for all metrics.
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

pub fn registry() -> &'static Registry {
    REGISTRY.get_or_init(Registry::new)
}

// ========================================================================
// Counters
// ========================================================================

/// Raw lines read from the IRC connection.
pub static IRC_LINES: OnceLock<IntCounter> = OnceLock::new();

/// IRC sessions lost and reconnect attempts that failed, by reason
/// (`eof` or a [`SessionError`](crate::error::SessionError) code).
pub static IRC_RECONNECTS: OnceLock<IntCounterVec> = OnceLock::new();

/// IRC events relayed to Slack, by kind (message, action, join, part).
pub static TO_SLACK: OnceLock<IntCounterVec> = OnceLock::new();

/// Webhook posts that failed (transport error or non-2xx).
pub static SLACK_POST_FAILURES: OnceLock<IntCounter> = OnceLock::new();

/// Lines written to IRC on behalf of Slack users.
pub static TO_IRC: OnceLock<IntCounter> = OnceLock::new();

/// Identity resolutions, by result (hit, miss, failure).
pub static IDENTITY_LOOKUPS: OnceLock<IntCounterVec> = OnceLock::new();

/// Initialize the Prometheus metrics registry.
///
/// Must be called once at startup before any metrics are recorded.
/// Recording before `init` is a silent no-op, which keeps unit tests free of
/// global setup.
pub fn init() {
    let r = registry();

    macro_rules! register {
        ($metric:ident, $init:expr) => {
            let m = $init.expect(concat!(stringify!($metric), " creation failed"));
            if let Err(e) = r.register(Box::new(m.clone())) {
                tracing::warn!(error = %e, concat!("Failed to register metric ", stringify!($metric)));
            }
            let _ = $metric.set(m);
        };
    }

    register!(IRC_LINES, IntCounter::new("bridge_irc_lines_total", "Raw lines read from IRC"));
    register!(IRC_RECONNECTS, IntCounterVec::new(Opts::new("bridge_irc_reconnects_total", "IRC sessions lost or failed to reconnect"), &["reason"]));
    register!(TO_SLACK, IntCounterVec::new(Opts::new("bridge_to_slack_total", "IRC events relayed to Slack"), &["kind"]));
    register!(SLACK_POST_FAILURES, IntCounter::new("bridge_slack_post_failures_total", "Slack webhook posts dropped"));
    register!(TO_IRC, IntCounter::new("bridge_to_irc_total", "Lines relayed from Slack to IRC"));
    register!(IDENTITY_LOOKUPS, IntCounterVec::new(Opts::new("bridge_identity_lookups_total", "Slack identity resolutions"), &["result"]));
}

/// Gather all metrics and encode them in Prometheus text format.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = registry().gather();
    let mut buffer = vec![];
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode Prometheus metrics");
        return String::new();
    }
    match String::from_utf8(buffer) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Prometheus metrics were not valid UTF-8");
            String::new()
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

#[inline]
fn inc(metric: &OnceLock<IntCounter>) {
    if let Some(c) = metric.get() {
        c.inc();
    }
}

#[inline]
fn inc_label(metric: &OnceLock<IntCounterVec>, label: &str) {
    if let Some(c) = metric.get() {
        c.with_label_values(&[label]).inc();
    }
}

#[inline]
pub fn record_irc_line() {
    inc(&IRC_LINES);
}

#[inline]
pub fn record_reconnect(reason: &str) {
    inc_label(&IRC_RECONNECTS, reason);
}

/// Record an IRC event relayed to Slack.
#[inline]
pub fn record_to_slack(kind: &str) {
    inc_label(&TO_SLACK, kind);
}

#[inline]
pub fn record_post_failure() {
    inc(&SLACK_POST_FAILURES);
}

#[inline]
pub fn record_to_irc() {
    inc(&TO_IRC);
}

/// Record an identity resolution outcome.
#[inline]
pub fn record_identity_lookup(result: &str) {
    inc_label(&IDENTITY_LOOKUPS, result);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_lifecycle() {
        init();

        record_irc_line();
        record_to_slack("message");
        record_identity_lookup("hit");
        record_reconnect("eof");

        let text = gather_metrics();
        assert!(text.contains("bridge_irc_lines_total"));
        assert!(text.contains("bridge_to_slack_total{kind=\"message\"}"));
        assert!(text.contains("bridge_identity_lookups_total{result=\"hit\"}"));
        assert!(text.contains("bridge_irc_reconnects_total{reason=\"eof\"}"));
    }
}
