//! Logging setup and standard spans.

use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` overrides the default `info` filter.
pub fn init(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Standardized span constructors for bridge observability.
pub mod spans {
    use tracing::{Span, info_span};

    /// Span covering one IRC session (connect through disconnect).
    pub fn session(server: &str, attempt: u64) -> Span {
        info_span!("session", server = %server, attempt = attempt)
    }

    /// Span covering one inbound webhook event.
    pub fn webhook(kind: &str, user: &str) -> Span {
        if user.is_empty() {
            info_span!("webhook", kind = %kind)
        } else {
            info_span!("webhook", kind = %kind, user = %user)
        }
    }
}
