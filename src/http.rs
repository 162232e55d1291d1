//! HTTP endpoint for the Slack Events API.
//!
//! `POST /webhook` receives Slack events and writes surviving messages to IRC
//! through the session's guarded write. `GET /metrics` serves Prometheus
//! metrics from the same listener.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use slirc_line::build;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{Instrument, debug, info, warn};

use crate::error::SessionError;
use crate::irc::SessionHandle;
use crate::metrics;
use crate::slack::events::{EVENT_CALLBACK, URL_VERIFICATION};
use crate::slack::{EventEnvelope, EventFilter, IdentityCache, MessageEvent, format, should_process_message};
use crate::telemetry::spans;

/// Header Slack sets on redelivered events.
const RETRY_HEADER: &str = "x-slack-retry-num";

/// Everything a webhook request needs. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub session: SessionHandle,
    pub identities: Arc<IdentityCache>,
    pub filter: Arc<EventFilter>,
    pub channel: Arc<str>,
}

/// Build the router: `POST /webhook` and `GET /metrics`.
///
/// Other methods on `/webhook` get 405 from the method router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/webhook", post(webhook_handler))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

/// Handler for GET /metrics - returns Prometheus metrics in text format.
async fn metrics_handler() -> String {
    metrics::gather_metrics()
}

fn ok() -> Response {
    (StatusCode::OK, "ok").into_response()
}

async fn webhook_handler(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    let envelope: EventEnvelope = match serde_json::from_slice(&body) {
        Ok(envelope) => envelope,
        Err(e) => {
            debug!(error = %e, "Rejecting malformed webhook body");
            return (StatusCode::BAD_REQUEST, "malformed JSON").into_response();
        }
    };

    if envelope.envelope_type == URL_VERIFICATION {
        info!("Answering Slack URL verification");
        let challenge = envelope.challenge.unwrap_or_default();
        return (StatusCode::OK, challenge).into_response();
    }

    if let Some(retry) = headers.get(RETRY_HEADER) {
        debug!(retry = ?retry, "Ignoring Slack redelivery");
        return ok();
    }

    if envelope.envelope_type != EVENT_CALLBACK {
        return ok();
    }
    let Some(raw_event) = envelope.event else {
        return ok();
    };
    if raw_event.get("type").and_then(|t| t.as_str()) != Some("message") {
        return ok();
    }

    let event: MessageEvent = match serde_json::from_value(raw_event) {
        Ok(event) => event,
        Err(e) => {
            debug!(error = %e, "Rejecting malformed message event");
            return (StatusCode::BAD_REQUEST, "malformed message event").into_response();
        }
    };

    if !should_process_message(&event, &state.filter) {
        debug!(
            user = event.user().unwrap_or_default(),
            subtype = event.subtype().unwrap_or_default(),
            "Filtered Slack message"
        );
        return ok();
    }

    let span = spans::webhook("message", event.user().unwrap_or_default());
    match relay_to_irc(&state, &event).instrument(span).await {
        Ok(()) => ok(),
        Err(e) => {
            warn!(error = %e, "Failed to relay Slack message to IRC");
            (StatusCode::INTERNAL_SERVER_ERROR, "irc write failed").into_response()
        }
    }
}

/// Resolve names, clean up Slack markup and write one PRIVMSG per line.
async fn relay_to_irc(state: &AppState, event: &MessageEvent) -> Result<(), SessionError> {
    let user_id = event.user().unwrap_or_default();
    let name = state.identities.resolve(user_id).await;
    let text = state.identities.translate_mentions(event.text()).await;
    let text = format::to_irc_text(&text);

    for line in text.lines().map(str::trim_end).filter(|l| !l.is_empty()) {
        let privmsg = build::privmsg(&state.channel, &format!("<{name}> {line}"));
        state.session.write_line(&privmsg).await?;
        metrics::record_to_irc();
    }
    Ok(())
}

/// Serve the router on an already bound listener until it fails.
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!(addr = %addr, "Slack webhook listener started");
    }
    axum::serve(listener, router(state)).await
}
