//! IRC session lifecycle.
//!
//! One [`SessionManager`] task owns the connection: it connects, registers,
//! streams lines and reconnects forever after a fixed delay. Every write to
//! the socket, from the read loop (PONG) or from webhook requests (relayed
//! Slack messages), goes through [`SessionHandle::write_line`], which holds
//! the session's write lock for exactly one line.
//!
//! ```text
//! Disconnected -> Connecting -> Registered -> Streaming -> Disconnected
//! ```

use futures_util::StreamExt;
use parking_lot::RwLock;
use slirc_line::{IrcEvent, LineCodec, build, parse_event, pong};
use std::borrow::Cow;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, ReadHalf};
use tokio::sync::{Mutex, oneshot};
use tokio_util::codec::FramedRead;
use tracing::{Instrument, debug, error, info, trace, warn};

use super::relay::{Relay, format_for_slack};
use super::stream::{self, IrcStream};
use crate::config::IrcConfig;
use crate::error::SessionError;
use crate::metrics;
use crate::telemetry::spans;

type BoxedWriter = Box<dyn AsyncWrite + Send + Unpin>;

/// One live connection's write half and the lock guarding it.
pub struct Session {
    id: u64,
    writer: Mutex<BoxedWriter>,
}

impl Session {
    pub fn new(id: u64, writer: BoxedWriter) -> Self {
        Self {
            id,
            writer: Mutex::new(writer),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Write one complete line while holding the write lock.
    ///
    /// A missing terminator is added so the line goes out in a single write.
    pub async fn write_line(&self, line: &str) -> Result<(), SessionError> {
        let line: Cow<'_, str> = if line.ends_with('\n') {
            Cow::Borrowed(line)
        } else {
            Cow::Owned(format!("{line}\r\n"))
        };

        let mut writer = self.writer.lock().await;
        writer
            .write_all(line.as_bytes())
            .await
            .map_err(SessionError::Write)?;
        writer.flush().await.map_err(SessionError::Write)?;
        trace!(session = self.id, line = %line.trim_end(), ">>");
        Ok(())
    }
}

/// Shared pointer to whichever session is current.
///
/// Reconnects publish a fresh [`Session`]; they never mutate the old one.
#[derive(Clone, Default)]
pub struct SessionHandle {
    current: Arc<RwLock<Option<Arc<Session>>>>,
}

impl SessionHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish `session` as the current connection.
    pub fn install(&self, session: Arc<Session>) {
        *self.current.write() = Some(session);
    }

    /// Clear the current connection if it is still `id`.
    pub fn clear(&self, id: u64) {
        let mut current = self.current.write();
        if current.as_ref().is_some_and(|s| s.id() == id) {
            *current = None;
        }
    }

    pub fn is_connected(&self) -> bool {
        self.current.read().is_some()
    }

    /// Guarded write to the current connection.
    pub async fn write_line(&self, line: &str) -> Result<(), SessionError> {
        // Clone the Arc out so the handle lock is not held across the write.
        let session = self
            .current
            .read()
            .clone()
            .ok_or(SessionError::NotConnected)?;
        session.write_line(line).await
    }
}

/// Drives the IRC connection for the life of the process.
pub struct SessionManager {
    config: IrcConfig,
    handle: SessionHandle,
    relay: Relay,
    next_id: u64,
}

impl SessionManager {
    pub fn new(config: IrcConfig, handle: SessionHandle, relay: Relay) -> Self {
        Self {
            config,
            handle,
            relay,
            next_id: 0,
        }
    }

    /// Run until the first connection fails; otherwise forever.
    ///
    /// `ready` fires once, when the first session is registered and
    /// streaming. Failing before that point is returned as an error; every
    /// later failure is logged and retried after the reconnect delay.
    pub async fn run(mut self, ready: oneshot::Sender<()>) -> Result<(), SessionError> {
        let mut ready = Some(ready);

        loop {
            self.next_id += 1;
            let span = spans::session(&self.config.server, self.next_id);

            match self.connect_and_register().instrument(span.clone()).await {
                Ok((session, reader)) => {
                    self.handle.install(Arc::clone(&session));
                    if let Some(tx) = ready.take() {
                        let _ = tx.send(());
                    }

                    let result = self.stream(reader, &session).instrument(span).await;
                    self.handle.clear(session.id());

                    match result {
                        Ok(()) => {
                            metrics::record_reconnect("eof");
                            warn!(server = %self.config.server, "IRC server closed the connection");
                        }
                        Err(e) => {
                            metrics::record_reconnect(e.error_code());
                            warn!(server = %self.config.server, error = %e, "IRC session lost");
                        }
                    }
                }
                Err(e) if ready.is_some() => {
                    error!(server = %self.config.server, error = %e, "Initial IRC connection failed");
                    return Err(e);
                }
                Err(e) => {
                    metrics::record_reconnect(e.error_code());
                    warn!(server = %self.config.server, error = %e, "IRC reconnect failed");
                }
            }

            info!(
                delay_secs = self.config.reconnect_delay_secs,
                "Reconnecting to IRC"
            );
            tokio::time::sleep(self.config.reconnect_delay()).await;
        }
    }

    /// Connect and send NICK/USER/JOIN before anything is read.
    async fn connect_and_register(
        &self,
    ) -> Result<(Arc<Session>, FramedRead<ReadHalf<IrcStream>, LineCodec>), SessionError> {
        info!(server = %self.config.server, tls = self.config.tls, "Connecting to IRC");
        let stream = stream::connect(&self.config).await?;
        let (read_half, write_half) = tokio::io::split(stream);

        let session = Arc::new(Session::new(self.next_id, Box::new(write_half)));
        for line in build::registration(&self.config.nickname, &self.config.channel) {
            session.write_line(&line).await?;
        }
        info!(
            nick = %self.config.nickname,
            channel = %self.config.channel,
            "Registered with IRC server"
        );

        Ok((session, FramedRead::new(read_half, LineCodec::new())))
    }

    /// Read until EOF (`Ok`) or a read/write failure (`Err`).
    pub async fn stream<R>(
        &self,
        mut reader: FramedRead<R, LineCodec>,
        session: &Session,
    ) -> Result<(), SessionError>
    where
        R: AsyncRead + Unpin,
    {
        while let Some(line) = reader.next().await {
            let line = line?;
            self.handle_line(&line, session).await?;
        }
        Ok(())
    }

    async fn handle_line(&self, line: &str, session: &Session) -> Result<(), SessionError> {
        metrics::record_irc_line();
        trace!(line = %line.trim_end(), "<<");

        match parse_event(line) {
            IrcEvent::Ping => {
                if let Some(reply) = pong(line) {
                    session.write_line(&reply).await?;
                }
            }
            IrcEvent::Ignored => {}
            event => {
                if let Some((kind, text)) = format_for_slack(&event) {
                    debug!(kind = kind, "Relaying IRC event to Slack");
                    self.relay.forward(kind, text);
                }
            }
        }
        Ok(())
    }
}
