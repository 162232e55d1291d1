//! IRC transport abstraction.
//!
//! Provides a unified stream type for plaintext and TLS connections to the
//! IRC server.

use std::io;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio::net::TcpStream;
use tokio_rustls::client::TlsStream;
use tracing::{info, warn};

use crate::config::IrcConfig;
use crate::error::SessionError;

/// A connection to the IRC server.
pub enum IrcStream {
    /// Plaintext TCP connection.
    Plain(TcpStream),
    /// TLS-encrypted connection.
    Tls(Box<TlsStream<TcpStream>>),
}

impl IrcStream {
    pub fn is_tls(&self) -> bool {
        matches!(self, Self::Tls(_))
    }
}

/// Open a connection to the configured server, upgrading to TLS if asked.
pub async fn connect(config: &IrcConfig) -> Result<IrcStream, SessionError> {
    let tcp_stream =
        TcpStream::connect(&config.server)
            .await
            .map_err(|source| SessionError::Connect {
                server: config.server.clone(),
                source,
            })?;

    if let Err(e) = tcp_stream.set_nodelay(true) {
        warn!(error = %e, "Failed to set TCP_NODELAY");
    }

    if !config.tls {
        return Ok(IrcStream::Plain(tcp_stream));
    }

    let tls_stream = upgrade_to_tls(tcp_stream, config.hostname())
        .await
        .map_err(|reason| SessionError::Tls {
            server: config.server.clone(),
            reason,
        })?;
    Ok(IrcStream::Tls(Box::new(tls_stream)))
}

/// Upgrades a TCP stream to TLS, verifying against the system roots.
async fn upgrade_to_tls(
    tcp_stream: TcpStream,
    hostname: &str,
) -> Result<TlsStream<TcpStream>, String> {
    use tokio_rustls::TlsConnector;
    use tokio_rustls::rustls::pki_types::ServerName;
    use tokio_rustls::rustls::{ClientConfig, RootCertStore};

    let mut roots = RootCertStore::empty();
    let certs = rustls_native_certs::load_native_certs();
    for cert in certs.certs {
        if let Err(e) = roots.add(cert) {
            warn!("Failed to add root cert: {}", e);
        }
    }
    for e in &certs.errors {
        warn!("Error loading native certs: {}", e);
    }

    let config = ClientConfig::builder()
        .with_root_certificates(roots)
        .with_no_client_auth();

    let connector = TlsConnector::from(Arc::new(config));
    let server_name = ServerName::try_from(hostname.to_string()).map_err(|e| e.to_string())?;

    let tls_stream = connector
        .connect(server_name, tcp_stream)
        .await
        .map_err(|e| e.to_string())?;
    info!(hostname = %hostname, "TLS handshake completed");

    Ok(tls_stream)
}

impl AsyncRead for IrcStream {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        match self.get_mut() {
            IrcStream::Plain(stream) => Pin::new(stream).poll_read(cx, buf),
            IrcStream::Tls(stream) => Pin::new(stream.as_mut()).poll_read(cx, buf),
        }
    }
}

impl AsyncWrite for IrcStream {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        match self.get_mut() {
            IrcStream::Plain(stream) => Pin::new(stream).poll_write(cx, buf),
            IrcStream::Tls(stream) => Pin::new(stream.as_mut()).poll_write(cx, buf),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            IrcStream::Plain(stream) => Pin::new(stream).poll_flush(cx),
            IrcStream::Tls(stream) => Pin::new(stream.as_mut()).poll_flush(cx),
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            IrcStream::Plain(stream) => Pin::new(stream).poll_shutdown(cx),
            IrcStream::Tls(stream) => Pin::new(stream.as_mut()).poll_shutdown(cx),
        }
    }
}
