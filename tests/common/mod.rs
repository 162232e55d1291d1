//! Shared helpers for bridge integration tests.

#![allow(dead_code)]

use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

const TIMEOUT: Duration = Duration::from_secs(3);

/// A scripted IRC server that accepts the bridge's connections.
pub struct FakeIrcServer {
    listener: TcpListener,
}

impl FakeIrcServer {
    pub async fn bind() -> anyhow::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        Ok(Self { listener })
    }

    pub fn address(&self) -> String {
        self.listener
            .local_addr()
            .map(|a| a.to_string())
            .unwrap_or_default()
    }

    /// Accept one connection and consume its NICK/USER/JOIN burst.
    pub async fn accept_registered(&self) -> anyhow::Result<IrcPeer> {
        let (socket, _) = tokio::time::timeout(TIMEOUT, self.listener.accept()).await??;
        let mut peer = IrcPeer {
            reader: BufReader::new(socket),
        };
        let burst = [peer.recv().await?, peer.recv().await?, peer.recv().await?];
        anyhow::ensure!(burst[0].starts_with("NICK "), "expected NICK, got {:?}", burst[0]);
        anyhow::ensure!(burst[1].starts_with("USER "), "expected USER, got {:?}", burst[1]);
        anyhow::ensure!(burst[2].starts_with("JOIN "), "expected JOIN, got {:?}", burst[2]);
        Ok(peer)
    }
}

/// The server side of one bridge connection.
pub struct IrcPeer {
    reader: BufReader<TcpStream>,
}

impl IrcPeer {
    pub async fn send(&mut self, line: &str) -> anyhow::Result<()> {
        let stream = self.reader.get_mut();
        stream.write_all(line.as_bytes()).await?;
        stream.write_all(b"\r\n").await?;
        Ok(())
    }

    /// Next line from the bridge, terminator included.
    pub async fn recv(&mut self) -> anyhow::Result<String> {
        let mut line = String::new();
        let n = tokio::time::timeout(TIMEOUT, self.reader.read_line(&mut line)).await??;
        anyhow::ensure!(n > 0, "bridge closed the connection");
        Ok(line)
    }
}

/// Poll until `check` holds or the timeout elapses.
pub async fn eventually<F, Fut>(mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    let deadline = tokio::time::Instant::now() + TIMEOUT;
    while tokio::time::Instant::now() < deadline {
        if check().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}
