use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixStream;
use tokio::net::unix::{OwnedReadHalf, OwnedWriteHalf};

use crate::common::SOCKET_PATH;
use crate::{Context, Result};

pub struct IpcClient {
    socket_path: String,
}

/// An open WATCH stream. The write half is kept so the daemon does not
/// see a disconnect while the caller is still reading events.
pub struct WatchSession {
    reader: BufReader<OwnedReadHalf>,
    _writer: OwnedWriteHalf,
}

impl WatchSession {
    /// Next event line, or None when the daemon closes the connection.
    pub async fn next_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        let n = self.reader.read_line(&mut line).await?;
        if n == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

impl IpcClient {
    pub fn new() -> Self {
        Self::with_path(SOCKET_PATH)
    }

    pub fn with_path(socket_path: impl Into<String>) -> Self {
        Self {
            socket_path: socket_path.into(),
        }
    }

    /// Connects and consumes the daemon's greeting line.
    async fn connect(&self) -> Result<(BufReader<OwnedReadHalf>, OwnedWriteHalf)> {
        let stream = UnixStream::connect(&self.socket_path)
            .await
            .context("Failed to connect to daemon. Is it running?")?;

        let (r, w) = stream.into_split();
        let mut reader = BufReader::new(r);
        let mut greeting = String::new();
        reader.read_line(&mut greeting).await?;
        Ok((reader, w))
    }

    /// Sends one command and returns its single response line.
    pub async fn send(&self, command: &str) -> Result<String> {
        let (mut reader, mut w) = self.connect().await?;
        w.write_all(command.as_bytes()).await?;
        w.write_all(b"\n").await?;

        let mut response = String::new();
        reader.read_line(&mut response).await?;
        Ok(response.trim().to_string())
    }

    pub async fn is_alive(&self) -> bool {
        UnixStream::connect(&self.socket_path).await.is_ok()
    }

    pub async fn ping(&self) -> Result<bool> {
        match self.send("PING").await {
            Ok(resp) => Ok(resp.contains("PONG")),
            Err(_) => Ok(false),
        }
    }

    pub async fn watch(&self) -> Result<WatchSession> {
        let (mut reader, mut w) = self.connect().await?;
        w.write_all(b"WATCH\n").await?;

        let mut ack = String::new();
        reader.read_line(&mut ack).await?;
        if !ack.starts_with("OK") {
            anyhow::bail!("WATCH rejected: {}", ack.trim());
        }

        Ok(WatchSession {
            reader,
            _writer: w,
        })
    }
}

impl Default for IpcClient {
    fn default() -> Self {
        Self::new()
    }
}
