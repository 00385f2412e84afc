use log::{debug, info};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio::time::{timeout, Duration};

use crate::config::{DEFAULT_TIMEOUT, MAX_LINE_LENGTH};
use crate::transport::{Transport, TransportError};

/// Newline-framed transport over a TCP stream.
pub struct TcpTransport {
    reader: BufReader<OwnedReadHalf>,
    writer: Option<OwnedWriteHalf>,
    timeout_duration: Duration,
    max_line_length: u64,
}

impl TcpTransport {
    pub fn new(stream: TcpStream) -> Self {
        Self::with_config(stream, DEFAULT_TIMEOUT, MAX_LINE_LENGTH)
    }

    pub fn with_timeout(stream: TcpStream, timeout_duration: Duration) -> Self {
        Self::with_config(stream, timeout_duration, MAX_LINE_LENGTH)
    }

    pub fn with_config(
        stream: TcpStream,
        timeout_duration: Duration,
        max_line_length: u64,
    ) -> Self {
        let (read_half, write_half) = stream.into_split();
        Self {
            reader: BufReader::new(read_half),
            writer: Some(write_half),
            timeout_duration,
            max_line_length,
        }
    }

    pub async fn connect<A: ToSocketAddrs>(addr: A) -> Result<Self, TransportError> {
        Self::connect_with_timeout(addr, DEFAULT_TIMEOUT).await
    }

    pub async fn connect_with_timeout<A: ToSocketAddrs>(
        addr: A,
        timeout_duration: Duration,
    ) -> Result<Self, TransportError> {
        let stream = timeout(timeout_duration, TcpStream::connect(addr))
            .await
            .map_err(|_| TransportError::Timeout(timeout_duration))??;
        if let Ok(peer) = stream.peer_addr() {
            info!("connected to {}", peer);
        }
        Ok(Self::with_timeout(stream, timeout_duration))
    }
}

fn map_io(e: std::io::Error) -> TransportError {
    match e.kind() {
        std::io::ErrorKind::BrokenPipe
        | std::io::ErrorKind::ConnectionReset
        | std::io::ErrorKind::ConnectionAborted
        | std::io::ErrorKind::UnexpectedEof => TransportError::Closed,
        _ => TransportError::Io(e),
    }
}

#[async_trait::async_trait]
impl Transport for TcpTransport {
    async fn send(&mut self, line: String) -> Result<(), TransportError> {
        let writer = self.writer.as_mut().ok_or(TransportError::Closed)?;
        let send_op = async {
            writer.write_all(line.as_bytes()).await.map_err(map_io)?;
            writer.write_all(b"\n").await.map_err(map_io)?;
            writer.flush().await.map_err(map_io)
        };
        timeout(self.timeout_duration, send_op)
            .await
            .map_err(|_| TransportError::Timeout(self.timeout_duration))?
    }

    async fn recv(&mut self) -> Result<String, TransportError> {
        let max = self.max_line_length;
        let reader = &mut self.reader;
        let recv_op = async move {
            let mut line = String::new();
            // One extra byte for the terminator.
            let read = reader
                .take(max + 1)
                .read_line(&mut line)
                .await
                .map_err(map_io)?;
            if read == 0 {
                return Err(TransportError::Closed);
            }
            if !line.ends_with('\n') {
                return Err(if read as u64 > max {
                    TransportError::LineTooLong { max }
                } else {
                    TransportError::Closed
                });
            }
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
            Ok(line)
        };
        timeout(self.timeout_duration, recv_op)
            .await
            .map_err(|_| TransportError::Timeout(self.timeout_duration))?
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        if let Some(mut writer) = self.writer.take() {
            debug!("closing tcp connection");
            writer.shutdown().await.map_err(map_io)?;
        }
        Ok(())
    }
}
