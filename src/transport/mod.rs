use std::time::Duration;

/// Failures of the underlying connection. None of them are retried.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("connection closed by peer")]
    Closed,
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    #[error("line too long: more than {max} bytes")]
    LineTooLong { max: u64 },
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Line-oriented connection to a peer.
///
/// Each call sends or receives exactly one line, without its terminator.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn send(&mut self, line: String) -> Result<(), TransportError>;
    async fn recv(&mut self) -> Result<String, TransportError>;

    /// Release the connection. Further sends fail with [`TransportError::Closed`].
    async fn close(&mut self) -> Result<(), TransportError> {
        Ok(())
    }
}

pub mod in_memory;
pub mod tcp;
