//! Error types for the link crate.

use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// Errors raised by the WebSocket link.
#[derive(Debug, Error)]
pub enum LinkError {
    /// The endpoint argument could not be turned into a WebSocket URL.
    #[error("invalid endpoint {endpoint:?}: {reason}")]
    InvalidEndpoint {
        /// The rejected input.
        endpoint: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// The WebSocket handshake with the server failed.
    #[error("failed to connect to {endpoint}")]
    Connect {
        /// URL that was dialled.
        endpoint: String,
        /// Underlying handshake error.
        #[source]
        source: Box<tungstenite::Error>,
    },

    /// An established connection failed.
    #[error("websocket error")]
    Protocol(#[source] Box<tungstenite::Error>),

    /// The consumer side of the outbound queue has gone away.
    #[error("outbound queue closed")]
    QueueClosed,

    /// Socket-level I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<tungstenite::Error> for LinkError {
    fn from(e: tungstenite::Error) -> Self {
        LinkError::Protocol(Box::new(e))
    }
}

impl LinkError {
    /// Whether the error is the peer closing the connection normally.
    pub fn is_connection_closed(&self) -> bool {
        matches!(
            self,
            LinkError::Protocol(e) if matches!(
                **e,
                tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed
            )
        )
    }
}

/// Result type for link operations.
pub type LinkResult<T> = Result<T, LinkError>;
