//! WebSocket client session.
//!
//! One connection, no reconnection. The session ends when the server closes,
//! the outbound producers all go away, or the shutdown future resolves.

use crate::error::{LinkError, LinkResult};
use crate::handler::MessageHandler;
use crate::message::{InboundMessage, Payload};
use crate::transport::OutboundReceiver;
use futures_util::{SinkExt, StreamExt};
use std::future::Future;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, error, info, trace};

/// Why a client session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The server closed the connection.
    ServerClosed,
    /// Every outbound producer was dropped.
    OutboundClosed,
    /// The shutdown future resolved.
    Shutdown,
}

/// Counters for a finished session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionStats {
    /// Payloads written to the socket.
    pub sent: u64,
    /// Data frames received.
    pub received: u64,
    /// How the session ended.
    pub end: SessionEnd,
}

/// A connected WebSocket client.
pub struct WsClient {
    endpoint: String,
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl std::fmt::Debug for WsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WsClient")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl WsClient {
    /// Open a connection to `endpoint` (a `ws://` URL).
    ///
    /// # Errors
    ///
    /// [`LinkError::Connect`] if the TCP connection or handshake fails.
    pub async fn connect(endpoint: &str) -> LinkResult<Self> {
        info!(endpoint, "connecting");

        let (stream, response) = connect_async(endpoint)
            .await
            .map_err(|source| LinkError::Connect {
                endpoint: endpoint.to_string(),
                source: Box::new(source),
            })?;

        info!(
            endpoint,
            status = %response.status(),
            "connection established"
        );

        Ok(Self {
            endpoint: endpoint.to_string(),
            stream,
        })
    }

    /// URL this client is connected to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Drive the connection until it ends.
    ///
    /// Inbound data frames go to `handler`. Payloads from `outbound` are
    /// written in order; pass `None` for a receive-only session. A close frame
    /// is sent when the session ends from this side.
    ///
    /// # Errors
    ///
    /// [`LinkError::Protocol`] if reading or writing the socket fails. The
    /// error is logged and returned; there is no retry.
    pub async fn run<H, S>(
        self,
        mut handler: H,
        mut outbound: Option<OutboundReceiver>,
        shutdown: S,
    ) -> LinkResult<SessionStats>
    where
        H: MessageHandler,
        S: Future<Output = ()>,
    {
        let (mut write, mut read) = self.stream.split();
        tokio::pin!(shutdown);

        let mut sent = 0u64;
        let mut received = 0u64;

        let end = loop {
            tokio::select! {
                () = &mut shutdown => {
                    debug!("shutdown requested");
                    break SessionEnd::Shutdown;
                }

                frame = read.next() => match frame {
                    Some(Ok(Message::Close(frame))) => {
                        info!(?frame, "server closed connection");
                        break SessionEnd::ServerClosed;
                    }
                    Some(Ok(message)) => {
                        if let Some(payload) = Payload::from_message(message) {
                            received = received.saturating_add(1);
                            handler.on_message(&InboundMessage::now(payload));
                        }
                    }
                    Some(Err(e)) => {
                        let err = LinkError::from(e);
                        if err.is_connection_closed() {
                            info!("connection closed");
                            break SessionEnd::ServerClosed;
                        }
                        error!(error = %err, endpoint = %self.endpoint, "websocket error");
                        return Err(err);
                    }
                    None => {
                        info!("connection closed");
                        break SessionEnd::ServerClosed;
                    }
                },

                payload = next_outbound(&mut outbound) => match payload {
                    Some(payload) => {
                        trace!(bytes = payload.len(), "sending payload");
                        if let Err(e) = write.send(payload.into_message()).await {
                            let err = LinkError::from(e);
                            error!(error = %err, endpoint = %self.endpoint, "send failed");
                            return Err(err);
                        }
                        sent = sent.saturating_add(1);
                    }
                    None => {
                        debug!("outbound queue closed by producer");
                        break SessionEnd::OutboundClosed;
                    }
                },
            }
        };

        if end != SessionEnd::ServerClosed {
            if let Err(e) = write.send(Message::Close(None)).await {
                debug!(error = %e, "close frame not delivered");
            }
        }

        info!(sent, received, ?end, "session ended");
        Ok(SessionStats {
            sent,
            received,
            end,
        })
    }
}

async fn next_outbound(outbound: &mut Option<OutboundReceiver>) -> Option<Payload> {
    match outbound {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}
