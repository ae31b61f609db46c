//! Echo server for exercising clients without real hardware.
//!
//! Greets every client once, then answers each text frame with
//! `Echo: <text>` and returns binary frames unchanged.

use crate::error::LinkResult;
use futures_util::{SinkExt, StreamExt};
use std::future::Future;
use std::net::SocketAddr;
use tokio::net::{TcpListener, TcpStream, ToSocketAddrs};
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

/// Greeting sent to each client on connect.
pub const DEFAULT_GREETING: &str = "Hello from the cadence echo server!";

/// Prefix of every text reply.
pub const ECHO_PREFIX: &str = "Echo: ";

/// WebSocket echo server bound to a local address.
#[derive(Debug)]
pub struct EchoServer {
    listener: TcpListener,
    greeting: String,
}

impl EchoServer {
    /// Bind a listener. Use port 0 to let the OS pick one.
    ///
    /// # Errors
    ///
    /// [`LinkError::Io`](crate::LinkError::Io) if the address cannot be bound.
    pub async fn bind(addr: impl ToSocketAddrs) -> LinkResult<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self {
            listener,
            greeting: DEFAULT_GREETING.to_string(),
        })
    }

    /// Replace the greeting.
    pub fn with_greeting(mut self, greeting: impl Into<String>) -> Self {
        self.greeting = greeting.into();
        self
    }

    /// Address the server is listening on.
    ///
    /// # Errors
    ///
    /// [`LinkError::Io`](crate::LinkError::Io) if the socket has no local address.
    pub fn local_addr(&self) -> LinkResult<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept clients until `shutdown` resolves.
    ///
    /// Each client is served on its own task. Accept failures are logged and
    /// the server keeps listening.
    ///
    /// # Errors
    ///
    /// Only if the listener's local address cannot be read at startup.
    pub async fn serve_until<S>(self, shutdown: S) -> LinkResult<()>
    where
        S: Future<Output = ()>,
    {
        let addr = self.local_addr()?;
        info!(%addr, "echo server listening");
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                () = &mut shutdown => break,
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        let greeting = self.greeting.clone();
                        tokio::spawn(async move {
                            if let Err(e) = serve_client(stream, peer, greeting).await {
                                if e.is_connection_closed() {
                                    debug!(%peer, "client went away");
                                } else {
                                    warn!(%peer, error = %e, "client session failed");
                                }
                            }
                        });
                    }
                    Err(e) => warn!(error = %e, "accept failed"),
                },
            }
        }

        info!(%addr, "echo server stopped");
        Ok(())
    }
}

async fn serve_client(stream: TcpStream, peer: SocketAddr, greeting: String) -> LinkResult<()> {
    let ws = accept_async(stream).await?;
    info!(%peer, "client connected");

    let (mut write, mut read) = ws.split();
    write.send(Message::text(greeting)).await?;

    while let Some(frame) = read.next().await {
        match frame? {
            Message::Text(text) => {
                info!(%peer, message = %text.as_str(), "received message");
                write
                    .send(Message::text(format!("{ECHO_PREFIX}{}", text.as_str())))
                    .await?;
            }
            Message::Binary(bytes) => write.send(Message::Binary(bytes)).await?,
            Message::Close(_) => break,
            Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => {}
        }
    }

    info!(%peer, "client disconnected");
    Ok(())
}
