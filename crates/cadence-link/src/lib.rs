//! WebSocket link for cadence.
//!
//! Thin I/O around the fixed-rate scheduler: a client that logs every inbound
//! message with its receive timestamp, an outbound queue plus a
//! [`CommandPump`] that sends one command per scheduler tick, and an echo
//! server. Payloads are opaque; no
//! message protocol is defined here, and nothing reconnects.
//!
//! # Example
//!
//! ```no_run
//! use cadence_link::{LoggingHandler, TracingSink, WsClient, resolve_endpoint};
//!
//! # async fn listen() -> cadence_link::LinkResult<()> {
//! let endpoint = resolve_endpoint("192.168.1.42:8765")?;
//! let client = WsClient::connect(&endpoint).await?;
//! let stats = client
//!     .run(LoggingHandler::new(TracingSink), None, async {
//!         let _ = tokio::signal::ctrl_c().await;
//!     })
//!     .await?;
//! println!("received {} messages", stats.received);
//! # Ok(())
//! # }
//! ```

#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

pub mod client;
pub mod command;
pub mod endpoint;
pub mod error;
pub mod handler;
pub mod message;
pub mod server;
pub mod sink;
pub mod time;
pub mod transport;

pub use client::{SessionEnd, SessionStats, WsClient};
pub use command::CommandPump;
pub use endpoint::{DEFAULT_PORT, resolve_endpoint};
pub use error::{LinkError, LinkResult};
pub use handler::{LoggingHandler, MessageHandler};
pub use message::{InboundMessage, Payload};
pub use server::{DEFAULT_GREETING, ECHO_PREFIX, EchoServer};
pub use sink::{LogSink, MemorySink, TracingSink};
pub use time::now_ms;
pub use transport::{
    DEFAULT_QUEUE_CAPACITY, OutboundQueue, OutboundReceiver, Transport, outbound_queue,
};

/// Cancellation signal shared with the scheduler.
pub use cadence_scheduler::CancelSignal;
