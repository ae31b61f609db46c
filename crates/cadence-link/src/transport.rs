//! Outbound side of the link.
//!
//! [`Transport`] is the synchronous `send` capability a scheduler work body
//! calls. [`OutboundQueue`] implements it over a bounded channel drained by
//! [`WsClient::run`](crate::WsClient::run), so a blocking scheduler thread
//! and the async socket never share anything but the channel.

use crate::error::{LinkError, LinkResult};
use crate::message::Payload;
use tokio::sync::mpsc;

/// Default number of payloads buffered between producer and socket.
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

/// Something that can send a payload to the peer.
pub trait Transport {
    /// Send one payload.
    ///
    /// # Errors
    ///
    /// Implementation specific; [`LinkError::QueueClosed`] when the peer side
    /// has gone away.
    fn send(&mut self, payload: Payload) -> LinkResult<()>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn send(&mut self, payload: Payload) -> LinkResult<()> {
        (**self).send(payload)
    }
}

/// Records payloads instead of sending them.
impl Transport for Vec<Payload> {
    fn send(&mut self, payload: Payload) -> LinkResult<()> {
        self.push(payload);
        Ok(())
    }
}

/// Producer half of the outbound queue.
#[derive(Debug, Clone)]
pub struct OutboundQueue {
    tx: mpsc::Sender<Payload>,
}

/// Consumer half of the outbound queue, handed to the client.
#[derive(Debug)]
pub struct OutboundReceiver {
    rx: mpsc::Receiver<Payload>,
}

/// Create a bounded outbound queue. A capacity of zero is raised to one.
pub fn outbound_queue(capacity: usize) -> (OutboundQueue, OutboundReceiver) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (OutboundQueue { tx }, OutboundReceiver { rx })
}

impl OutboundQueue {
    /// Enqueue from async code, waiting for room.
    ///
    /// # Errors
    ///
    /// [`LinkError::QueueClosed`] if the receiver was dropped.
    pub async fn send_async(&self, payload: Payload) -> LinkResult<()> {
        self.tx
            .send(payload)
            .await
            .ok()
            .ok_or(LinkError::QueueClosed)
    }

    /// Whether the receiver has been dropped.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl Transport for OutboundQueue {
    /// Enqueue, blocking the calling thread while the queue is full.
    ///
    /// Must not be called from inside an async runtime worker; run the
    /// producer on a dedicated thread (e.g. `spawn_blocking`).
    fn send(&mut self, payload: Payload) -> LinkResult<()> {
        self.tx
            .blocking_send(payload)
            .ok()
            .ok_or(LinkError::QueueClosed)
    }
}

impl OutboundReceiver {
    /// Next payload, or `None` once every producer is gone.
    pub async fn recv(&mut self) -> Option<Payload> {
        self.rx.recv().await
    }
}
