//! Inbound message handling.

use crate::message::InboundMessage;
use crate::sink::LogSink;

/// Receives every data frame the peer sends.
pub trait MessageHandler {
    /// Handle one inbound message.
    fn on_message(&mut self, message: &InboundMessage);
}

impl<F> MessageHandler for F
where
    F: FnMut(&InboundMessage),
{
    fn on_message(&mut self, message: &InboundMessage) {
        self(message);
    }
}

/// Forwards every inbound message to a [`LogSink`] with its receive timestamp.
#[derive(Debug, Clone, Default)]
pub struct LoggingHandler<S> {
    sink: S,
    received: u64,
}

impl<S: LogSink> LoggingHandler<S> {
    /// Handler writing to `sink`.
    pub fn new(sink: S) -> Self {
        Self { sink, received: 0 }
    }

    /// Messages handled so far.
    pub fn received(&self) -> u64 {
        self.received
    }

    /// Borrow the sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Consume the handler, returning the sink.
    pub fn into_sink(self) -> S {
        self.sink
    }
}

impl<S: LogSink> MessageHandler for LoggingHandler<S> {
    fn on_message(&mut self, message: &InboundMessage) {
        self.received = self.received.saturating_add(1);
        self.sink.record(
            message.received_at_ms,
            &format!("Received message: {}", message.payload),
        );
    }
}
