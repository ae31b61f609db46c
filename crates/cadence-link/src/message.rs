//! Opaque payloads exchanged over the link.
//!
//! No protocol is imposed on payload contents: text frames stay text and
//! binary frames stay bytes.

use std::borrow::Cow;
use std::fmt;
use tokio_tungstenite::tungstenite::Message;

use crate::time::now_ms;

/// Body of a single WebSocket data frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// UTF-8 text frame
    Text(String),
    /// Binary frame
    Binary(Vec<u8>),
}

impl Payload {
    /// Payload as text, replacing invalid UTF-8 in binary frames.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Payload::Text(text) => Cow::Borrowed(text),
            Payload::Binary(bytes) => String::from_utf8_lossy(bytes),
        }
    }

    /// Raw bytes of the payload.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Payload::Text(text) => text.as_bytes(),
            Payload::Binary(bytes) => bytes,
        }
    }

    /// Payload length in bytes.
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// Whether the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Convert a data frame into a payload. Control frames yield `None`.
    pub fn from_message(message: Message) -> Option<Self> {
        match message {
            Message::Text(text) => Some(Payload::Text(text.as_str().to_owned())),
            Message::Binary(bytes) => Some(Payload::Binary(bytes.to_vec())),
            Message::Ping(_) | Message::Pong(_) | Message::Close(_) | Message::Frame(_) => None,
        }
    }

    /// Frame this payload for sending.
    pub fn into_message(self) -> Message {
        match self {
            Payload::Text(text) => Message::text(text),
            Payload::Binary(bytes) => Message::binary(bytes),
        }
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Payload::Text(text)
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Payload::Text(text.to_owned())
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Payload::Binary(bytes)
    }
}

/// A payload received from the peer, stamped on arrival.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    /// Frame body
    pub payload: Payload,
    /// Wall-clock receive time, Unix milliseconds
    pub received_at_ms: i64,
}

impl InboundMessage {
    /// Stamp a payload with the current wall-clock time.
    pub fn now(payload: Payload) -> Self {
        Self {
            payload,
            received_at_ms: now_ms(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_and_binary_views() {
        let text = Payload::from("forward 2");
        assert_eq!(text.as_text(), "forward 2");
        assert_eq!(text.len(), 9);

        let binary = Payload::from(vec![0x68, 0x69, 0xff]);
        assert_eq!(binary.as_bytes(), &[0x68, 0x69, 0xff]);
        assert!(binary.as_text().starts_with("hi"));
        assert!(!binary.is_empty());
    }

    #[test]
    fn test_message_conversion() {
        let message = Payload::from("stop").into_message();
        assert!(message.is_text());
        assert_eq!(Payload::from_message(message), Some(Payload::from("stop")));

        let message = Payload::from(vec![1u8, 2, 3]).into_message();
        assert!(message.is_binary());
        assert_eq!(
            Payload::from_message(message),
            Some(Payload::Binary(vec![1, 2, 3]))
        );

        assert_eq!(Payload::from_message(Message::Ping(Vec::new().into())), None);
    }

    #[test]
    fn test_inbound_is_stamped() {
        let before = now_ms();
        let inbound = InboundMessage::now(Payload::from("hello"));
        assert!(inbound.received_at_ms >= before);
        assert_eq!(inbound.payload.to_string(), "hello");
    }
}
