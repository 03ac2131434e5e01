//! Decoded dispatch payloads handed to event handlers

use serde_json::Value;

use super::ReadyEvent;
use crate::entities::{Channel, Message};

/// A dispatch payload after conversion
///
/// Events without a typed model arrive as [`EventData::Raw`].
#[derive(Debug, Clone, PartialEq)]
pub enum EventData {
    Ready(Box<ReadyEvent>),
    Message(Box<Message>),
    Channel(Box<Channel>),
    Raw(Value),
}

impl EventData {
    /// Borrow the message, if this is a message payload
    pub fn as_message(&self) -> Option<&Message> {
        match self {
            Self::Message(message) => Some(message),
            _ => None,
        }
    }

    /// Borrow the channel, if this is a channel payload
    pub fn as_channel(&self) -> Option<&Channel> {
        match self {
            Self::Channel(channel) => Some(channel),
            _ => None,
        }
    }

    /// Borrow the READY payload
    pub fn as_ready(&self) -> Option<&ReadyEvent> {
        match self {
            Self::Ready(ready) => Some(ready),
            _ => None,
        }
    }

    /// Borrow the unconverted JSON payload
    pub fn as_raw(&self) -> Option<&Value> {
        match self {
            Self::Raw(value) => Some(value),
            _ => None,
        }
    }
}

impl From<Message> for EventData {
    fn from(message: Message) -> Self {
        Self::Message(Box::new(message))
    }
}

impl From<Channel> for EventData {
    fn from(channel: Channel) -> Self {
        Self::Channel(Box::new(channel))
    }
}

impl From<ReadyEvent> for EventData {
    fn from(ready: ReadyEvent) -> Self {
        Self::Ready(Box::new(ready))
    }
}

impl From<Value> for EventData {
    fn from(value: Value) -> Self {
        Self::Raw(value)
    }
}
