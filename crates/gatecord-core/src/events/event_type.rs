//! Dispatch event names with a typed model
//!
//! Names not listed here still reach handlers, as raw JSON.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Dispatch event types with a dedicated payload model
///
/// These are the event names received in the `t` field of dispatch messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    /// Sent after a successful Identify
    Ready,
    /// New message
    MessageCreate,
    /// Channel created
    ChannelCreate,
    /// Channel updated
    ChannelUpdate,
    /// Channel deleted
    ChannelDelete,
    /// Thread created or current user added to a thread
    ThreadCreate,
    /// Thread updated
    ThreadUpdate,
}

impl EventType {
    /// Every event type, in declaration order
    pub const ALL: [Self; 7] = [
        Self::Ready,
        Self::MessageCreate,
        Self::ChannelCreate,
        Self::ChannelUpdate,
        Self::ChannelDelete,
        Self::ThreadCreate,
        Self::ThreadUpdate,
    ];

    /// Get the wire name of the event type
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ready => "READY",
            Self::MessageCreate => "MESSAGE_CREATE",
            Self::ChannelCreate => "CHANNEL_CREATE",
            Self::ChannelUpdate => "CHANNEL_UPDATE",
            Self::ChannelDelete => "CHANNEL_DELETE",
            Self::ThreadCreate => "THREAD_CREATE",
            Self::ThreadUpdate => "THREAD_UPDATE",
        }
    }

    /// Get the registry key handlers subscribe with (lower-cased wire name)
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::MessageCreate => "message_create",
            Self::ChannelCreate => "channel_create",
            Self::ChannelUpdate => "channel_update",
            Self::ChannelDelete => "channel_delete",
            Self::ThreadCreate => "thread_create",
            Self::ThreadUpdate => "thread_update",
        }
    }

    /// Parse an event type from its wire name
    #[must_use]
    pub fn from_name(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|event| event.as_str() == s)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<EventType> for String {
    fn from(event: EventType) -> Self {
        event.key().to_string()
    }
}
