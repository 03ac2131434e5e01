//! Session lifecycle state

use serde::{Deserialize, Serialize};

/// Connection lifecycle of a gateway session
///
/// `Disconnected → Connecting → AwaitingHello → Identifying → Active → Closing → Disconnected`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No socket
    #[default]
    Disconnected,
    /// Opening the socket
    Connecting,
    /// Socket open, waiting for Hello
    AwaitingHello,
    /// Hello processed, sending Identify
    Identifying,
    /// Identified, heartbeats running
    Active,
    /// Close frame sent, read loop ending
    Closing,
}

impl SessionState {
    /// Check if a socket is (or is about to be) open
    #[must_use]
    pub const fn is_connected(self) -> bool {
        !matches!(self, Self::Disconnected)
    }

    /// Snake-case name used in logs and serialization
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::AwaitingHello => "awaiting_hello",
            Self::Identifying => "identifying",
            Self::Active => "active",
            Self::Closing => "closing",
        }
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
