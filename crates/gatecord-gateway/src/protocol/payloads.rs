//! Gateway payload definitions
//!
//! Defines the `d` payloads of the non-dispatch messages the client reads and writes.

use gatecord_core::Intents;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Payload for op 10 (Hello)
///
/// Sent by the server immediately after connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelloPayload {
    /// Heartbeat interval in milliseconds
    pub heartbeat_interval: u64,
}

impl HelloPayload {
    /// Interval the remote service usually announces (41.25 seconds)
    pub const DEFAULT_HEARTBEAT_INTERVAL: u64 = 41_250;

    /// Create a Hello payload with custom interval
    #[must_use]
    pub fn with_interval(heartbeat_interval: u64) -> Self {
        Self { heartbeat_interval }
    }

    /// The heartbeat interval as a duration
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.heartbeat_interval)
    }
}

impl Default for HelloPayload {
    fn default() -> Self {
        Self::with_interval(Self::DEFAULT_HEARTBEAT_INTERVAL)
    }
}

/// Payload for op 2 (Identify)
///
/// Sent by the client once Hello has been processed.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifyPayload {
    /// Bot token
    pub token: String,

    /// Requested gateway intents
    pub intents: Intents,

    /// Client connection properties
    pub properties: IdentifyProperties,
}

impl IdentifyPayload {
    /// Create an identify payload with the default client properties
    #[must_use]
    pub fn new(token: impl Into<String>, intents: Intents) -> Self {
        Self {
            token: token.into(),
            intents,
            properties: IdentifyProperties::default(),
        }
    }
}

impl std::fmt::Debug for IdentifyPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentifyPayload")
            .field("token", &"<redacted>")
            .field("intents", &self.intents)
            .field("properties", &self.properties)
            .finish()
    }
}

/// Client connection properties
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifyProperties {
    /// Operating system
    pub os: String,

    /// Library name
    pub browser: String,

    /// Library name
    pub device: String,
}

impl IdentifyProperties {
    /// Set operating system
    #[must_use]
    pub fn with_os(mut self, os: impl Into<String>) -> Self {
        self.os = os.into();
        self
    }

    /// Set browser
    #[must_use]
    pub fn with_browser(mut self, browser: impl Into<String>) -> Self {
        self.browser = browser.into();
        self
    }

    /// Set device type
    #[must_use]
    pub fn with_device(mut self, device: impl Into<String>) -> Self {
        self.device = device.into();
        self
    }
}

impl Default for IdentifyProperties {
    fn default() -> Self {
        Self {
            os: std::env::consts::OS.to_string(),
            browser: "gatecord".to_string(),
            device: "gatecord".to_string(),
        }
    }
}
