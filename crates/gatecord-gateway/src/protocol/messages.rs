//! Gateway message format
//!
//! Defines the envelope shared by every WebSocket message.

use super::{HelloPayload, IdentifyPayload, OpCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Gateway message format
///
/// All messages sent over the WebSocket connection follow this format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayMessage {
    /// Operation code
    pub op: OpCode,

    /// Event data payload
    #[serde(default)]
    pub d: Option<Value>,

    /// Sequence number (only for op=0 Dispatch)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s: Option<u64>,

    /// Event type (only for op=0 Dispatch)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t: Option<String>,
}

impl GatewayMessage {
    /// Create a message with only an op code and payload
    #[must_use]
    pub fn new(op: OpCode, d: Option<Value>) -> Self {
        Self { op, d, s: None, t: None }
    }

    // === Client Messages ===

    /// Create an Identify message (op=2)
    pub fn identify(payload: &IdentifyPayload) -> Result<Self, serde_json::Error> {
        Ok(Self::new(OpCode::Identify, Some(serde_json::to_value(payload)?)))
    }

    /// Create a Heartbeat message (op=1) carrying the counter
    #[must_use]
    pub fn heartbeat(counter: u64) -> Self {
        Self::new(OpCode::Heartbeat, Some(Value::from(counter)))
    }

    // === Server Messages ===

    /// Create a Hello message (op=10)
    #[must_use]
    pub fn hello(payload: HelloPayload) -> Self {
        Self::new(
            OpCode::Hello,
            Some(serde_json::json!({ "heartbeat_interval": payload.heartbeat_interval })),
        )
    }

    /// Create a Heartbeat ACK message (op=11)
    #[must_use]
    pub fn heartbeat_ack() -> Self {
        Self::new(OpCode::HeartbeatAck, None)
    }

    /// Create a Dispatch message (op=0)
    #[must_use]
    pub fn dispatch(event_type: impl Into<String>, sequence: u64, data: Value) -> Self {
        Self {
            op: OpCode::Dispatch,
            d: Some(data),
            s: Some(sequence),
            t: Some(event_type.into()),
        }
    }

    // === Parsing ===

    /// Decode `d` into a typed payload (a missing `d` decodes as `null`)
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        match &self.d {
            Some(value) => T::deserialize(value),
            None => T::deserialize(&Value::Null),
        }
    }

    /// Take `d` out of the message, `null` when absent
    #[must_use]
    pub fn into_data(self) -> Value {
        self.d.unwrap_or(Value::Null)
    }

    // === Utilities ===

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl std::fmt::Display for GatewayMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(t) = &self.t {
            write!(f, "GatewayMessage(op={}, t={}", self.op, t)?;
            if let Some(s) = self.s {
                write!(f, ", s={s}")?;
            }
            write!(f, ")")
        } else {
            write!(f, "GatewayMessage(op={})", self.op)
        }
    }
}
