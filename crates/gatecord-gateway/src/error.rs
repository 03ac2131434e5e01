//! Gateway session errors

use crate::compression::InflateError;
use crate::protocol::OpCode;
use tokio_tungstenite::tungstenite;

/// Errors ending or rejecting a gateway session operation
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// A text frame was not a valid gateway envelope
    #[error("malformed gateway payload: {0}")]
    Decode(#[from] serde_json::Error),

    /// A registered converter rejected a dispatch payload
    #[error("failed to convert {event} payload: {source}")]
    Convert {
        event: String,
        #[source]
        source: serde_json::Error,
    },

    /// A well-formed envelope carried an unusable payload
    #[error("invalid {op} payload: {reason}")]
    InvalidPayload { op: OpCode, reason: &'static str },

    /// The compressed transport stream could not be inflated
    #[error(transparent)]
    Inflate(#[from] InflateError),

    /// A heartbeat went unacknowledged for a full interval
    #[error("heartbeat {counter} was not acknowledged within {interval_ms}ms")]
    LivenessFailure { counter: u64, interval_ms: u64 },

    /// The socket could not be opened
    #[error("failed to connect to gateway: {0}")]
    Connect(#[source] Box<tungstenite::Error>),

    /// The socket failed while open
    #[error("gateway transport error: {0}")]
    Transport(#[source] Box<tungstenite::Error>),

    /// The operation needs an open socket
    #[error("gateway session is not connected")]
    NotConnected,

    /// `connect` was called on a session that is already running
    #[error("gateway session is already connected")]
    AlreadyConnected,
}

impl GatewayError {
    /// Check if this error is a decoding failure of inbound data
    pub fn is_decode(&self) -> bool {
        matches!(
            self,
            Self::Decode(_) | Self::Convert { .. } | Self::InvalidPayload { .. } | Self::Inflate(_)
        )
    }

    /// Check if this error is a usage error rather than a connection failure
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::NotConnected | Self::AlreadyConnected)
    }
}

impl From<tungstenite::Error> for GatewayError {
    fn from(err: tungstenite::Error) -> Self {
        Self::Transport(Box::new(err))
    }
}

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;
