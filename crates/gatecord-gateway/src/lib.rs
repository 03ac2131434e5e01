//! # gatecord-gateway
//!
//! Gateway protocol client: session state machine, heartbeats, zlib-stream
//! decompression, and the event registry dispatch events are published to.

pub mod compression;
pub mod error;
pub mod events;
pub mod heartbeat;
pub mod protocol;
pub mod session;

pub use compression::{InflateError, Inflater};
pub use error::{GatewayError, GatewayResult};
pub use events::{Emitter, EventRegistry, Handler, HandlerId};
pub use heartbeat::{HeartbeatRunner, HeartbeatState, HeartbeatTarget};
pub use protocol::{
    CloseCode, GatewayEndpoint, GatewayMessage, HelloPayload, IdentifyPayload, IdentifyProperties,
    OpCode,
};
pub use session::{Frame, GatewaySession, SessionConfig, SessionState};

/// WebSocket message and error types used by [`GatewaySession::run`]
pub use tokio_tungstenite::tungstenite::{Error as WsError, Message as WsMessage};
