//! Gateway protocol definitions
//!
//! Defines the WebSocket protocol including op codes, message formats, close codes, and endpoints.

mod close_codes;
mod endpoint;
mod messages;
mod opcodes;
mod payloads;

pub use close_codes::CloseCode;
pub use endpoint::{GatewayEndpoint, DEFAULT_GATEWAY_URL, GATEWAY_VERSION};
pub use messages::GatewayMessage;
pub use opcodes::OpCode;
pub use payloads::{HelloPayload, IdentifyPayload, IdentifyProperties};
