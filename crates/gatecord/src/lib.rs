//! # gatecord
//!
//! Bot client facade: one handle over the event registry, the REST request
//! dispatcher and the gateway session.

pub mod client;

pub use client::{Client, ClientBuilder};

// Re-export commonly used types at crate root
pub use gatecord_common::{ClientConfig, ConfigError};
pub use gatecord_core::{Channel, ConverterRegistry, EventData, EventType, Intents, Message, Snowflake, User};
pub use gatecord_gateway::{CloseCode, GatewayError, GatewaySession, HandlerId, SessionState};
pub use gatecord_rest::{HttpClient, RequestError, Route};
