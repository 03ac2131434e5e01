//! # gatecord-core
//!
//! Domain layer containing the payload models, value objects, and dispatch event conversion.
//! This crate has zero dependencies on transport (WebSocket, HTTP, etc.).

pub mod entities;
pub mod events;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{Channel, ChannelType, Message, MessageReference, Overwrite, User};
pub use events::{
    decode, passthrough, Converter, ConverterRegistry, EventData, EventType, ReadyEvent, UnavailableGuild,
};
pub use value_objects::{Intents, Snowflake, SnowflakeParseError};
