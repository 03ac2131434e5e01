//! Dispatch events
//!
//! Event names, their payload models, and the conversion from raw JSON.

mod converters;
mod event_data;
mod event_type;
mod payloads;

pub use converters::{decode, passthrough, Converter, ConverterRegistry};
pub use event_data::EventData;
pub use event_type::EventType;
pub use payloads::{ReadyEvent, UnavailableGuild};
