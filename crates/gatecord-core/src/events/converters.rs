//! Payload conversion keyed by dispatch event name

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;

use super::{EventData, EventType, ReadyEvent};
use crate::entities::{Channel, Message};

/// Decoder from a raw dispatch payload to [`EventData`]
pub type Converter = fn(Value) -> Result<EventData, serde_json::Error>;

/// Registry of payload decoders keyed by wire event name (`MESSAGE_CREATE`)
///
/// Names without an entry fall through to [`passthrough`].
#[derive(Debug, Clone)]
pub struct ConverterRegistry {
    converters: HashMap<String, Converter>,
    fallback: Converter,
}

impl ConverterRegistry {
    /// Create a registry with no typed decoders
    #[must_use]
    pub fn empty() -> Self {
        Self {
            converters: HashMap::new(),
            fallback: passthrough,
        }
    }

    /// Register or replace the decoder for an event name
    pub fn register(&mut self, event: impl Into<String>, converter: Converter) -> &mut Self {
        self.converters.insert(event.into(), converter);
        self
    }

    /// Remove the decoder for an event name, returning it to passthrough
    pub fn unregister(&mut self, event: &str) -> Option<Converter> {
        self.converters.remove(event)
    }

    /// Check if an event name has a typed decoder
    pub fn contains(&self, event: &str) -> bool {
        self.converters.contains_key(event)
    }

    /// Convert a payload for the given event name
    ///
    /// Fails only when a registered decoder rejects the payload.
    pub fn convert(&self, event: &str, payload: Value) -> Result<EventData, serde_json::Error> {
        let converter = self.converters.get(event).copied().unwrap_or(self.fallback);
        converter(payload)
    }
}

impl Default for ConverterRegistry {
    /// Registry with a decoder for every [`EventType`]
    fn default() -> Self {
        let mut registry = Self::empty();
        for event in EventType::ALL {
            let converter: Converter = match event {
                EventType::Ready => decode::<ReadyEvent>,
                EventType::MessageCreate => decode::<Message>,
                EventType::ChannelCreate
                | EventType::ChannelUpdate
                | EventType::ChannelDelete
                | EventType::ThreadCreate
                | EventType::ThreadUpdate => decode::<Channel>,
            };
            registry.register(event.as_str(), converter);
        }
        registry
    }
}

/// Identity conversion for events without a model
pub fn passthrough(payload: Value) -> Result<EventData, serde_json::Error> {
    Ok(EventData::Raw(payload))
}

/// Typed conversion through `serde`, usable with [`ConverterRegistry::register`]
pub fn decode<T>(payload: Value) -> Result<EventData, serde_json::Error>
where
    T: DeserializeOwned + Into<EventData>,
{
    serde_json::from_value::<T>(payload).map(Into::into)
}
