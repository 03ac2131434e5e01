//! Gateway session settings

use crate::protocol::{GatewayEndpoint, IdentifyPayload, IdentifyProperties};
use gatecord_core::{ConverterRegistry, Intents};

/// Settings fixed for the lifetime of a session
#[derive(Clone)]
pub struct SessionConfig {
    /// Bot token sent in Identify
    pub token: String,

    /// Requested gateway intents
    pub intents: Intents,

    /// Connect URL and compression flag
    pub endpoint: GatewayEndpoint,

    /// Client properties sent in Identify
    pub properties: IdentifyProperties,

    /// Dispatch payload decoders
    pub converters: ConverterRegistry,
}

impl SessionConfig {
    /// Create settings with default intents, endpoint, and converters
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            intents: Intents::default(),
            endpoint: GatewayEndpoint::default(),
            properties: IdentifyProperties::default(),
            converters: ConverterRegistry::default(),
        }
    }

    #[must_use]
    pub fn with_intents(mut self, intents: Intents) -> Self {
        self.intents = intents;
        self
    }

    #[must_use]
    pub fn with_endpoint(mut self, endpoint: GatewayEndpoint) -> Self {
        self.endpoint = endpoint;
        self
    }

    #[must_use]
    pub fn with_properties(mut self, properties: IdentifyProperties) -> Self {
        self.properties = properties;
        self
    }

    #[must_use]
    pub fn with_converters(mut self, converters: ConverterRegistry) -> Self {
        self.converters = converters;
        self
    }

    /// Identify payload for these settings
    pub fn identify_payload(&self) -> IdentifyPayload {
        IdentifyPayload {
            token: self.token.clone(),
            intents: self.intents,
            properties: self.properties.clone(),
        }
    }
}

impl std::fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConfig")
            .field("token", &"<redacted>")
            .field("intents", &self.intents)
            .field("endpoint", &self.endpoint)
            .field("properties", &self.properties)
            .finish()
    }
}
