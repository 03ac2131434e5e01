//! Configuration structs

mod client_config;

pub use client_config::{
    default_api_url, default_gateway_url, AppSettings, AuthConfig, ClientConfig, ConfigError,
    Environment, GatewayConfig, RestConfig,
};
