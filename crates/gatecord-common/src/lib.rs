//! # gatecord-common
//!
//! Shared utilities: configuration loading and telemetry.

pub mod config;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use config::{
    default_api_url, default_gateway_url, AppSettings, AuthConfig, ClientConfig, ConfigError,
    Environment, GatewayConfig, RestConfig,
};
pub use telemetry::{
    init_tracing, init_tracing_with_config, try_init_tracing, try_init_tracing_with_config,
    TracingConfig, TracingError,
};
