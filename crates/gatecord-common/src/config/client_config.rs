//! Client configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file when present).

use gatecord_core::Intents;
use serde::Deserialize;
use std::env;

/// Main client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    pub app: AppSettings,
    pub auth: AuthConfig,
    pub gateway: GatewayConfig,
    pub rest: RestConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default)]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// Credentials shared by the gateway session and the REST client
#[derive(Clone, Deserialize)]
pub struct AuthConfig {
    pub token: String,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Gateway connection settings
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_gateway_url")]
    pub url: String,
    #[serde(default)]
    pub intents: Intents,
    #[serde(default)]
    pub compress: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            url: default_gateway_url(),
            intents: Intents::default(),
            compress: false,
        }
    }
}

/// REST API settings
#[derive(Debug, Clone, Deserialize)]
pub struct RestConfig {
    #[serde(default = "default_api_url")]
    pub base_url: String,
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_url(),
        }
    }
}

// Default value functions
fn default_app_name() -> String {
    "gatecord".to_string()
}

/// Default gateway base URL
pub fn default_gateway_url() -> String {
    "wss://gateway.discord.gg".to_string()
}

/// Default REST API base URL
pub fn default_api_url() -> String {
    "https://discord.com/api/v10".to_string()
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidValue(name, value.to_string())),
    }
}

impl ClientConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if `DISCORD_TOKEN` is missing or a variable has an invalid value
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = match lookup("APP_ENV") {
            Some(value) => Environment::parse(&value)
                .ok_or(ConfigError::InvalidValue("APP_ENV", value))?,
            None => Environment::default(),
        };

        let token = lookup("DISCORD_TOKEN")
            .filter(|token| !token.trim().is_empty())
            .ok_or(ConfigError::MissingVar("DISCORD_TOKEN"))?;

        let intents = match lookup("DISCORD_INTENTS") {
            Some(value) => Intents::parse(&value)
                .map_err(|_| ConfigError::InvalidValue("DISCORD_INTENTS", value))?,
            None => Intents::default(),
        };

        let compress = match lookup("DISCORD_COMPRESS") {
            Some(value) => parse_bool("DISCORD_COMPRESS", &value)?,
            None => false,
        };

        Ok(Self {
            app: AppSettings {
                name: lookup("APP_NAME").unwrap_or_else(default_app_name),
                env,
            },
            auth: AuthConfig { token },
            gateway: GatewayConfig {
                url: lookup("DISCORD_GATEWAY_URL").unwrap_or_else(default_gateway_url),
                intents,
                compress,
            },
            rest: RestConfig {
                base_url: lookup("DISCORD_API_URL").unwrap_or_else(default_api_url),
            },
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
