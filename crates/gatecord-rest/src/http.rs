//! REST request dispatcher
//!
//! Every call holds one lock for its whole round trip, so at most one
//! request is in flight per client.

use crate::error::RequestError;
use crate::route::{Route, DEFAULT_API_URL};
use gatecord_core::{Channel, Message, Snowflake, User};
use reqwest::header::{AUTHORIZATION, RETRY_AFTER, USER_AGENT as USER_AGENT_HEADER};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tokio::sync::Mutex;

/// User-Agent sent with every request
pub const USER_AGENT: &str = concat!("DiscordBot (gatecord, ", env!("CARGO_PKG_VERSION"), ")");

/// Authenticated REST client
pub struct HttpClient {
    client: reqwest::Client,
    token: String,
    base_url: String,
    lock: Mutex<()>,
}

impl HttpClient {
    /// Create a client for the default API base URL
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            token: token.into(),
            base_url: DEFAULT_API_URL.to_string(),
            lock: Mutex::new(()),
        }
    }

    /// Point the client at another API base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Perform one request and return the JSON body
    ///
    /// 200/201 return the parsed body unchanged, 204 returns `Value::Null`.
    /// Every other status maps to a [`RequestError`] variant.
    pub async fn request(&self, route: &Route, body: Option<&Value>) -> Result<Value, RequestError> {
        let url = route.url(&self.base_url);
        let _guard = self.lock.lock().await;

        let mut builder = self
            .client
            .request(route.method.clone(), &url)
            .header(USER_AGENT_HEADER, USER_AGENT)
            .header(AUTHORIZATION, format!("Bot {}", self.token));
        if let Some(body) = body {
            builder = builder.json(body);
        }

        tracing::debug!(route = %route, "Sending request");
        let response = builder.send().await.map_err(|e| {
            tracing::warn!(route = %route, error = %e, "Request failed");
            RequestError::Transport(e)
        })?;

        let status = response.status();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<f64>().ok());
        let bytes = response.bytes().await?;

        match status {
            StatusCode::OK | StatusCode::CREATED => {
                tracing::debug!(route = %route, status = status.as_u16(), "Request succeeded");
                if bytes.is_empty() {
                    Ok(Value::Null)
                } else {
                    Ok(serde_json::from_slice(&bytes)?)
                }
            }
            StatusCode::NO_CONTENT => {
                tracing::debug!(route = %route, status = 204, "Request succeeded");
                Ok(Value::Null)
            }
            _ => {
                let err = RequestError::from_response(status, &bytes, retry_after);
                if let RequestError::RateLimited { retry_after, global } = &err {
                    tracing::warn!(route = %route, retry_after = ?retry_after, global, "Rate limited");
                } else {
                    tracing::warn!(route = %route, status = status.as_u16(), error = %err, "Request rejected");
                }
                Err(err)
            }
        }
    }

    async fn request_as<T: DeserializeOwned>(
        &self,
        route: &Route,
        body: Option<&Value>,
    ) -> Result<T, RequestError> {
        let value = self.request(route, body).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Post a text message to a channel
    pub async fn create_message(
        &self,
        channel_id: Snowflake,
        content: &str,
    ) -> Result<Message, RequestError> {
        let route = Route::post(format!("/channels/{channel_id}/messages"));
        self.request_as(&route, Some(&json!({ "content": content })))
            .await
    }

    /// Fetch a channel by id
    pub async fn get_channel(&self, channel_id: Snowflake) -> Result<Channel, RequestError> {
        self.request_as(&Route::get(format!("/channels/{channel_id}")), None)
            .await
    }

    /// Fetch the user the token belongs to
    pub async fn current_user(&self) -> Result<User, RequestError> {
        self.request_as(&Route::get("/users/@me"), None).await
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .finish()
    }
}
