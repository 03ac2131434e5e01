//! Client facade
//!
//! Bundles the event registry, the REST dispatcher and the gateway session
//! behind one handle.

use gatecord_common::ClientConfig;
use gatecord_core::{ConverterRegistry, EventData, Intents};
use gatecord_gateway::protocol::DEFAULT_GATEWAY_URL;
use gatecord_gateway::{
    CloseCode, EventRegistry, GatewayEndpoint, GatewayError, GatewaySession, HandlerId,
    SessionConfig,
};
use gatecord_rest::{HttpClient, DEFAULT_API_URL};
use std::future::Future;
use std::sync::Arc;
use tokio::signal;

/// Builder for [`Client`]
pub struct ClientBuilder {
    token: String,
    intents: Intents,
    compress: bool,
    gateway_url: String,
    api_base_url: String,
    converters: ConverterRegistry,
}

impl ClientBuilder {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            intents: Intents::default(),
            compress: false,
            gateway_url: DEFAULT_GATEWAY_URL.to_string(),
            api_base_url: DEFAULT_API_URL.to_string(),
            converters: ConverterRegistry::default(),
        }
    }

    pub fn intents(mut self, intents: Intents) -> Self {
        self.intents = intents;
        self
    }

    /// Request a zlib-compressed transport stream
    pub fn compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    pub fn gateway_url(mut self, url: impl Into<String>) -> Self {
        self.gateway_url = url.into();
        self
    }

    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn converters(mut self, converters: ConverterRegistry) -> Self {
        self.converters = converters;
        self
    }

    pub fn build(self) -> Client {
        let registry = Arc::new(EventRegistry::new());
        let http = Arc::new(HttpClient::new(self.token.clone()).with_base_url(self.api_base_url));

        let session_config = SessionConfig::new(self.token)
            .with_intents(self.intents)
            .with_endpoint(GatewayEndpoint::new(self.gateway_url, self.compress))
            .with_converters(self.converters);
        let gateway = GatewaySession::new(session_config, registry.clone());

        Client {
            registry,
            http,
            gateway,
        }
    }
}

/// Bot client
///
/// Cheap to clone; clones share the registry, the REST client and the session.
#[derive(Clone)]
pub struct Client {
    registry: Arc<EventRegistry>,
    http: Arc<HttpClient>,
    gateway: GatewaySession,
}

impl Client {
    pub fn builder(token: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(token)
    }

    /// Build a client from loaded configuration
    pub fn from_config(config: &ClientConfig) -> Self {
        ClientBuilder::new(config.auth.token.clone())
            .intents(config.gateway.intents)
            .compress(config.gateway.compress)
            .gateway_url(config.gateway.url.clone())
            .api_base_url(config.rest.base_url.clone())
            .build()
    }

    // === Events ===

    pub fn on<F, Fut>(&self, event: impl Into<String>, handler: F) -> HandlerId
    where
        F: Fn(Arc<EventData>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.registry.on(event, handler)
    }

    pub fn once<F, Fut>(&self, event: impl Into<String>, handler: F) -> HandlerId
    where
        F: Fn(Arc<EventData>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.registry.once(event, handler)
    }

    pub fn off(&self, event: &str, id: Option<HandlerId>) -> usize {
        self.registry.off(event, id)
    }

    pub fn events(&self) -> &Arc<EventRegistry> {
        &self.registry
    }

    // === Components ===

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    pub fn gateway(&self) -> &GatewaySession {
        &self.gateway
    }

    // === Lifecycle ===

    /// Connect and run until the socket closes or Ctrl-C is pressed
    pub async fn login(&self) -> Result<(), GatewayError> {
        self.login_until(shutdown_signal()).await
    }

    /// Connect and run until the socket closes or `shutdown` resolves
    ///
    /// On shutdown the session is closed with the default close code and the
    /// read loop is awaited before returning. A shutdown during the handshake
    /// abandons it and returns `Ok(())`.
    pub async fn login_until<S>(&self, shutdown: S) -> Result<(), GatewayError>
    where
        S: Future<Output = ()>,
    {
        let connect = self.gateway.connect();
        tokio::pin!(connect);

        // connect is polled first so the session has claimed its token before close runs
        tokio::select! {
            biased;
            result = &mut connect => return result,
            () = shutdown => {
                tracing::info!("Shutdown requested");
            }
        }

        match self.gateway.close(CloseCode::default()).await {
            Ok(()) | Err(GatewayError::NotConnected) => {}
            Err(e) => tracing::warn!(error = %e, "Failed to close gateway session"),
        }
        connect.await
    }

    /// Close the gateway session with `code`
    pub async fn close(&self, code: CloseCode) -> Result<(), GatewayError> {
        self.gateway.close(code).await
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("registry", &self.registry)
            .field("http", &self.http)
            .field("gateway", &self.gateway)
            .finish()
    }
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
