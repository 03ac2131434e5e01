//! Gateway endpoint URLs

/// Default gateway base URL
pub const DEFAULT_GATEWAY_URL: &str = "wss://gateway.discord.gg";

/// Gateway protocol version requested in the connect URL
pub const GATEWAY_VERSION: u8 = 10;

/// Connect URL for a gateway session
///
/// Compression is fixed for the lifetime of the session and only changes the query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayEndpoint {
    base: String,
    compress: bool,
}

impl GatewayEndpoint {
    /// Create an endpoint for the given base URL
    pub fn new(base: impl Into<String>, compress: bool) -> Self {
        Self {
            base: base.into(),
            compress,
        }
    }

    /// Whether the transport stream is zlib compressed
    pub fn is_compressed(&self) -> bool {
        self.compress
    }

    /// The base URL without query string
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Full connect URL
    pub fn url(&self) -> String {
        let base = self.base.trim_end_matches('/');
        let mut url = format!("{base}/?v={GATEWAY_VERSION}&encoding=json");
        if self.compress {
            url.push_str("&compress=zlib-stream");
        }
        url
    }
}

impl Default for GatewayEndpoint {
    fn default() -> Self {
        Self::new(DEFAULT_GATEWAY_URL, false)
    }
}

impl std::fmt::Display for GatewayEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.url())
    }
}
