//! Test helpers for integration tests
//!
//! Provides a scripted mock gateway (WebSocket) and a generic HTTP server for
//! mocking the REST API, both bound to an ephemeral local port.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{RawQuery, State};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use flate2::{Compress, Compression, FlushCompress};
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::fixtures::{heartbeat_ack, hello};

/// How long helpers wait for the client before failing a test
pub const WAIT: Duration = Duration::from_secs(5);

/// HTTP server running a router on an ephemeral port
pub struct TestServer {
    pub addr: SocketAddr,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start serving `router`
    pub async fn start(router: Router) -> Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, router).await.ok();
        });

        Ok(Self {
            addr,
            _handle: handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

/// How the mock gateway behaves on each connection
#[derive(Debug, Clone)]
pub struct GatewayScript {
    /// Interval announced in HELLO
    pub heartbeat_interval: u64,
    /// Answer each heartbeat with HEARTBEAT_ACK
    pub ack_heartbeats: bool,
    /// Send every frame zlib-compressed as binary
    pub compress: bool,
    /// Envelopes sent once IDENTIFY arrives
    pub dispatches: Vec<Value>,
}

impl Default for GatewayScript {
    fn default() -> Self {
        Self {
            heartbeat_interval: 45_000,
            ack_heartbeats: true,
            compress: false,
            dispatches: Vec::new(),
        }
    }
}

/// What the mock gateway observed from the client
#[derive(Debug, Clone, PartialEq)]
pub enum ClientFrame {
    /// WebSocket upgrade with its query string
    Connected { query: Option<String> },
    /// JSON payload sent by the client
    Payload(Value),
    /// Close frame and its code
    Close(Option<u16>),
}

struct Shared {
    script: GatewayScript,
    frames: mpsc::UnboundedSender<ClientFrame>,
}

/// Scripted stand-in for the remote gateway
pub struct MockGateway {
    server: TestServer,
    frames: mpsc::UnboundedReceiver<ClientFrame>,
}

impl MockGateway {
    pub async fn start(script: GatewayScript) -> Result<Self> {
        let (tx, rx) = mpsc::unbounded_channel();
        let shared = Arc::new(Shared { script, frames: tx });
        let router = Router::new().route("/", get(upgrade)).with_state(shared);

        Ok(Self {
            server: TestServer::start(router).await?,
            frames: rx,
        })
    }

    /// Base URL to hand to the client
    pub fn url(&self) -> String {
        format!("ws://{}", self.server.addr)
    }

    /// Next thing the client did
    pub async fn next_frame(&mut self) -> Result<ClientFrame> {
        tokio::time::timeout(WAIT, self.frames.recv())
            .await
            .context("timed out waiting for the client")?
            .context("mock gateway stopped")
    }

    /// Next JSON payload, skipping connection events
    pub async fn next_payload(&mut self) -> Result<Value> {
        loop {
            match self.next_frame().await? {
                ClientFrame::Payload(value) => return Ok(value),
                ClientFrame::Connected { .. } => {}
                ClientFrame::Close(code) => anyhow::bail!("client closed with {code:?}"),
            }
        }
    }

    /// Wait for the client's close frame, skipping payloads
    pub async fn wait_for_close(&mut self) -> Result<Option<u16>> {
        loop {
            if let ClientFrame::Close(code) = self.next_frame().await? {
                return Ok(code);
            }
        }
    }
}

async fn upgrade(
    ws: WebSocketUpgrade,
    RawQuery(query): RawQuery,
    State(shared): State<Arc<Shared>>,
) -> Response {
    let _ = shared.frames.send(ClientFrame::Connected { query });
    ws.on_upgrade(move |socket| async move {
        if let Err(e) = serve_socket(socket, &shared).await {
            eprintln!("mock gateway connection ended: {e}");
        }
    })
}

async fn serve_socket(mut socket: WebSocket, shared: &Shared) -> Result<()> {
    let script = &shared.script;
    let mut encoder = Encoder::new(script.compress);

    socket.send(encoder.frame(&hello(script.heartbeat_interval))?).await?;

    while let Some(message) = socket.recv().await {
        match message? {
            Message::Text(text) => {
                let payload: Value = serde_json::from_str(&text)?;
                let op = payload["op"].as_u64();
                let _ = shared.frames.send(ClientFrame::Payload(payload));

                match op {
                    Some(2) => {
                        for envelope in &script.dispatches {
                            socket.send(encoder.frame(envelope)?).await?;
                        }
                    }
                    Some(1) if script.ack_heartbeats => {
                        socket.send(encoder.frame(&heartbeat_ack())?).await?;
                    }
                    _ => {}
                }
            }
            Message::Close(frame) => {
                let _ = shared.frames.send(ClientFrame::Close(frame.map(|f| f.code)));
                break;
            }
            _ => {}
        }
    }
    Ok(())
}

/// Outbound framing: plain text, or one shared zlib stream in binary frames
struct Encoder {
    zlib: Option<Compress>,
}

impl Encoder {
    fn new(compress: bool) -> Self {
        Self {
            zlib: compress.then(|| Compress::new(Compression::default(), true)),
        }
    }

    fn frame(&mut self, value: &Value) -> Result<Message> {
        let text = value.to_string();
        let Some(zlib) = self.zlib.as_mut() else {
            return Ok(Message::Text(text));
        };

        let mut out = Vec::with_capacity(text.len() * 2 + 64);
        zlib.compress_vec(text.as_bytes(), &mut out, FlushCompress::Sync)?;
        Ok(Message::Binary(out))
    }
}
