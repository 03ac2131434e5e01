//! Gateway session
//!
//! Owns one logical connection: opens the socket, runs the opcode state
//! machine, drives the heartbeat task, and publishes dispatch events.

mod config;
mod state;

pub use config::SessionConfig;
pub use state::SessionState;

use crate::compression::Inflater;
use crate::error::GatewayError;
use crate::events::Emitter;
use crate::heartbeat::{HeartbeatRunner, HeartbeatState, HeartbeatTarget};
use crate::protocol::{CloseCode, GatewayEndpoint, GatewayMessage, HelloPayload, OpCode};
use async_trait::async_trait;
use futures_util::sink::Sink;
use futures_util::stream::Stream;
use futures_util::{SinkExt, StreamExt};
use gatecord_core::EventData;
use parking_lot::{Mutex, RwLock};
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode as WsCloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::{Error as WsError, Message as WsMessage};
use tokio_util::sync::CancellationToken;

type BoxSink = Pin<Box<dyn Sink<WsMessage, Error = WsError> + Send>>;

/// A received socket message the protocol cares about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// A complete JSON document
    Text(String),
    /// A fragment of the compressed transport stream
    Binary(Vec<u8>),
}

/// Tasks and cancellation owned by the current socket
struct Connection {
    shutdown: CancellationToken,
    heartbeat: Option<JoinHandle<Result<(), GatewayError>>>,
}

struct SessionInner {
    config: SessionConfig,
    emitter: Arc<dyn Emitter>,
    state: RwLock<SessionState>,
    heartbeat: Arc<HeartbeatState>,
    interval: RwLock<Option<Duration>>,
    sequence: Mutex<Option<u64>>,
    inflater: Mutex<Inflater>,
    sink: tokio::sync::Mutex<Option<BoxSink>>,
    connection: Mutex<Option<Connection>>,
}

/// Gateway protocol client
///
/// Cheap to clone; clones share the same connection.
#[derive(Clone)]
pub struct GatewaySession {
    inner: Arc<SessionInner>,
}

impl GatewaySession {
    /// Create a disconnected session publishing to `emitter`
    pub fn new(config: SessionConfig, emitter: Arc<dyn Emitter>) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                config,
                emitter,
                state: RwLock::new(SessionState::Disconnected),
                heartbeat: Arc::new(HeartbeatState::new()),
                interval: RwLock::new(None),
                sequence: Mutex::new(None),
                inflater: Mutex::new(Inflater::new()),
                sink: tokio::sync::Mutex::new(None),
                connection: Mutex::new(None),
            }),
        }
    }

    // === Observability ===

    /// Current lifecycle state
    pub fn state(&self) -> SessionState {
        *self.inner.state.read()
    }

    /// Round trip of the last acknowledged heartbeat
    pub fn latency(&self) -> Option<Duration> {
        self.inner.heartbeat.latency()
    }

    /// Heartbeat interval announced by Hello on the current socket
    pub fn heartbeat_interval(&self) -> Option<Duration> {
        *self.inner.interval.read()
    }

    /// Sequence number of the last dispatch received
    pub fn last_sequence(&self) -> Option<u64> {
        *self.inner.sequence.lock()
    }

    /// Endpoint this session connects to
    pub fn endpoint(&self) -> &GatewayEndpoint {
        &self.inner.config.endpoint
    }

    // === Lifecycle ===

    /// Open the socket and run the read loop until it closes
    ///
    /// Returns `Ok(())` when the socket closes normally, and the fatal error
    /// otherwise. The session is `Disconnected` again when this returns.
    ///
    /// [`close`](Self::close) during the handshake cancels it and this returns
    /// `Ok(())` without a socket having been opened.
    pub async fn connect(&self) -> Result<(), GatewayError> {
        let shutdown = self.begin()?;

        let url = self.inner.config.endpoint.url();
        tracing::info!(
            url = %url,
            compress = self.inner.config.endpoint.is_compressed(),
            "Connecting to gateway"
        );

        let handshake = tokio::select! {
            biased;
            () = shutdown.cancelled() => None,
            result = tokio_tungstenite::connect_async(url.as_str()) => Some(result),
        };

        let socket = match handshake {
            Some(Ok((socket, _response))) => socket,
            Some(Err(e)) => {
                self.abandon();
                tracing::warn!(url = %url, error = %e, "Gateway connection failed");
                return Err(GatewayError::Connect(Box::new(e)));
            }
            None => {
                self.abandon();
                tracing::info!(url = %url, "Gateway handshake cancelled");
                return Ok(());
            }
        };

        let (sink, stream) = socket.split();
        self.drive(sink, stream, shutdown).await
    }

    /// Run the protocol over an already open transport
    ///
    /// Same contract as [`connect`](Self::connect) without opening a socket.
    pub async fn run<Si, St>(&self, sink: Si, stream: St) -> Result<(), GatewayError>
    where
        Si: Sink<WsMessage, Error = WsError> + Send + 'static,
        St: Stream<Item = Result<WsMessage, WsError>> + Send + Unpin,
    {
        let shutdown = self.begin()?;
        self.drive(sink, stream, shutdown).await
    }

    /// Send a close frame and stop the read loop
    ///
    /// While the socket is still being opened this cancels the handshake instead.
    ///
    /// # Errors
    /// [`GatewayError::NotConnected`] when no socket is open or being opened.
    pub async fn close(&self, code: CloseCode) -> Result<(), GatewayError> {
        let mut guard = self.inner.sink.lock().await;
        let Some(mut sink) = guard.take() else {
            drop(guard);
            return self.cancel_handshake();
        };
        self.set_state(SessionState::Closing);

        tracing::info!(
            close_code = code.as_u16(),
            reason = code.description(),
            "Closing gateway connection"
        );

        let frame = CloseFrame {
            code: WsCloseCode::from(code.as_u16()),
            reason: code.description().into(),
        };
        let sent = sink.send(WsMessage::Close(Some(frame))).await;
        if let Err(e) = sink.close().await {
            tracing::debug!(error = %e, "Error flushing gateway socket on close");
        }
        drop(guard);

        if let Some(connection) = self.inner.connection.lock().as_ref() {
            connection.shutdown.cancel();
        }

        sent.map_err(GatewayError::from)
    }

    /// Send a gateway message on the open socket
    pub async fn send(&self, message: &GatewayMessage) -> Result<(), GatewayError> {
        let json = message.to_json()?;

        let mut guard = self.inner.sink.lock().await;
        let sink = guard.as_mut().ok_or(GatewayError::NotConnected)?;
        sink.send(WsMessage::Text(json)).await?;

        tracing::trace!(op = %message.op, "Gateway message sent");
        Ok(())
    }

    // === Protocol ===

    /// Process one received frame
    ///
    /// Binary fragments are buffered until a whole compressed message has arrived.
    pub async fn handle_payload(&self, frame: Frame) -> Result<(), GatewayError> {
        let text = match frame {
            Frame::Text(text) => text,
            Frame::Binary(bytes) => {
                let inflated = self.inner.inflater.lock().feed(&bytes)?;
                match inflated {
                    Some(text) => text,
                    None => return Ok(()),
                }
            }
        };

        let message = GatewayMessage::from_json(&text)?;
        tracing::trace!(op = %message.op, "Gateway message received");

        match message.op {
            OpCode::Hello => self.on_hello(&message).await,
            OpCode::HeartbeatAck => {
                self.on_heartbeat_ack();
                Ok(())
            }
            OpCode::Dispatch => self.on_dispatch(message).await,
            op => {
                tracing::debug!(op = %op, "Ignoring gateway op");
                Ok(())
            }
        }
    }

    async fn on_hello(&self, message: &GatewayMessage) -> Result<(), GatewayError> {
        if self.state() != SessionState::AwaitingHello {
            tracing::warn!(state = %self.state(), "Ignoring unexpected Hello");
            return Ok(());
        }

        let hello: HelloPayload = message.data_as()?;
        if hello.heartbeat_interval == 0 {
            return Err(GatewayError::InvalidPayload {
                op: OpCode::Hello,
                reason: "heartbeat_interval must be positive",
            });
        }

        let interval = hello.interval();
        *self.inner.interval.write() = Some(interval);
        tracing::info!(interval_ms = hello.heartbeat_interval, "Received Hello");

        self.set_state(SessionState::Identifying);
        let identify = GatewayMessage::identify(&self.inner.config.identify_payload())?;
        self.send(&identify).await?;
        tracing::info!(
            intents = %self.inner.config.intents,
            "Identify sent"
        );

        self.start_heartbeat(interval);
        self.set_state(SessionState::Active);
        Ok(())
    }

    fn on_heartbeat_ack(&self) {
        match self.inner.heartbeat.acknowledge() {
            Some(latency) => tracing::debug!(
                latency_ms = latency.as_millis() as u64,
                "Heartbeat acknowledged"
            ),
            None => tracing::debug!("Heartbeat ack without a pending heartbeat"),
        }
    }

    async fn on_dispatch(&self, message: GatewayMessage) -> Result<(), GatewayError> {
        if let Some(sequence) = message.s {
            *self.inner.sequence.lock() = Some(sequence);
        }

        let Some(event) = message.t.clone() else {
            tracing::warn!(seq = ?message.s, "Dispatch without event name");
            return Ok(());
        };

        let data = self
            .inner
            .config
            .converters
            .convert(&event, message.into_data())
            .map_err(|source| GatewayError::Convert {
                event: event.clone(),
                source,
            })?;

        if let EventData::Ready(ready) = &data {
            tracing::info!(
                session_id = %ready.session_id,
                user = %ready.user.tag(),
                guilds = ready.guilds.len(),
                "Session ready"
            );
        }

        let key = event.to_ascii_lowercase();
        tracing::debug!(event = %key, "Dispatching event");
        self.inner.emitter.emit(&key, Arc::new(data)).await;
        Ok(())
    }

    // === Internals ===

    fn set_state(&self, state: SessionState) {
        let previous = std::mem::replace(&mut *self.inner.state.write(), state);
        if previous != state {
            tracing::trace!(from = %previous, to = %state, "Session state changed");
        }
    }

    /// Claim the session for a new connection
    ///
    /// Returns the token that stops this connection.
    fn begin(&self) -> Result<CancellationToken, GatewayError> {
        let mut state = self.inner.state.write();
        if *state != SessionState::Disconnected {
            return Err(GatewayError::AlreadyConnected);
        }
        *state = SessionState::Connecting;

        let shutdown = CancellationToken::new();
        *self.inner.connection.lock() = Some(Connection {
            shutdown: shutdown.clone(),
            heartbeat: None,
        });
        Ok(shutdown)
    }

    /// Release a connection that never got a socket
    fn abandon(&self) {
        *self.inner.connection.lock() = None;
        self.set_state(SessionState::Disconnected);
    }

    fn cancel_handshake(&self) -> Result<(), GatewayError> {
        if self.state() != SessionState::Connecting {
            return Err(GatewayError::NotConnected);
        }
        match self.inner.connection.lock().as_ref() {
            Some(connection) => {
                tracing::info!("Cancelling gateway handshake");
                connection.shutdown.cancel();
                Ok(())
            }
            None => Err(GatewayError::NotConnected),
        }
    }

    async fn drive<Si, St>(
        &self,
        sink: Si,
        mut stream: St,
        shutdown: CancellationToken,
    ) -> Result<(), GatewayError>
    where
        Si: Sink<WsMessage, Error = WsError> + Send + 'static,
        St: Stream<Item = Result<WsMessage, WsError>> + Send + Unpin,
    {
        *self.inner.sink.lock().await = Some(Box::pin(sink));
        self.inner.inflater.lock().reset();
        self.inner.heartbeat.reset();
        *self.inner.sequence.lock() = None;
        self.set_state(SessionState::AwaitingHello);
        tracing::info!("Gateway connection established");

        let result = self.read_loop(&mut stream, &shutdown).await;
        let heartbeat = self.teardown().await;

        if let Err(e) = &result {
            tracing::warn!(error = %e, "Gateway read loop failed");
        }
        result.and(heartbeat)
    }

    async fn read_loop<St>(
        &self,
        stream: &mut St,
        shutdown: &CancellationToken,
    ) -> Result<(), GatewayError>
    where
        St: Stream<Item = Result<WsMessage, WsError>> + Send + Unpin,
    {
        loop {
            let next = tokio::select! {
                biased;
                () = shutdown.cancelled() => return Ok(()),
                next = stream.next() => next,
            };

            let frame = match next {
                Some(Ok(WsMessage::Text(text))) => Frame::Text(text),
                Some(Ok(WsMessage::Binary(bytes))) => Frame::Binary(bytes),
                Some(Ok(WsMessage::Close(frame))) => {
                    let close_code = frame.as_ref().map(|f| u16::from(f.code));
                    tracing::info!(
                        close_code = ?close_code,
                        reason = frame.as_ref().map_or("", |f| &*f.reason),
                        "Gateway closed the connection"
                    );
                    return Ok(());
                }
                Some(Ok(_)) => continue,
                Some(Err(WsError::ConnectionClosed | WsError::AlreadyClosed)) | None => {
                    tracing::info!("Gateway stream ended");
                    return Ok(());
                }
                Some(Err(e)) => return Err(e.into()),
            };

            self.handle_payload(frame).await?;
        }
    }

    fn start_heartbeat(&self, interval: Duration) {
        let mut guard = self.inner.connection.lock();
        let Some(connection) = guard.as_mut() else {
            return;
        };

        let runner = HeartbeatRunner::new(
            self.clone(),
            Arc::clone(&self.inner.heartbeat),
            interval,
            connection.shutdown.child_token(),
        );
        let shutdown = connection.shutdown.clone();
        connection.heartbeat = Some(tokio::spawn(async move {
            let result = runner.run().await;
            // NotConnected means close() already took the socket
            if matches!(result, Err(ref e) if !matches!(e, GatewayError::NotConnected)) {
                shutdown.cancel();
            }
            result
        }));
    }

    /// Cancel and join the heartbeat task, then drop the socket
    ///
    /// Returns the heartbeat task's failure, if it had one.
    async fn teardown(&self) -> Result<(), GatewayError> {
        let connection = self.inner.connection.lock().take();

        let mut result = Ok(());
        if let Some(connection) = connection {
            connection.shutdown.cancel();
            if let Some(handle) = connection.heartbeat {
                match handle.await {
                    Ok(Err(GatewayError::NotConnected)) => {
                        tracing::debug!("Heartbeat stopped after the socket was closed");
                    }
                    Ok(Err(e)) => result = Err(e),
                    Ok(Ok(())) => {}
                    Err(e) => tracing::warn!(error = %e, "Heartbeat task panicked"),
                }
            }
        }

        if let Some(mut sink) = self.inner.sink.lock().await.take() {
            if let Err(e) = sink.close().await {
                tracing::debug!(error = %e, "Error closing gateway socket");
            }
        }

        *self.inner.interval.write() = None;
        self.set_state(SessionState::Disconnected);
        tracing::info!(
            last_sequence = ?self.last_sequence(),
            "Gateway session disconnected"
        );
        result
    }
}

#[async_trait]
impl HeartbeatTarget for GatewaySession {
    async fn send_heartbeat(&self, counter: u64) -> Result<(), GatewayError> {
        self.send(&GatewayMessage::heartbeat(counter)).await
    }

    async fn close_connection(&self, code: CloseCode) -> Result<(), GatewayError> {
        self.close(code).await
    }
}

impl std::fmt::Debug for GatewaySession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewaySession")
            .field("state", &self.state())
            .field("endpoint", &self.inner.config.endpoint)
            .field("heartbeat_interval", &self.heartbeat_interval())
            .field("latency", &self.latency())
            .field("last_sequence", &self.last_sequence())
            .finish()
    }
}
