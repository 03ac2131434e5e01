//! Periodic heartbeat task
//!
//! Sends a heartbeat every interval and closes the session when the previous
//! one was never acknowledged. A single missed ack is fatal.

use super::HeartbeatState;
use crate::error::GatewayError;
use crate::protocol::CloseCode;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// The connection a heartbeat runner keeps alive
#[async_trait]
pub trait HeartbeatTarget: Send + Sync + 'static {
    /// Send a heartbeat frame carrying `counter`
    async fn send_heartbeat(&self, counter: u64) -> Result<(), GatewayError>;

    /// Close the connection with `code`
    async fn close_connection(&self, code: CloseCode) -> Result<(), GatewayError>;
}

/// Heartbeat loop bound to one connection
pub struct HeartbeatRunner<T> {
    target: T,
    state: Arc<HeartbeatState>,
    interval: Duration,
    cancel: CancellationToken,
}

impl<T: HeartbeatTarget> HeartbeatRunner<T> {
    pub fn new(
        target: T,
        state: Arc<HeartbeatState>,
        interval: Duration,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            target,
            state,
            interval,
            cancel,
        }
    }

    /// Run until cancelled, a send fails, or an ack is missed
    ///
    /// The first heartbeat goes out immediately. On a missed ack the connection
    /// is closed with [`CloseCode::SessionTimeout`] before this returns
    /// [`GatewayError::LivenessFailure`].
    pub async fn run(self) -> Result<(), GatewayError> {
        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let interval_ms = self.interval.as_millis() as u64;
        tracing::debug!(interval_ms, "Heartbeat task started");

        loop {
            tokio::select! {
                biased;
                () = self.cancel.cancelled() => {
                    tracing::debug!(counter = self.state.counter(), "Heartbeat task cancelled");
                    return Ok(());
                }
                _ = ticker.tick() => {}
            }

            if !self.state.is_acked() {
                let counter = self.state.counter().saturating_sub(1);
                tracing::error!(counter, interval_ms, "Heartbeat not acknowledged, closing session");

                if let Err(e) = self.target.close_connection(CloseCode::SessionTimeout).await {
                    tracing::warn!(error = %e, "Failed to close session after missed heartbeat ack");
                }
                return Err(GatewayError::LivenessFailure {
                    counter,
                    interval_ms,
                });
            }

            let counter = self.state.begin();
            if let Err(e) = self.target.send_heartbeat(counter).await {
                tracing::warn!(counter, error = %e, "Failed to send heartbeat");
                return Err(e);
            }
            tracing::trace!(counter, "Heartbeat sent");
        }
    }
}
