//! Shared heartbeat state
//!
//! Written by the heartbeat task (send) and the read loop (ack) concurrently.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Heartbeat counter, ack flag, and timing for one session
#[derive(Debug)]
pub struct HeartbeatState {
    /// Value carried by the next heartbeat
    counter: AtomicU64,

    /// Whether the last heartbeat was acknowledged
    acked: AtomicBool,

    /// When the last heartbeat was sent
    last_sent: Mutex<Option<Instant>>,

    /// Round trip of the last acknowledged heartbeat
    latency: Mutex<Option<Duration>>,
}

impl HeartbeatState {
    /// Create a fresh state (nothing sent, considered acked)
    #[must_use]
    pub fn new() -> Self {
        Self {
            counter: AtomicU64::new(0),
            acked: AtomicBool::new(true),
            last_sent: Mutex::new(None),
            latency: Mutex::new(None),
        }
    }

    /// Value the next heartbeat will carry
    pub fn counter(&self) -> u64 {
        self.counter.load(Ordering::SeqCst)
    }

    /// Check if the last heartbeat was acknowledged
    pub fn is_acked(&self) -> bool {
        self.acked.load(Ordering::SeqCst)
    }

    /// Mark a heartbeat as in flight and return the counter it carries
    ///
    /// Called before the frame is written so an ack racing the send is never lost.
    pub fn begin(&self) -> u64 {
        self.acked.store(false, Ordering::SeqCst);
        *self.last_sent.lock() = Some(Instant::now());
        self.counter.fetch_add(1, Ordering::SeqCst)
    }

    /// Record an acknowledgement, returning the measured round trip
    pub fn acknowledge(&self) -> Option<Duration> {
        self.acked.store(true, Ordering::SeqCst);
        let sent = *self.last_sent.lock();
        let latency = sent.map(|sent| sent.elapsed());
        if latency.is_some() {
            *self.latency.lock() = latency;
        }
        latency
    }

    /// Round trip of the last acknowledged heartbeat
    pub fn latency(&self) -> Option<Duration> {
        *self.latency.lock()
    }

    /// When the last heartbeat was sent
    pub fn last_sent(&self) -> Option<Instant> {
        *self.last_sent.lock()
    }

    /// Reset for a new socket
    pub fn reset(&self) {
        self.counter.store(0, Ordering::SeqCst);
        self.acked.store(true, Ordering::SeqCst);
        *self.last_sent.lock() = None;
        *self.latency.lock() = None;
    }
}

impl Default for HeartbeatState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_acked() {
        let state = HeartbeatState::new();
        assert!(state.is_acked());
        assert_eq!(state.counter(), 0);
        assert!(state.latency().is_none());
        assert!(state.last_sent().is_none());
    }

    #[test]
    fn test_begin_and_acknowledge() {
        let state = HeartbeatState::new();

        assert_eq!(state.begin(), 0);
        assert!(!state.is_acked());
        assert_eq!(state.counter(), 1);
        assert!(state.last_sent().is_some());

        let latency = state.acknowledge().unwrap();
        assert!(state.is_acked());
        assert_eq!(state.latency(), Some(latency));

        assert_eq!(state.begin(), 1);
        assert_eq!(state.counter(), 2);
    }

    #[test]
    fn test_ack_without_heartbeat_has_no_latency() {
        let state = HeartbeatState::new();
        assert!(state.acknowledge().is_none());
        assert!(state.is_acked());
        assert!(state.latency().is_none());
    }

    #[test]
    fn test_reset() {
        let state = HeartbeatState::new();
        state.begin();
        state.reset();

        assert!(state.is_acked());
        assert_eq!(state.counter(), 0);
        assert!(state.last_sent().is_none());
    }
}
