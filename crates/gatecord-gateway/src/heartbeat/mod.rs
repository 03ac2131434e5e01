//! Heartbeat bookkeeping and the periodic liveness task

mod runner;
mod state;

pub use runner::{HeartbeatRunner, HeartbeatTarget};
pub use state::HeartbeatState;
