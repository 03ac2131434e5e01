//! Connection event payloads

use serde::{Deserialize, Serialize};

use crate::entities::User;
use crate::value_objects::Snowflake;

/// READY event payload
///
/// Sent after a successful Identify.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadyEvent {
    /// Gateway protocol version
    pub v: u8,

    /// Current user
    pub user: User,

    /// Guilds the user is in (initially unavailable)
    #[serde(default)]
    pub guilds: Vec<UnavailableGuild>,

    /// Session ID for resuming
    pub session_id: String,

    /// Gateway URL for resuming
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_gateway_url: Option<String>,

    /// `[shard_id, num_shards]` when sharding was requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shard: Option<[u32; 2]>,
}

/// Unavailable guild in READY event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnavailableGuild {
    pub id: Snowflake,
    #[serde(default)]
    pub unavailable: bool,
}
