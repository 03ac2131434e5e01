//! Payload fixtures
//!
//! Gateway frames and REST bodies shaped like the remote service's.

use serde_json::{json, Value};

/// Token every test client authenticates with
pub const TEST_TOKEN: &str = "test-token";

/// READY dispatch data
pub fn ready_payload() -> Value {
    json!({
        "v": 10,
        "user": {
            "id": "80351110224678912",
            "username": "gatecord-test",
            "discriminator": "0",
            "bot": true
        },
        "guilds": [{"id": "41771983423143937", "unavailable": true}],
        "session_id": "d9d4b7ad2f1f4a7c",
        "resume_gateway_url": "wss://gateway.example.test",
        "application": {"id": "80351110224678912", "flags": 0}
    })
}

/// MESSAGE_CREATE dispatch data
pub fn message_payload(id: u64, channel_id: u64, content: &str) -> Value {
    json!({
        "id": id.to_string(),
        "channel_id": channel_id.to_string(),
        "author": {"id": "53908232506183680", "username": "mason", "discriminator": "0"},
        "content": content,
        "timestamp": "2024-05-01T12:00:00.000000+00:00",
        "tts": false,
        "mention_everyone": false,
        "mentions": [],
        "mention_roles": [],
        "attachments": [],
        "embeds": [],
        "pinned": false,
        "type": 0
    })
}

/// Dispatch envelope
pub fn dispatch(event: &str, sequence: u64, data: Value) -> Value {
    json!({"op": 0, "s": sequence, "t": event, "d": data})
}

/// HELLO envelope
pub fn hello(heartbeat_interval: u64) -> Value {
    json!({"op": 10, "d": {"heartbeat_interval": heartbeat_interval}})
}

/// HEARTBEAT_ACK envelope
pub fn heartbeat_ack() -> Value {
    json!({"op": 11})
}
