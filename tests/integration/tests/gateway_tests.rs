//! Gateway Integration Tests
//!
//! Drive a real client connection against the local mock gateway.
//!
//! Run with: cargo test -p integration-tests --test gateway_tests

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use gatecord::{Client, CloseCode, EventData, GatewayError, Intents, SessionState, Snowflake};
use integration_tests::{
    dispatch, message_payload, ready_payload, ClientFrame, GatewayScript, MockGateway, TEST_TOKEN,
    WAIT,
};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

/// Forward every emission of `event` into a channel
fn capture(client: &Client, event: &str) -> mpsc::UnboundedReceiver<Arc<EventData>> {
    let (tx, rx) = mpsc::unbounded_channel();
    client.on(event, move |data| {
        let tx = tx.clone();
        async move {
            let _ = tx.send(data);
        }
    });
    rx
}

async fn recv(rx: &mut mpsc::UnboundedReceiver<Arc<EventData>>) -> Result<Arc<EventData>> {
    tokio::time::timeout(WAIT, rx.recv())
        .await
        .context("timed out waiting for event")?
        .context("event channel closed")
}

/// Run `login_until` in the background, stopping when the sender fires
fn spawn_login(client: &Client) -> (oneshot::Sender<()>, JoinHandle<Result<(), GatewayError>>) {
    let (stop, stopped) = oneshot::channel::<()>();
    let client = client.clone();
    let handle = tokio::spawn(async move {
        client
            .login_until(async {
                let _ = stopped.await;
            })
            .await
    });
    (stop, handle)
}

async fn join(handle: JoinHandle<Result<(), GatewayError>>) -> Result<Result<(), GatewayError>> {
    Ok(tokio::time::timeout(WAIT, handle).await??)
}

// ============================================================================
// Handshake and dispatch
// ============================================================================

#[tokio::test]
async fn test_hello_identify_dispatch_end_to_end() -> Result<()> {
    let mut gateway = MockGateway::start(GatewayScript {
        heartbeat_interval: 45_000,
        dispatches: vec![
            dispatch("READY", 1, ready_payload()),
            dispatch("MESSAGE_CREATE", 2, message_payload(1001, 42, "hi")),
        ],
        ..GatewayScript::default()
    })
    .await?;

    let client = Client::builder(TEST_TOKEN)
        .intents(Intents::GUILDS | Intents::GUILD_MESSAGES)
        .gateway_url(gateway.url())
        .build();
    let mut ready = capture(&client, "ready");
    let mut messages = capture(&client, "MESSAGE_CREATE");
    let (stop, handle) = spawn_login(&client);

    let ClientFrame::Connected { query } = gateway.next_frame().await? else {
        anyhow::bail!("expected a websocket upgrade first");
    };
    assert_eq!(query.as_deref(), Some("v=10&encoding=json"));

    let identify = gateway.next_payload().await?;
    assert_eq!(identify["op"], 2);
    assert_eq!(identify["d"]["token"], TEST_TOKEN);
    assert_eq!(
        identify["d"]["intents"],
        (Intents::GUILDS | Intents::GUILD_MESSAGES).bits()
    );
    assert!(identify["d"]["properties"]["os"].is_string());

    let heartbeat = gateway.next_payload().await?;
    assert_eq!(heartbeat, serde_json::json!({"op": 1, "d": 0}));

    let ready = recv(&mut ready).await?;
    let ready = ready.as_ready().context("ready should decode to ReadyEvent")?;
    assert_eq!(ready.user.username, "gatecord-test");
    assert_eq!(ready.guilds.len(), 1);

    let message = recv(&mut messages).await?;
    let message = message.as_message().context("message_create should decode to Message")?;
    assert_eq!(message.content, "hi");
    assert_eq!(message.channel_id, Snowflake::new(42));

    assert_eq!(client.gateway().state(), SessionState::Active);
    assert_eq!(client.gateway().last_sequence(), Some(2));
    assert_eq!(
        client.gateway().heartbeat_interval(),
        Some(Duration::from_millis(45_000))
    );

    // Ack for heartbeat 0 lands shortly after it was sent
    tokio::time::timeout(WAIT, async {
        while client.gateway().latency().is_none() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await?;

    let _ = stop.send(());
    assert_eq!(
        gateway.wait_for_close().await?,
        Some(CloseCode::default().as_u16())
    );
    join(handle).await??;
    assert_eq!(client.gateway().state(), SessionState::Disconnected);
    Ok(())
}

#[tokio::test]
async fn test_compressed_stream_end_to_end() -> Result<()> {
    let mut gateway = MockGateway::start(GatewayScript {
        compress: true,
        dispatches: vec![
            dispatch("MESSAGE_CREATE", 1, message_payload(1, 7, "first")),
            dispatch("MESSAGE_CREATE", 2, message_payload(2, 7, &"x".repeat(70_000))),
            dispatch("MESSAGE_CREATE", 3, message_payload(3, 7, "third")),
        ],
        ..GatewayScript::default()
    })
    .await?;

    let client = Client::builder(TEST_TOKEN)
        .compress(true)
        .gateway_url(gateway.url())
        .build();
    let mut messages = capture(&client, "message_create");
    let (stop, handle) = spawn_login(&client);

    let ClientFrame::Connected { query } = gateway.next_frame().await? else {
        anyhow::bail!("expected a websocket upgrade first");
    };
    assert_eq!(
        query.as_deref(),
        Some("v=10&encoding=json&compress=zlib-stream")
    );

    let mut contents = Vec::new();
    for _ in 0..3 {
        let data = recv(&mut messages).await?;
        let message = data.as_message().context("expected a typed message")?;
        contents.push(message.content.len());
    }
    assert_eq!(contents, vec![5, 70_000, 5]);

    let _ = stop.send(());
    join(handle).await??;
    Ok(())
}

#[tokio::test]
async fn test_partial_events_pass_through_raw() -> Result<()> {
    let gateway = MockGateway::start(GatewayScript {
        dispatches: vec![dispatch(
            "MESSAGE_UPDATE",
            1,
            serde_json::json!({"id": "5", "channel_id": "7", "content": "edited"}),
        )],
        ..GatewayScript::default()
    })
    .await?;

    let client = Client::builder(TEST_TOKEN).gateway_url(gateway.url()).build();
    let mut updates = capture(&client, "message_update");
    let (stop, handle) = spawn_login(&client);

    let data = recv(&mut updates).await?;
    let raw = data.as_raw().context("partial payload should stay raw")?;
    assert_eq!(raw["content"], "edited");

    let _ = stop.send(());
    join(handle).await??;
    Ok(())
}

// ============================================================================
// Liveness
// ============================================================================

#[tokio::test]
async fn test_missed_ack_closes_session() -> Result<()> {
    let mut gateway = MockGateway::start(GatewayScript {
        heartbeat_interval: 50,
        ack_heartbeats: false,
        ..GatewayScript::default()
    })
    .await?;

    let client = Client::builder(TEST_TOKEN).gateway_url(gateway.url()).build();
    let result = tokio::time::timeout(WAIT, client.login_until(std::future::pending())).await?;

    assert!(matches!(
        result,
        Err(GatewayError::LivenessFailure { counter: 0, interval_ms: 50 })
    ));
    assert_eq!(
        gateway.wait_for_close().await?,
        Some(CloseCode::SessionTimeout.as_u16())
    );
    assert_eq!(client.gateway().state(), SessionState::Disconnected);
    Ok(())
}

#[tokio::test]
async fn test_acked_session_stays_alive() -> Result<()> {
    let mut gateway = MockGateway::start(GatewayScript {
        heartbeat_interval: 20,
        ..GatewayScript::default()
    })
    .await?;

    let client = Client::builder(TEST_TOKEN).gateway_url(gateway.url()).build();
    let (stop, handle) = spawn_login(&client);

    // Identify, then several heartbeats with increasing counters
    assert_eq!(gateway.next_payload().await?["op"], 2);
    for expected in 0..4 {
        let heartbeat = gateway.next_payload().await?;
        assert_eq!(heartbeat["op"], 1);
        assert_eq!(heartbeat["d"], expected);
    }
    assert_eq!(client.gateway().state(), SessionState::Active);

    let _ = stop.send(());
    join(handle).await??;
    Ok(())
}

// ============================================================================
// Reconnect
// ============================================================================

#[tokio::test]
async fn test_login_again_after_close() -> Result<()> {
    let mut gateway = MockGateway::start(GatewayScript::default()).await?;
    let client = Client::builder(TEST_TOKEN).gateway_url(gateway.url()).build();

    for _ in 0..2 {
        let (stop, handle) = spawn_login(&client);
        assert_eq!(gateway.next_payload().await?["op"], 2);
        let _ = stop.send(());
        assert_eq!(gateway.wait_for_close().await?, Some(4000));
        join(handle).await??;
        assert_eq!(client.gateway().state(), SessionState::Disconnected);
    }
    Ok(())
}
