//! REST Integration Tests
//!
//! Exercise the client's request dispatcher against a local mock API.
//!
//! Run with: cargo test -p integration-tests --test rest_tests

use anyhow::Result;
use axum::extract::Path;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use gatecord::{Client, RequestError, Route, Snowflake};
use integration_tests::{message_payload, TestServer, TEST_TOKEN};
use serde_json::{json, Value};

async fn create_message(
    Path(channel_id): Path<u64>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bot {TEST_TOKEN}"));
    if !authorized {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "401: Unauthorized", "code": 0})),
        );
    }

    let content = body["content"].as_str().unwrap_or_default();
    (
        StatusCode::OK,
        Json(message_payload(2001, channel_id, content)),
    )
}

fn api() -> Router {
    Router::new()
        .route("/channels/:id/messages", post(create_message))
        .route(
            "/gateway/limited",
            get(|| async {
                (
                    StatusCode::TOO_MANY_REQUESTS,
                    [("retry-after", "3")],
                    Json(json!({"message": "You are being rate limited.", "retry_after": 2.5, "global": true})),
                )
            }),
        )
        .route(
            "/channels/:id",
            get(|| async {
                (
                    StatusCode::NOT_FOUND,
                    Json(json!({"message": "Unknown Channel", "code": 10003})),
                )
            }),
        )
}

#[tokio::test]
async fn test_create_message_through_client() -> Result<()> {
    let server = TestServer::start(api()).await?;
    let client = Client::builder(TEST_TOKEN)
        .api_base_url(server.base_url())
        .build();

    let message = client
        .http()
        .create_message(Snowflake::new(42), "hello there")
        .await?;

    assert_eq!(message.id, Snowflake::new(2001));
    assert_eq!(message.channel_id, Snowflake::new(42));
    assert_eq!(message.content, "hello there");
    Ok(())
}

#[tokio::test]
async fn test_wrong_token_is_unauthorized() -> Result<()> {
    let server = TestServer::start(api()).await?;
    let client = Client::builder("not-the-token")
        .api_base_url(server.base_url())
        .build();

    let err = client
        .http()
        .create_message(Snowflake::new(42), "hello")
        .await
        .unwrap_err();

    assert!(matches!(err, RequestError::Unauthorized { ref message } if message == "401: Unauthorized"));
    assert_eq!(err.status(), Some(401));
    Ok(())
}

#[tokio::test]
async fn test_rate_limit_prefers_body_retry_after() -> Result<()> {
    let server = TestServer::start(api()).await?;
    let client = Client::builder(TEST_TOKEN)
        .api_base_url(server.base_url())
        .build();

    let err = client
        .http()
        .request(&Route::get("/gateway/limited"), None)
        .await
        .unwrap_err();

    match err {
        RequestError::RateLimited {
            retry_after,
            global,
        } => {
            assert_eq!(retry_after, Some(2.5));
            assert!(global);
        }
        other => anyhow::bail!("expected RateLimited, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn test_not_found_carries_message() -> Result<()> {
    let server = TestServer::start(api()).await?;
    let client = Client::builder(TEST_TOKEN)
        .api_base_url(server.base_url())
        .build();

    let err = client
        .http()
        .get_channel(Snowflake::new(9))
        .await
        .unwrap_err();

    assert!(matches!(err, RequestError::NotFound { ref message } if message == "Unknown Channel"));
    Ok(())
}
