//! Request errors, one variant per response status class

use reqwest::StatusCode;
use serde_json::Value;

/// Errors raised by a single REST call
///
/// None of these are retried by the dispatcher.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    /// 400
    #[error("bad request: {message}")]
    BadRequest { message: String },

    /// 401
    #[error("request not authenticated: {message}")]
    Unauthorized { message: String },

    /// 403
    #[error("missing permission: {message}")]
    Forbidden { message: String },

    /// 404
    #[error("not found: {message}")]
    NotFound { message: String },

    /// 429
    #[error("rate limited (retry after {}s)", .retry_after.unwrap_or_default())]
    RateLimited {
        /// Seconds to wait, from the body or the `Retry-After` header
        retry_after: Option<f64>,
        global: bool,
    },

    /// 5xx
    #[error("server error ({status})")]
    ServerError { status: u16 },

    /// Any other status
    #[error("unexpected status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl RequestError {
    /// Map an unsuccessful response to its error variant
    pub fn from_response(status: StatusCode, body: &[u8], retry_after_header: Option<f64>) -> Self {
        let json: Option<Value> = serde_json::from_slice(body).ok();
        let message = json
            .as_ref()
            .and_then(|v| v.get("message"))
            .and_then(Value::as_str)
            .map_or_else(|| String::from_utf8_lossy(body).into_owned(), str::to_string);

        match status.as_u16() {
            400 => Self::BadRequest { message },
            401 => Self::Unauthorized { message },
            403 => Self::Forbidden { message },
            404 => Self::NotFound { message },
            429 => {
                let body_retry = json
                    .as_ref()
                    .and_then(|v| v.get("retry_after"))
                    .and_then(Value::as_f64);
                let global = json
                    .as_ref()
                    .and_then(|v| v.get("global"))
                    .and_then(Value::as_bool)
                    .unwrap_or(false);
                Self::RateLimited {
                    retry_after: body_retry.or(retry_after_header),
                    global,
                }
            }
            code @ 500..=599 => Self::ServerError { status: code },
            code => Self::UnexpectedStatus {
                status: code,
                body: String::from_utf8_lossy(body).into_owned(),
            },
        }
    }

    /// HTTP status behind this error, if one was received
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::BadRequest { .. } => Some(400),
            Self::Unauthorized { .. } => Some(401),
            Self::Forbidden { .. } => Some(403),
            Self::NotFound { .. } => Some(404),
            Self::RateLimited { .. } => Some(429),
            Self::ServerError { status } | Self::UnexpectedStatus { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            Self::Decode(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(status: u16, body: &str) -> RequestError {
        RequestError::from_response(StatusCode::from_u16(status).unwrap(), body.as_bytes(), None)
    }

    #[test]
    fn test_status_classes() {
        assert!(matches!(map(400, "{}"), RequestError::BadRequest { .. }));
        assert!(matches!(map(401, "{}"), RequestError::Unauthorized { .. }));
        assert!(matches!(map(403, "{}"), RequestError::Forbidden { .. }));
        assert!(matches!(map(404, "{}"), RequestError::NotFound { .. }));
        assert!(matches!(map(500, ""), RequestError::ServerError { status: 500 }));
        assert!(matches!(map(502, ""), RequestError::ServerError { status: 502 }));
        assert!(matches!(map(418, "teapot"), RequestError::UnexpectedStatus { status: 418, .. }));
    }

    #[test]
    fn test_message_from_json_body() {
        match map(403, r#"{"message": "Missing Access", "code": 50001}"#) {
            RequestError::Forbidden { message } => assert_eq!(message, "Missing Access"),
            other => panic!("unexpected {other:?}"),
        }
        match map(400, "plain text") {
            RequestError::BadRequest { message } => assert_eq!(message, "plain text"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_rate_limit_retry_after() {
        match map(429, r#"{"message": "You are being rate limited.", "retry_after": 1.5, "global": true}"#) {
            RequestError::RateLimited { retry_after, global } => {
                assert_eq!(retry_after, Some(1.5));
                assert!(global);
            }
            other => panic!("unexpected {other:?}"),
        }

        let from_header =
            RequestError::from_response(StatusCode::TOO_MANY_REQUESTS, b"", Some(3.0));
        assert!(matches!(
            from_header,
            RequestError::RateLimited { retry_after: Some(r), global: false } if (r - 3.0).abs() < f64::EPSILON
        ));
    }

    #[test]
    fn test_status_accessor() {
        assert_eq!(map(429, "{}").status(), Some(429));
        assert_eq!(map(503, "").status(), Some(503));
        assert_eq!(map(401, "").to_string(), "request not authenticated: ");
    }
}
