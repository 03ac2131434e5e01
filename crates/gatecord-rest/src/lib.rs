//! # gatecord-rest
//!
//! Authenticated request/response calls against the REST API, one request in flight at a time.

pub mod error;
pub mod http;
pub mod route;

pub use error::RequestError;
pub use http::{HttpClient, USER_AGENT};
pub use route::{Route, DEFAULT_API_URL};
