//! Integration test utilities for the gatecord client
//!
//! Local servers impersonating the remote gateway and REST API, plus payload
//! fixtures shared by the end-to-end tests.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
