//! Transport compression
//!
//! Reassembles the `zlib-stream` transport into JSON text frames.

mod inflater;

pub use inflater::{InflateError, Inflater, ZLIB_SUFFIX};
