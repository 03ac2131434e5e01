//! Incremental zlib-stream inflater
//!
//! The gateway compresses the whole socket as one continuous zlib stream and
//! sync-flushes at every message boundary. Binary frames are buffered until the
//! buffer ends with the sync-flush marker, then inflated against the persistent
//! stream state.

use flate2::{Decompress, FlushDecompress, Status};

/// Sync-flush marker closing every compressed gateway message
pub const ZLIB_SUFFIX: [u8; 4] = [0x00, 0x00, 0xff, 0xff];

const OUTPUT_CHUNK: usize = 32 * 1024;

/// Errors raised while inflating a compressed message
#[derive(Debug, thiserror::Error)]
pub enum InflateError {
    #[error("corrupt zlib stream: {0}")]
    Corrupt(#[from] flate2::DecompressError),

    #[error("zlib stream made no progress with {remaining} bytes pending")]
    Stalled { remaining: usize },

    #[error("inflated message is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Stateful inflater for one socket lifetime
pub struct Inflater {
    decompress: Decompress,
    buffer: Vec<u8>,
}

impl Inflater {
    /// Create an inflater expecting a zlib header on the first message
    #[must_use]
    pub fn new() -> Self {
        Self {
            decompress: Decompress::new(true),
            buffer: Vec::new(),
        }
    }

    /// Append a binary frame
    ///
    /// Returns `Ok(None)` while the buffered bytes do not end with [`ZLIB_SUFFIX`].
    /// Once they do, the whole buffer is inflated, cleared, and the message text returned.
    pub fn feed(&mut self, chunk: &[u8]) -> Result<Option<String>, InflateError> {
        self.buffer.extend_from_slice(chunk);
        if !self.buffer.ends_with(&ZLIB_SUFFIX) {
            return Ok(None);
        }

        let inflated = self.inflate_buffer();
        self.buffer.clear();
        let bytes = inflated?;
        Ok(Some(String::from_utf8(bytes)?))
    }

    /// Number of compressed bytes waiting for a message boundary
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Total compressed bytes consumed over the stream lifetime
    pub fn total_in(&self) -> u64 {
        self.decompress.total_in()
    }

    /// Total bytes produced over the stream lifetime
    pub fn total_out(&self) -> u64 {
        self.decompress.total_out()
    }

    /// Drop buffered bytes and start a fresh stream (new socket)
    pub fn reset(&mut self) {
        self.decompress.reset(true);
        self.buffer.clear();
    }

    fn inflate_buffer(&mut self) -> Result<Vec<u8>, InflateError> {
        let mut output = Vec::with_capacity(self.buffer.len() * 4);
        let mut chunk = vec![0u8; OUTPUT_CHUNK];
        let mut input = self.buffer.as_slice();

        loop {
            let before_in = self.decompress.total_in();
            let before_out = self.decompress.total_out();
            let status = self
                .decompress
                .decompress(input, &mut chunk, FlushDecompress::Sync)?;

            let consumed = (self.decompress.total_in() - before_in) as usize;
            let produced = (self.decompress.total_out() - before_out) as usize;
            output.extend_from_slice(&chunk[..produced]);
            input = &input[consumed..];

            if status == Status::StreamEnd {
                break;
            }
            if consumed == 0 && produced == 0 {
                if input.is_empty() {
                    break;
                }
                return Err(InflateError::Stalled {
                    remaining: input.len(),
                });
            }
            if input.is_empty() && produced < chunk.len() {
                break;
            }
        }

        Ok(output)
    }
}

impl Default for Inflater {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Inflater {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Inflater")
            .field("buffered", &self.buffer.len())
            .field("total_in", &self.decompress.total_in())
            .field("total_out", &self.decompress.total_out())
            .finish()
    }
}
