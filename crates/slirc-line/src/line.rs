//! Line-based codec for tokio.
//!
//! Reads newline-terminated lines off an IRC connection. The terminator is
//! kept on the returned string so downstream code sees the line exactly as
//! the server sent it. Invalid UTF-8 is replaced rather than rejected: one
//! badly encoded message must not tear down the whole session.

use bytes::BytesMut;
use tokio_util::codec::Decoder;

use crate::error::{LineError, Result};

/// Default line limit: 8191 bytes of IRCv3 tags plus the classic 512.
pub const DEFAULT_MAX_LEN: usize = 8191 + 512;

/// Line-based decoder for newline-terminated IRC lines.
#[derive(Debug)]
pub struct LineCodec {
    /// Index of next byte to check for newline
    next_index: usize,
    /// Maximum line length
    max_len: usize,
}

impl LineCodec {
    /// Create a codec with the default length limit.
    pub fn new() -> Self {
        Self::with_max_len(DEFAULT_MAX_LEN)
    }

    /// Create a codec with a custom max line length.
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            next_index: 0,
            max_len,
        }
    }
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for LineCodec {
    type Item = String;
    type Error = LineError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<String>> {
        // Look for newline starting from where we left off
        if let Some(offset) = src[self.next_index..].iter().position(|b| *b == b'\n') {
            let line = src.split_to(self.next_index + offset + 1);
            self.next_index = 0;

            if line.len() > self.max_len {
                return Err(LineError::LineTooLong {
                    actual: line.len(),
                    limit: self.max_len,
                });
            }

            Ok(Some(String::from_utf8_lossy(&line).into_owned()))
        } else {
            // No complete line yet - remember where we stopped
            self.next_index = src.len();

            if src.len() > self.max_len {
                return Err(LineError::LineTooLong {
                    actual: src.len(),
                    limit: self.max_len,
                });
            }

            Ok(None)
        }
    }
}
