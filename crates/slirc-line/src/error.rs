//! Error types for line framing.

use thiserror::Error;

/// Convenience type alias for Results using [`LineError`].
pub type Result<T, E = LineError> = std::result::Result<T, E>;

/// Errors produced while framing lines off a byte stream.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LineError {
    /// I/O error during reading.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Line exceeded the maximum allowed length.
    #[error("line too long: {actual} bytes (limit: {limit})")]
    LineTooLong {
        /// Actual line length seen so far.
        actual: usize,
        /// Maximum allowed length.
        limit: usize,
    },
}
