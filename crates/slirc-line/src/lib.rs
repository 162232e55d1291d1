//! # slirc-line
//!
//! Raw IRC line handling for the slirc bridge.
//!
//! Unlike a full message parser, everything here works directly on the line
//! as it came off the wire: classification, sender/text extraction and PONG
//! construction are plain string slicing with no allocation on the read path.
//!
//! ```rust
//! use slirc_line::{classify, chat_text, nickname, LineKind};
//!
//! let line = ":alice!a@example.com PRIVMSG #rust :hello there\r\n";
//! assert_eq!(classify(line), LineKind::Privmsg);
//! assert_eq!(nickname(line), Some("alice"));
//! assert_eq!(chat_text(line), "hello there");
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod build;
pub mod classify;
pub mod ctcp;
pub mod error;
pub mod event;
pub mod extract;
#[cfg(feature = "tokio")]
pub mod line;

pub use self::classify::{classify, LineKind};
pub use self::error::{LineError, Result};
pub use self::event::{parse_event, IrcEvent};
pub use self::extract::{action_text, chat_text, nickname, pong};
#[cfg(feature = "tokio")]
pub use self::line::LineCodec;

/// Characters that terminate an IRC line on the wire.
pub const LINE_TERMINATORS: [char; 2] = ['\r', '\n'];

/// Strip trailing CR/LF characters.
#[inline]
pub fn trim_terminators(s: &str) -> &str {
    s.trim_end_matches(LINE_TERMINATORS)
}
