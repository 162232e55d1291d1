//! Line classification.
//!
//! Locates the command token of a raw line (skipping IRCv3 tags and the
//! source prefix) and maps it to the handful of kinds the bridge acts on.

use std::ops::Range;

use crate::ctcp::{ctcp_kind, CtcpKind};
use crate::trim_terminators;

/// What a raw IRC line means to the bridge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LineKind {
    /// Server keepalive; must be answered with PONG.
    Ping,
    /// A user joined a channel.
    Join,
    /// A user left a channel.
    Part,
    /// A PRIVMSG carrying a CTCP ACTION (`/me`).
    Action,
    /// An ordinary PRIVMSG.
    Privmsg,
    /// Anything else: numerics, NOTICE, MODE, other CTCP requests.
    Ignored,
}

/// Byte ranges of the structural parts of a line.
#[derive(Debug, Clone)]
pub(crate) struct Layout {
    /// Source prefix, without the leading `:`.
    pub prefix: Option<Range<usize>>,
    /// Command token.
    pub command: Range<usize>,
    /// End of line content, terminators excluded.
    pub end: usize,
}

impl Layout {
    /// Parameters following the command, including the leading space.
    pub fn params<'a>(&self, line: &'a str) -> &'a str {
        &line[self.command.end..self.end]
    }

    pub fn command<'a>(&self, line: &'a str) -> &'a str {
        &line[self.command.clone()]
    }
}

fn skip_spaces(bytes: &[u8], mut pos: usize, end: usize) -> usize {
    while pos < end && bytes[pos] == b' ' {
        pos += 1;
    }
    pos
}

/// Find tags, prefix and command in a raw line.
///
/// Returns `None` when the line carries no command at all.
pub(crate) fn layout(line: &str) -> Option<Layout> {
    let bytes = line.as_bytes();
    let end = trim_terminators(line).len();
    let mut pos = 0;

    // Tags: @key=value;key2 ... terminated by a space
    if bytes.first() == Some(&b'@') {
        pos = line[..end].find(' ')?;
    }
    pos = skip_spaces(bytes, pos, end);

    let mut prefix = None;
    if pos < end && bytes[pos] == b':' {
        let stop = line[pos..end].find(' ').map_or(end, |i| pos + i);
        prefix = Some(pos + 1..stop);
        pos = skip_spaces(bytes, stop, end);
    }

    let cmd_end = line[pos..end].find(' ').map_or(end, |i| pos + i);
    if cmd_end == pos {
        return None;
    }

    Some(Layout {
        prefix,
        command: pos..cmd_end,
        end,
    })
}

/// The trailing parameter (text after ` :`) of a parameter list.
pub(crate) fn trailing(params: &str) -> Option<&str> {
    params.find(" :").map(|i| &params[i + 2..])
}

/// Classify a raw IRC line.
///
/// ```
/// use slirc_line::{classify, LineKind};
///
/// assert_eq!(classify("PING :irc.example.net\r\n"), LineKind::Ping);
/// assert_eq!(classify(":bob!b@h JOIN #rust\r\n"), LineKind::Join);
/// assert_eq!(classify(":bob!b@h PRIVMSG #rust :\x01ACTION waves\x01\r\n"), LineKind::Action);
/// assert_eq!(classify(":irc.example.net 001 bridge :Welcome\r\n"), LineKind::Ignored);
/// ```
pub fn classify(line: &str) -> LineKind {
    let Some(layout) = layout(line) else {
        return LineKind::Ignored;
    };
    let command = layout.command(line);

    if command.eq_ignore_ascii_case("PING") {
        LineKind::Ping
    } else if command.eq_ignore_ascii_case("JOIN") {
        LineKind::Join
    } else if command.eq_ignore_ascii_case("PART") {
        LineKind::Part
    } else if command.eq_ignore_ascii_case("PRIVMSG") {
        let body = trailing(layout.params(line)).unwrap_or_default();
        match ctcp_kind(body) {
            None => LineKind::Privmsg,
            Some(CtcpKind::Action) => LineKind::Action,
            Some(CtcpKind::Other) => LineKind::Ignored,
        }
    } else {
        LineKind::Ignored
    }
}
