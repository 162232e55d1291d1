//! CTCP framing inside PRIVMSG bodies.
//!
//! CTCP requests are wrapped in `\x01` (SOH) bytes. The bridge only cares
//! about `ACTION` (the `/me` command); every other request is noise.
//!
//! # Reference
//! - CTCP specification: <https://modern.ircdocs.horse/ctcp.html>

/// The CTCP delimiter character (`\x01`).
pub const CTCP_DELIM: char = '\x01';

/// CTCP request kinds the bridge distinguishes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CtcpKind {
    /// ACTION - describes an action performed by the user.
    Action,
    /// Any other CTCP request (VERSION, PING, TIME, ...).
    Other,
}

/// Inspect a PRIVMSG body and report whether it is CTCP-framed.
///
/// Returns `None` for ordinary text. A missing closing delimiter is
/// tolerated, since several clients omit it.
///
/// ```
/// use slirc_line::ctcp::{ctcp_kind, CtcpKind};
///
/// assert_eq!(ctcp_kind("\x01ACTION waves\x01"), Some(CtcpKind::Action));
/// assert_eq!(ctcp_kind("\x01VERSION\x01"), Some(CtcpKind::Other));
/// assert_eq!(ctcp_kind("plain text"), None);
/// ```
pub fn ctcp_kind(body: &str) -> Option<CtcpKind> {
    let inner = body.strip_prefix(CTCP_DELIM)?;
    let inner = inner.strip_suffix(CTCP_DELIM).unwrap_or(inner);
    let command = inner.split(' ').next().unwrap_or_default();

    if command.eq_ignore_ascii_case("ACTION") {
        Some(CtcpKind::Action)
    } else {
        Some(CtcpKind::Other)
    }
}
