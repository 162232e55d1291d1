//! Field extraction from raw lines.
//!
//! These never fail loudly: a miss yields `None` or an empty string and the
//! caller decides whether to skip the line.

use crate::classify::layout;
use crate::ctcp::CTCP_DELIM;
use crate::trim_terminators;

const PRIVMSG_TOKEN: &str = " PRIVMSG ";

/// Sender nickname: the part of the source prefix between `:` and `!`.
///
/// Server-originated lines (no `!` in the prefix) and lines without a prefix
/// yield `None`.
///
/// ```
/// use slirc_line::nickname;
///
/// assert_eq!(nickname(":alice!a@host JOIN #rust\r\n"), Some("alice"));
/// assert_eq!(nickname(":irc.example.net 001 bridge :Welcome\r\n"), None);
/// ```
pub fn nickname(line: &str) -> Option<&str> {
    let layout = layout(line)?;
    let prefix = &line[layout.prefix?];
    let bang = prefix.find('!')?;
    let nick = &prefix[..bang];
    (!nick.is_empty()).then_some(nick)
}

/// Chat text of a PRIVMSG.
///
/// Anchors on the literal ` PRIVMSG ` token so colons in the prefix (IPv6
/// hosts, cloaks) are never mistaken for the trailing-parameter marker.
/// Returns an empty string when the line has no trailing text.
pub fn chat_text(line: &str) -> &str {
    let Some(start) = line.find(PRIVMSG_TOKEN) else {
        return "";
    };
    let after = &line[start + PRIVMSG_TOKEN.len()..];
    match after.find(" :") {
        Some(colon) => trim_terminators(&after[colon + 2..]),
        None => "",
    }
}

/// Payload of a CTCP ACTION: the text after the verb up to the next SOH.
///
/// Only the PRIVMSG trailing parameter is searched, and the verb matches
/// case-insensitively as in [`ctcp_kind`](crate::ctcp::ctcp_kind). Without a
/// closing SOH the payload runs to the end of the line.
pub fn action_text(line: &str) -> &str {
    let Some(inner) = chat_text(line).strip_prefix(CTCP_DELIM) else {
        return "";
    };
    let verb_end = inner
        .find([' ', CTCP_DELIM])
        .unwrap_or(inner.len());
    if !inner[..verb_end].eq_ignore_ascii_case("ACTION") {
        return "";
    }
    let rest = inner[verb_end..].strip_prefix(' ').unwrap_or("");
    match rest.find(CTCP_DELIM) {
        Some(end) => &rest[..end],
        None => rest,
    }
}

/// Build the PONG reply for a PING line.
///
/// The reply is the input with only the command keyword swapped, so the
/// token and the line terminator are echoed untouched. Returns `None` for
/// anything that is not a PING.
///
/// ```
/// use slirc_line::pong;
///
/// assert_eq!(pong("PING :irc.example.net\r\n").as_deref(), Some("PONG :irc.example.net\r\n"));
/// assert_eq!(pong("PRIVMSG #a :PING\r\n"), None);
/// ```
pub fn pong(line: &str) -> Option<String> {
    let layout = layout(line)?;
    if !layout.command(line).eq_ignore_ascii_case("PING") {
        return None;
    }
    Some(format!(
        "{}PONG{}",
        &line[..layout.command.start],
        &line[layout.command.end..]
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nickname_no_bang() {
        assert_eq!(nickname(":justanick PRIVMSG #c :hi\r\n"), None);
    }

    #[test]
    fn test_nickname_without_prefix() {
        assert_eq!(nickname("PING :token\r\n"), None);
    }

    #[test]
    fn test_nickname_bang_only_in_text() {
        assert_eq!(nickname(":irc.example.net NOTICE * :hey!\r\n"), None);
    }

    #[test]
    fn test_nickname_with_tags() {
        assert_eq!(
            nickname("@account=alice :alice!a@h PRIVMSG #c :hi\r\n"),
            Some("alice")
        );
    }

    #[test]
    fn test_chat_text_ipv6_host() {
        let line = ":carol!c@2001:db8::1 PRIVMSG #rust :look: colons\r\n";
        assert_eq!(chat_text(line), "look: colons");
    }

    #[test]
    fn test_chat_text_keeps_inner_colons() {
        assert_eq!(
            chat_text(":a!a@h PRIVMSG #c :time is 12:30 :)\r\n"),
            "time is 12:30 :)"
        );
    }

    #[test]
    fn test_chat_text_missing() {
        assert_eq!(chat_text(":a!a@h PRIVMSG #c\r\n"), "");
        assert_eq!(chat_text(":a!a@h JOIN #c\r\n"), "");
    }

    #[test]
    fn test_chat_text_empty_trailing() {
        assert_eq!(chat_text(":a!a@h PRIVMSG #c :\r\n"), "");
    }

    #[test]
    fn test_action_text_terminated() {
        assert_eq!(
            action_text(":a!a@h PRIVMSG #c :\x01ACTION does a thing\x01\r\n"),
            "does a thing"
        );
    }

    #[test]
    fn test_action_text_unterminated_strips_crlf() {
        assert_eq!(
            action_text(":a!a@h PRIVMSG #c :\x01ACTION waves\r\n"),
            "waves"
        );
    }

    #[test]
    fn test_action_text_bare_action() {
        assert_eq!(action_text(":a!a@h PRIVMSG #c :\x01ACTION\x01\r\n"), "");
    }

    #[test]
    fn test_action_text_channel_named_action() {
        assert_eq!(
            action_text(":bob!b@h PRIVMSG #ACTION :\x01ACTION waves\x01\r\n"),
            "waves"
        );
    }

    #[test]
    fn test_action_text_lowercase_verb() {
        assert_eq!(
            action_text(":bob!b@h PRIVMSG #rust :\x01action shrugs\x01\r\n"),
            "shrugs"
        );
    }

    #[test]
    fn test_action_text_ignores_plain_text() {
        assert_eq!(action_text(":a!a@h PRIVMSG #c :ACTION stations\r\n"), "");
        assert_eq!(action_text(":a!a@h PRIVMSG #c :\x01ACTIONS x\x01\r\n"), "");
    }

    #[test]
    fn test_pong_preserves_prefix_and_params() {
        assert_eq!(
            pong(":irc.example.net PING irc.example.net :abc\r\n").as_deref(),
            Some(":irc.example.net PONG irc.example.net :abc\r\n")
        );
    }

    #[test]
    fn test_pong_without_terminator() {
        assert_eq!(pong("PING 12345").as_deref(), Some("PONG 12345"));
    }
}
