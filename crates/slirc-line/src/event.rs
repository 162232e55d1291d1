//! Combined classification and extraction.

use crate::classify::{classify, LineKind};
use crate::extract::{action_text, chat_text, nickname};

/// A raw line reduced to what the bridge relays.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IrcEvent<'a> {
    /// Server keepalive.
    Ping,
    /// `nick` joined.
    Join {
        /// Sender nickname.
        nick: &'a str,
    },
    /// `nick` left.
    Part {
        /// Sender nickname.
        nick: &'a str,
    },
    /// `/me` action.
    Action {
        /// Sender nickname.
        nick: &'a str,
        /// Action payload.
        text: &'a str,
    },
    /// Ordinary chat message.
    Message {
        /// Sender nickname.
        nick: &'a str,
        /// Message text.
        text: &'a str,
    },
    /// Nothing to relay.
    Ignored,
}

/// Reduce a raw line to an [`IrcEvent`].
///
/// User events whose sender nickname cannot be extracted become
/// [`IrcEvent::Ignored`]: there is nobody to attribute them to.
pub fn parse_event(line: &str) -> IrcEvent<'_> {
    let kind = classify(line);
    if kind == LineKind::Ping {
        return IrcEvent::Ping;
    }
    if kind == LineKind::Ignored {
        return IrcEvent::Ignored;
    }

    let Some(nick) = nickname(line) else {
        return IrcEvent::Ignored;
    };

    match kind {
        LineKind::Join => IrcEvent::Join { nick },
        LineKind::Part => IrcEvent::Part { nick },
        LineKind::Action => IrcEvent::Action {
            nick,
            text: action_text(line),
        },
        LineKind::Privmsg => IrcEvent::Message {
            nick,
            text: chat_text(line),
        },
        LineKind::Ping | LineKind::Ignored => IrcEvent::Ignored,
    }
}
