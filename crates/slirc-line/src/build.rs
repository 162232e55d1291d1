//! Outbound command builders.
//!
//! Every builder returns a complete CRLF-terminated line ready to be written
//! to the socket in one piece.

/// `NICK <nick>`
pub fn nick(nick: &str) -> String {
    format!("NICK {nick}\r\n")
}

/// `USER <nick> 8 * :<nick>`
pub fn user(nick: &str) -> String {
    format!("USER {nick} 8 * :{nick}\r\n")
}

/// `JOIN <channel>`
pub fn join(channel: &str) -> String {
    format!("JOIN {channel}\r\n")
}

/// Registration burst sent right after connecting.
pub fn registration(nickname: &str, channel: &str) -> [String; 3] {
    [nick(nickname), user(nickname), join(channel)]
}

/// `PRIVMSG <target> :<text>`
///
/// CR, LF and NUL are dropped from `text` so a relayed message can never
/// smuggle a second protocol line onto the connection.
pub fn privmsg(target: &str, text: &str) -> String {
    let clean: String = text
        .chars()
        .filter(|c| !matches!(c, '\r' | '\n' | '\0'))
        .collect();
    format!("PRIVMSG {target} :{clean}\r\n")
}
