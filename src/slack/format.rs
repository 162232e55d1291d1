//! Slack markup to plain IRC text.
//!
//! Slack escapes `&`, `<` and `>` and wraps links, channel references and
//! broadcasts in angle brackets. User mentions are handled separately by the
//! identity cache, which has to run first.

use regex::{Captures, Regex};
use std::sync::LazyLock;

/// `<target>` or `<target|label>`
static LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<([^<>|\s]+)(?:\|([^<>]*))?>").expect("link pattern is valid")
});

fn render_link(caps: &Captures<'_>) -> String {
    let whole = &caps[0];
    let target = &caps[1];
    let label = caps.get(2).map(|m| m.as_str()).filter(|l| !l.is_empty());

    match target.as_bytes().first() {
        // User mentions belong to the identity cache; whatever is left over is
        // malformed and stays as typed.
        Some(b'@') => whole.to_string(),
        Some(b'#') => match label {
            Some(name) => format!("#{name}"),
            None => target.to_string(),
        },
        Some(b'!') => match label {
            Some(name) => name.to_string(),
            None => {
                let special = target[1..].split('^').next().unwrap_or_default();
                format!("@{special}")
            }
        },
        _ => target.strip_prefix("mailto:").unwrap_or(target).to_string(),
    }
}

/// Undo Slack's HTML-style escaping. `&amp;` goes last so `&amp;lt;`
/// decodes to the literal text `&lt;`.
pub fn unescape(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Strip link markup and unescape entities.
pub fn to_irc_text(text: &str) -> String {
    let delinked = LINK.replace_all(text, |caps: &Captures<'_>| render_link(caps));
    unescape(&delinked)
}
