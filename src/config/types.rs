//! Core configuration types and loading.

use serde::Deserialize;
use std::collections::HashSet;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use super::defaults::{default_api_base, default_listen, default_reconnect_delay, default_true};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Bridge configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// IRC side: server, channel, identity.
    pub irc: IrcConfig,
    /// Slack side: webhook, listener, API token, filters.
    pub slack: SlackConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

/// IRC connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct IrcConfig {
    /// Server address as `host:port` (e.g., "irc.libera.chat:6697").
    pub server: String,
    /// Channel to bridge (e.g., "#straylight").
    pub channel: String,
    /// Nickname used by the bridge.
    pub nickname: String,
    /// Connect with TLS, verifying against the system roots.
    #[serde(default)]
    pub tls: bool,
    /// Seconds to wait between reconnect attempts.
    #[serde(default = "default_reconnect_delay")]
    pub reconnect_delay_secs: u64,
}

impl IrcConfig {
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_secs(self.reconnect_delay_secs)
    }

    /// Host part of `server`, used for TLS SNI.
    pub fn hostname(&self) -> &str {
        match self.server.rsplit_once(':') {
            Some((host, _port)) => host.trim_start_matches('[').trim_end_matches(']'),
            None => &self.server,
        }
    }
}

/// Slack integration configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SlackConfig {
    /// Incoming-webhook URL messages from IRC are posted to.
    pub webhook_url: String,
    /// Address the Events API endpoint listens on.
    #[serde(default = "default_listen")]
    pub listen: SocketAddr,
    /// Bot token used for `users.info` lookups.
    pub api_token: String,
    /// Web API base URL. Only overridden in tests.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Only relay events from this Slack channel ID, when set.
    #[serde(default)]
    pub channel_id: Option<String>,
    /// Drop bot-authored messages (including our own webhook posts).
    #[serde(default = "default_true")]
    pub ignore_bots: bool,
    /// Slack user IDs whose messages are never relayed.
    #[serde(default)]
    pub ignored_users: HashSet<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const MINIMAL: &str = r##"
[irc]
server = "irc.example.net:6667"
channel = "#bridge"
nickname = "slackbridge"

[slack]
webhook_url = "https://hooks.slack.com/services/T000/B000/XXXX"
api_token = "xoxb-test"
"##;

    #[test]
    fn test_defaults_applied() {
        let config: Config = toml::from_str(MINIMAL).unwrap();
        assert!(!config.irc.tls);
        assert_eq!(config.irc.reconnect_delay(), Duration::from_secs(5));
        assert_eq!(config.slack.listen, default_listen());
        assert_eq!(config.slack.api_base, "https://slack.com/api");
        assert!(config.slack.ignore_bots);
        assert!(config.slack.ignored_users.is_empty());
        assert!(config.slack.channel_id.is_none());
    }

    #[test]
    fn test_ignored_users_parsed() {
        let toml = format!("{MINIMAL}ignored_users = [\"U1\", \"U2\"]\nignore_bots = false\n");
        let config: Config = toml::from_str(&toml).unwrap();
        assert!(config.slack.ignored_users.contains("U1"));
        assert!(config.slack.ignored_users.contains("U2"));
        assert!(!config.slack.ignore_bots);
    }

    #[test]
    fn test_hostname_strips_port() {
        let config: Config = toml::from_str(MINIMAL).unwrap();
        assert_eq!(config.irc.hostname(), "irc.example.net");

        let mut irc = config.irc.clone();
        irc.server = "[2001:db8::1]:6697".into();
        assert_eq!(irc.hostname(), "2001:db8::1");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(MINIMAL.as_bytes()).unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.irc.channel, "#bridge");
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load("/nonexistent/slircbridge.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_missing_section_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[irc]\nserver = \"x:1\"\n").unwrap();

        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
