//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("irc.server is required")]
    MissingServer,
    #[error("irc.server must be host:port, got '{0}'")]
    InvalidServer(String),
    #[error("irc.channel must start with '#' or '&', got '{0}'")]
    InvalidChannel(String),
    #[error("irc.nickname is required")]
    MissingNickname,
    #[error("irc.nickname must not contain spaces or control characters, got '{0}'")]
    InvalidNickname(String),
    #[error("slack.webhook_url must be an http(s) URL, got '{0}'")]
    InvalidWebhookUrl(String),
    #[error("slack.api_token is required")]
    MissingApiToken,
}

fn has_port(server: &str) -> bool {
    server
        .rsplit_once(':')
        .is_some_and(|(host, port)| !host.is_empty() && port.parse::<u16>().is_ok())
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("https://") || url.starts_with("http://")
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let irc = &config.irc;

    if irc.server.is_empty() {
        errors.push(ValidationError::MissingServer);
    } else if !has_port(&irc.server) {
        errors.push(ValidationError::InvalidServer(irc.server.clone()));
    }

    if !(irc.channel.starts_with('#') || irc.channel.starts_with('&'))
        || irc.channel.contains([' ', ','])
    {
        errors.push(ValidationError::InvalidChannel(irc.channel.clone()));
    }

    if irc.nickname.is_empty() {
        errors.push(ValidationError::MissingNickname);
    } else if irc
        .nickname
        .chars()
        .any(|c| c == ' ' || c.is_control())
    {
        errors.push(ValidationError::InvalidNickname(irc.nickname.clone()));
    }

    if !is_http_url(&config.slack.webhook_url) {
        errors.push(ValidationError::InvalidWebhookUrl(
            config.slack.webhook_url.clone(),
        ));
    }
    if config.slack.api_token.trim().is_empty() {
        errors.push(ValidationError::MissingApiToken);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
