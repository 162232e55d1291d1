//! Slack Web API client.
//!
//! Only `users.info` is needed: the identity cache resolves user IDs found
//! in events and mentions to human-readable names.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::error::{SlackError, SlackResult};

/// Source of user profiles, keyed by Slack user ID.
#[async_trait]
pub trait ProfileLookup: Send + Sync {
    async fn lookup(&self, user_id: &str) -> SlackResult<UserProfile>;
}

/// The subset of a Slack profile the bridge uses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub real_name: String,
}

impl UserProfile {
    /// Display name, falling back to real name. `None` when both are empty.
    pub fn best_name(&self) -> Option<&str> {
        [self.display_name.as_str(), self.real_name.as_str()]
            .into_iter()
            .find(|name| !name.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct UsersInfoResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    user: Option<UserInfo>,
}

#[derive(Debug, Deserialize)]
struct UserInfo {
    #[serde(default)]
    profile: UserProfile,
}

/// Authenticated Slack Web API client.
pub struct SlackApi {
    client: reqwest::Client,
    base: String,
    token: String,
}

impl SlackApi {
    pub fn new(client: reqwest::Client, base: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client,
            base: base.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    /// `GET users.info?user=<id>`
    pub async fn users_info(&self, user_id: &str) -> SlackResult<UserProfile> {
        let url = format!("{}/users.info", self.base);

        let response = self
            .client
            .get(&url)
            .query(&[("user", user_id)])
            .bearer_auth(&self.token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SlackError::Status(response.status()));
        }

        let body: UsersInfoResponse = response.json().await?;
        if !body.ok {
            return Err(SlackError::Api(
                body.error.unwrap_or_else(|| "unknown_error".to_string()),
            ));
        }

        let profile = body
            .user
            .map(|u| u.profile)
            .ok_or_else(|| SlackError::Api("response missing user".to_string()))?;
        debug!(user = %user_id, display_name = %profile.display_name, "Fetched Slack profile");
        Ok(profile)
    }
}

#[async_trait]
impl ProfileLookup for SlackApi {
    async fn lookup(&self, user_id: &str) -> SlackResult<UserProfile> {
        self.users_info(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn api_for(server: &MockServer) -> SlackApi {
        SlackApi::new(reqwest::Client::new(), server.uri(), "xoxb-test")
    }

    #[test]
    fn test_best_name_fallbacks() {
        let both = UserProfile {
            display_name: "ali".into(),
            real_name: "Alice Liddell".into(),
        };
        assert_eq!(both.best_name(), Some("ali"));

        let real_only = UserProfile {
            display_name: String::new(),
            real_name: "Alice Liddell".into(),
        };
        assert_eq!(real_only.best_name(), Some("Alice Liddell"));

        assert_eq!(UserProfile::default().best_name(), None);
    }

    #[tokio::test]
    async fn test_users_info_sends_token_and_parses_profile() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users.info"))
            .and(query_param("user", "U123"))
            .and(header("authorization", "Bearer xoxb-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ok": true,
                "user": {
                    "id": "U123",
                    "profile": { "display_name": "alice", "real_name": "Alice L" }
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let profile = api_for(&server).users_info("U123").await.unwrap();
        assert_eq!(profile.display_name, "alice");
        assert_eq!(profile.real_name, "Alice L");
    }

    #[tokio::test]
    async fn test_users_info_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users.info"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "ok": false, "error": "user_not_found" })),
            )
            .mount(&server)
            .await;

        let err = api_for(&server).users_info("UNOPE").await.unwrap_err();
        assert!(matches!(err, SlackError::Api(ref e) if e == "user_not_found"));
    }

    #[tokio::test]
    async fn test_users_info_http_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = api_for(&server).users_info("U1").await.unwrap_err();
        assert!(matches!(err, SlackError::Status(s) if s.as_u16() == 503));
    }

    #[tokio::test]
    async fn test_users_info_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = api_for(&server).users_info("U1").await.unwrap_err();
        assert!(matches!(err, SlackError::Http(_)));
    }
}
