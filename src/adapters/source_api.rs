use crate::core::MemberSource;
use crate::utils::error::{Result, SyncError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Connection settings for the source-of-truth membership API.
#[derive(Clone, Serialize, Deserialize)]
pub struct SourceApiConfig {
    pub base_url: String,
    pub user: String,
    pub pass: String,
    pub timeout_seconds: Option<u64>,
}

impl SourceApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS))
    }
}

impl fmt::Debug for SourceApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceApiConfig")
            .field("base_url", &self.base_url)
            .field("user", &self.user)
            .field("pass", &"[REDACTED]")
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

/// Fetches group members over HTTP.
///
/// `GET {base_url}{group}` with basic auth; the body must be a JSON array of
/// member email addresses.
#[derive(Debug)]
pub struct SourceApiClient {
    client: Client,
    config: SourceApiConfig,
}

impl SourceApiClient {
    pub fn new(config: SourceApiConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self { client, config })
    }

    fn group_url(&self, group: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), group)
    }
}

#[async_trait]
impl MemberSource for SourceApiClient {
    async fn fetch_members(&self, group: &str) -> Result<Vec<String>> {
        let url = self.group_url(group);
        tracing::debug!("Making source API request to: {}", url);

        let response = self
            .client
            .get(&url)
            .basic_auth(&self.config.user, Some(&self.config.pass))
            .send()
            .await
            .map_err(|e| SyncError::fetch(group, format!("request failed: {}", e)))?;

        tracing::debug!("Source API response status: {}", response.status());

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SyncError::fetch(
                group,
                format!("source API returned {}: {}", status, body),
            ));
        }

        let members: Vec<String> = response
            .json()
            .await
            .map_err(|e| SyncError::fetch(group, format!("malformed member list: {}", e)))?;

        tracing::debug!("Source group {} has {} member(s)", group, members.len());
        Ok(members)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn config(base_url: String) -> SourceApiConfig {
        SourceApiConfig {
            base_url,
            user: "test".to_string(),
            pass: "test".to_string(),
            timeout_seconds: Some(5),
        }
    }

    #[tokio::test]
    async fn test_fetch_members_for_two_groups() {
        let server = MockServer::start();

        let group1 = server.mock(|when, then| {
            when.method(GET)
                .path("/group1")
                .header("Authorization", "Basic dGVzdDp0ZXN0");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!([
                    "user1@domain.com",
                    "user2@domain.com",
                    "user3@domain.com"
                ]));
        });
        let group2 = server.mock(|when, then| {
            when.method(GET).path("/group2");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!(["user1@domain.com", "user2@domain.com"]));
        });

        let client = SourceApiClient::new(config(server.base_url())).unwrap();

        let members1 = client.fetch_members("/group1").await.unwrap();
        let members2 = client.fetch_members("/group2").await.unwrap();

        group1.assert();
        group2.assert();
        assert_eq!(
            members1,
            vec!["user1@domain.com", "user2@domain.com", "user3@domain.com"]
        );
        assert_eq!(members2.len(), 2);
    }

    #[tokio::test]
    async fn test_trailing_slash_on_base_url() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/api/groups/staff");
            then.status(200).json_body(serde_json::json!([]));
        });

        let client = SourceApiClient::new(config(server.url("/api/"))).unwrap();
        let members = client.fetch_members("/groups/staff").await.unwrap();

        mock.assert();
        assert!(members.is_empty());
    }

    #[tokio::test]
    async fn test_error_status_is_fetch_error() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/broken");
            then.status(500).body("boom");
        });

        let client = SourceApiClient::new(config(server.base_url())).unwrap();
        let err = client.fetch_members("/broken").await.unwrap_err();

        mock.assert();
        match err {
            SyncError::FetchError { group, message } => {
                assert_eq!(group, "/broken");
                assert!(message.contains("500"));
                assert!(message.contains("boom"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_fetch_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/objects");
            then.status(200)
                .json_body(serde_json::json!([{"email": "user1@domain.com"}]));
        });

        let client = SourceApiClient::new(config(server.base_url())).unwrap();
        let err = client.fetch_members("/objects").await.unwrap_err();

        assert!(matches!(err, SyncError::FetchError { .. }));
    }

    #[test]
    fn test_debug_redacts_password() {
        let mut cfg = config("https://example.org".to_string());
        cfg.pass = "hunter2".to_string();
        let printed = format!("{:?}", cfg);
        assert!(!printed.contains("hunter2"));
        assert!(printed.contains("[REDACTED]"));
    }
}
