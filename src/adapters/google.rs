use crate::adapters::google_auth::GoogleAuth;
use crate::core::DirectoryClient;
use crate::utils::error::{Result, SyncError};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use url::Url;

pub const DEFAULT_API_BASE_URL: &str = "https://admin.googleapis.com/admin/directory/v1";
const MEMBER_ROLE: &str = "MEMBER";
const PAGE_SIZE: &str = "200";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MembersPage {
    #[serde(default)]
    members: Vec<MemberEntry>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MemberEntry {
    #[serde(default)]
    email: Option<String>,
}

#[derive(Debug, Serialize)]
struct NewMember<'a> {
    email: &'a str,
    role: &'a str,
}

/// Google Groups membership through the Admin SDK Directory API.
#[derive(Debug)]
pub struct GoogleDirectoryClient {
    client: Client,
    auth: GoogleAuth,
    base_url: Url,
}

impl GoogleDirectoryClient {
    pub fn new(client: Client, auth: GoogleAuth, base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url.trim_end_matches('/')).map_err(|e| {
            SyncError::InvalidConfigValueError {
                field: "google.api_base_url".to_string(),
                value: base_url.to_string(),
                reason: format!("Invalid URL format: {}", e),
            }
        })?;
        Ok(Self {
            client,
            auth,
            base_url,
        })
    }

    /// `{base}/groups/{group}/members[/{member}]`, with each key percent-encoded
    /// as a single path segment.
    fn members_url(&self, group: &str, member: Option<&str>) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| SyncError::ConfigError {
                message: format!("Directory API URL cannot be a base: {}", self.base_url),
            })?;
            segments.pop_if_empty().extend(["groups", group, "members"]);
            if let Some(member) = member {
                segments.push(member);
            }
        }
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let token = self.auth.access_token().await?;
        let response = request.bearer_auth(token).send().await?;
        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            self.auth.invalidate().await;
        }
        Ok(response)
    }

    async fn error_message(response: Response) -> String {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        format!("directory API returned {}: {}", status, body)
    }
}

#[async_trait]
impl DirectoryClient for GoogleDirectoryClient {
    async fn list_members(&self, group: &str) -> Result<Vec<String>> {
        let url = self.members_url(group, None)?;
        let mut members = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .get(url.clone())
                .query(&[("maxResults", PAGE_SIZE)]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token.as_str())]);
            }

            let response = self
                .send(request)
                .await
                .map_err(|e| SyncError::fetch(group, e.to_string()))?;
            if !response.status().is_success() {
                return Err(SyncError::fetch(group, Self::error_message(response).await));
            }

            let page: MembersPage = response
                .json()
                .await
                .map_err(|e| SyncError::fetch(group, format!("malformed member list: {}", e)))?;

            members.extend(page.members.into_iter().filter_map(|m| m.email));

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        tracing::debug!("Google group {} has {} member(s)", group, members.len());
        Ok(members)
    }

    async fn add_members(&self, group: &str, members: &[String]) -> Result<()> {
        if members.is_empty() {
            return Ok(());
        }

        let url = self.members_url(group, None)?;
        for member in members {
            let body = NewMember {
                email: member,
                role: MEMBER_ROLE,
            };
            let response = self
                .send(self.client.post(url.clone()).json(&body))
                .await
                .map_err(|e| SyncError::apply("insert", group, member, e.to_string()))?;
            if !response.status().is_success() {
                let message = Self::error_message(response).await;
                return Err(SyncError::apply("insert", group, member, message));
            }
            tracing::debug!("Inserted {} in Google group {}", member, group);
        }

        Ok(())
    }

    async fn delete_members(&self, group: &str, members: &[String]) -> Result<()> {
        if members.is_empty() {
            return Ok(());
        }

        for member in members {
            let url = self.members_url(group, Some(member.as_str()))?;
            let response = self
                .send(self.client.delete(url))
                .await
                .map_err(|e| SyncError::apply("delete", group, member, e.to_string()))?;
            if !response.status().is_success() {
                let message = Self::error_message(response).await;
                return Err(SyncError::apply("delete", group, member, message));
            }
            tracing::debug!("Deleted {} from Google group {}", member, group);
        }

        Ok(())
    }
}
