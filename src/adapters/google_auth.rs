//! Google service-account authentication (OAuth2 JWT bearer grant with
//! domain-wide delegation).

use crate::utils::error::{Result, SyncError};
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

pub const GROUP_SCOPE: &str = "https://www.googleapis.com/auth/admin.directory.group";
pub const GROUP_MEMBER_SCOPE: &str =
    "https://www.googleapis.com/auth/admin.directory.group.member";
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
const EXPIRY_MARGIN_SECS: u64 = 60;

/// The parts of a service-account JSON key file we need.
#[derive(Clone, Deserialize)]
pub struct GoogleCredentials {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl GoogleCredentials {
    pub fn from_json(data: &[u8]) -> Result<Self> {
        serde_json::from_slice(data).map_err(|e| SyncError::ConfigError {
            message: format!("Invalid Google credentials file: {}", e),
        })
    }
}

impl fmt::Debug for GoogleCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoogleCredentials")
            .field("client_email", &self.client_email)
            .field("private_key", &"[REDACTED]")
            .field("private_key_id", &self.private_key_id)
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct Claims<'a> {
    iss: &'a str,
    sub: &'a str,
    scope: String,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: Option<Instant>,
}

impl CachedToken {
    fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(exp) => Instant::now() >= exp,
            None => false,
        }
    }
}

/// Access-token provider for the Admin Directory API, acting as
/// `delegated_admin`.
#[derive(Clone)]
pub struct GoogleAuth {
    credentials: GoogleCredentials,
    delegated_admin: String,
    scopes: Vec<String>,
    key: EncodingKey,
    http_client: Client,
    cached_token: Arc<RwLock<Option<CachedToken>>>,
}

impl GoogleAuth {
    pub fn new(
        credentials: GoogleCredentials,
        delegated_admin: impl Into<String>,
        http_client: Client,
    ) -> Result<Self> {
        let key = EncodingKey::from_rsa_pem(credentials.private_key.as_bytes()).map_err(|e| {
            SyncError::ConfigError {
                message: format!("Invalid service account private key: {}", e),
            }
        })?;

        Ok(Self {
            credentials,
            delegated_admin: delegated_admin.into(),
            scopes: vec![GROUP_SCOPE.to_string(), GROUP_MEMBER_SCOPE.to_string()],
            key,
            http_client,
            cached_token: Arc::new(RwLock::new(None)),
        })
    }

    fn assertion(&self) -> Result<String> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            iss: &self.credentials.client_email,
            sub: &self.delegated_admin,
            scope: self.scopes.join(" "),
            aud: &self.credentials.token_uri,
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        };

        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.credentials.private_key_id.clone();

        encode(&header, &claims, &self.key).map_err(|e| SyncError::AuthError {
            message: format!("Unable to sign token request: {}", e),
        })
    }

    /// Returns a cached access token, or exchanges a fresh assertion for one.
    pub async fn access_token(&self) -> Result<String> {
        {
            let cache = self.cached_token.read().await;
            if let Some(cached) = cache.as_ref() {
                if !cached.is_expired() {
                    return Ok(cached.access_token.clone());
                }
            }
        }

        tracing::debug!(
            "Requesting Google access token for {} from {}",
            self.delegated_admin,
            self.credentials.token_uri
        );
        let assertion = self.assertion()?;
        let response = self
            .http_client
            .post(&self.credentials.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| SyncError::AuthError {
                message: format!("Token request failed: {}", e),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            return Err(SyncError::AuthError {
                message: format!("Token endpoint returned {}: {}", status, body),
            });
        }

        let token: TokenResponse = response.json().await.map_err(|e| SyncError::AuthError {
            message: format!("Failed to parse token response: {}", e),
        })?;

        let expires_at = token.expires_in.map(|secs| {
            Instant::now() + Duration::from_secs(secs.saturating_sub(EXPIRY_MARGIN_SECS))
        });

        let mut cache = self.cached_token.write().await;
        *cache = Some(CachedToken {
            access_token: token.access_token.clone(),
            expires_at,
        });

        Ok(token.access_token)
    }

    pub async fn invalidate(&self) {
        *self.cached_token.write().await = None;
    }
}

impl fmt::Debug for GoogleAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoogleAuth")
            .field("credentials", &self.credentials)
            .field("delegated_admin", &self.delegated_admin)
            .field("scopes", &self.scopes)
            .finish()
    }
}
