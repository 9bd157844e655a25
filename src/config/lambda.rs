use crate::adapters::google::DEFAULT_API_BASE_URL;
use crate::adapters::SourceApiConfig;
use crate::config::toml_config::GoogleSettings;
use crate::config::DEFAULT_GROUPS_MAP_FILE;
#[cfg(feature = "lambda")]
use crate::core::Storage;
use crate::utils::error::{Result, SyncError};
use crate::utils::validation::{self, Validate};
#[cfg(feature = "lambda")]
use aws_sdk_s3::Client as S3Client;
use std::env;

pub const DEFAULT_CREDS_FILE: &str = "google-creds.json";
pub const DEFAULT_REGION: &str = "us-east-1";

#[derive(Debug, Clone)]
pub struct LambdaConfig {
    pub s3_bucket: String,
    pub s3_region: String,
    pub groups_map_file: String,
    pub source: SourceApiConfig,
    pub google: GoogleSettings,
}

impl LambdaConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| {
            get(key).ok_or_else(|| SyncError::MissingConfigError {
                field: key.to_string(),
            })
        };

        let timeout_seconds = match get("SOURCE_API_TIMEOUT_SECONDS") {
            Some(raw) => Some(raw.parse::<u64>().map_err(|_| {
                SyncError::InvalidConfigValueError {
                    field: "SOURCE_API_TIMEOUT_SECONDS".to_string(),
                    value: raw.clone(),
                    reason: "Value must be a whole number of seconds".to_string(),
                }
            })?),
            None => None,
        };

        Ok(Self {
            s3_bucket: required("S3_BUCKET_FOR_INPUT")?,
            s3_region: get("S3_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string()),
            groups_map_file: get("GROUPS_MAP_FILE_NAME")
                .unwrap_or_else(|| DEFAULT_GROUPS_MAP_FILE.to_string()),
            source: SourceApiConfig {
                base_url: required("SOURCE_API_BASE_URL")?,
                user: required("SOURCE_API_USER")?,
                pass: required("SOURCE_API_PASS")?,
                timeout_seconds,
            },
            google: GoogleSettings {
                delegated_admin: required("GOOGLE_DELEGATED_ADMIN")?,
                credentials_file: get("GOOGLE_CREDS_FILE_NAME")
                    .unwrap_or_else(|| DEFAULT_CREDS_FILE.to_string()),
                api_base_url: Some(
                    get("GOOGLE_API_BASE_URL").unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
                ),
            },
        })
    }
}

impl Validate for LambdaConfig {
    fn validate(&self) -> Result<()> {
        validate_s3_bucket_name("S3_BUCKET_FOR_INPUT", &self.s3_bucket)?;
        validate_aws_region("S3_REGION", &self.s3_region)?;
        validation::validate_path("GROUPS_MAP_FILE_NAME", &self.groups_map_file)?;
        validation::validate_path("GOOGLE_CREDS_FILE_NAME", &self.google.credentials_file)?;
        validation::validate_url("SOURCE_API_BASE_URL", &self.source.base_url)?;
        if let Some(timeout) = self.source.timeout_seconds {
            validation::validate_range("SOURCE_API_TIMEOUT_SECONDS", timeout, 1, 300)?;
        }
        validation::validate_email("GOOGLE_DELEGATED_ADMIN", &self.google.delegated_admin)?;
        validation::validate_url("GOOGLE_API_BASE_URL", self.google.api_base_url())?;

        tracing::info!("✅ Lambda configuration validation passed");
        Ok(())
    }
}

fn validate_s3_bucket_name(field_name: &str, bucket_name: &str) -> Result<()> {
    if bucket_name.len() < 3 || bucket_name.len() > 63 {
        return Err(SyncError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: bucket_name.to_string(),
            reason: "S3 bucket name must be between 3 and 63 characters".to_string(),
        });
    }

    if !bucket_name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.')
    {
        return Err(SyncError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: bucket_name.to_string(),
            reason: "S3 bucket name can only contain lowercase letters, numbers, hyphens, and dots"
                .to_string(),
        });
    }

    if bucket_name.starts_with('-') || bucket_name.ends_with('-') {
        return Err(SyncError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: bucket_name.to_string(),
            reason: "S3 bucket name cannot start or end with a hyphen".to_string(),
        });
    }

    Ok(())
}

fn validate_aws_region(field_name: &str, region: &str) -> Result<()> {
    validation::validate_non_empty_string(field_name, region)?;

    if !region
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(SyncError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: region.to_string(),
            reason: "AWS region can only contain lowercase letters, numbers, and hyphens"
                .to_string(),
        });
    }

    Ok(())
}

/// Reads objects from a single S3 bucket.
#[cfg(feature = "lambda")]
#[derive(Debug, Clone)]
pub struct S3Storage {
    client: S3Client,
    bucket: String,
}

#[cfg(feature = "lambda")]
impl S3Storage {
    pub fn new(client: S3Client, bucket: String) -> Self {
        Self { client, bucket }
    }
}

#[cfg(feature = "lambda")]
impl Storage for S3Storage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        tracing::debug!("Reading s3://{}/{}", self.bucket, path);
        let resp = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(path)
            .send()
            .await
            .map_err(|e| SyncError::ConfigError {
                message: format!(
                    "Unable to get {} from S3 bucket {}: {}",
                    path,
                    self.bucket,
                    e.into_service_error()
                ),
            })?;

        let data = resp.body.collect().await.map_err(|e| SyncError::ConfigError {
            message: format!("Failed to collect S3 data: {}", e),
        })?;

        Ok(data.into_bytes().to_vec())
    }
}
