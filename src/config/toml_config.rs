use crate::adapters::google::DEFAULT_API_BASE_URL;
use crate::adapters::SourceApiConfig;
use crate::core::GroupMapping;
use crate::utils::error::{Result, SyncError};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([^}]+)\}").expect("static env var pattern")
});

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    pub source: SourceApiConfig,
    pub google: GoogleSettings,
    #[serde(default)]
    pub groups: Vec<GroupMapping>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleSettings {
    pub delegated_admin: String,
    pub credentials_file: String,
    pub api_base_url: Option<String>,
}

impl GoogleSettings {
    pub fn api_base_url(&self) -> &str {
        self.api_base_url.as_deref().unwrap_or(DEFAULT_API_BASE_URL)
    }
}

impl SyncConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SyncError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);
        Ok(toml::from_str(&processed_content)?)
    }

    /// 替換環境變數 (例如 ${SOURCE_API_PASS})，未設定的變數保留原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }
}

impl Validate for SyncConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("source.base_url", &self.source.base_url)?;
        validation::validate_non_empty_string("source.user", &self.source.user)?;
        validation::validate_non_empty_string("source.pass", &self.source.pass)?;
        if let Some(timeout) = self.source.timeout_seconds {
            validation::validate_range("source.timeout_seconds", timeout, 1, 300)?;
        }

        validation::validate_email("google.delegated_admin", &self.google.delegated_admin)?;
        validation::validate_path("google.credentials_file", &self.google.credentials_file)?;
        if let Some(url) = &self.google.api_base_url {
            validation::validate_url("google.api_base_url", url)?;
        }

        validation::validate_group_mappings("groups", &self.groups)?;

        tracing::debug!("✅ Sync configuration validation passed");
        Ok(())
    }
}
