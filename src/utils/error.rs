use crate::domain::model::SyncPhase;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Unable to get members of group {group}: {message}")]
    FetchError { group: String, message: String },

    #[error("Unable to {action} {member} in group {group}: {message}")]
    ApplyError {
        group: String,
        member: String,
        action: &'static str,
        message: String,
    },

    #[error("Authentication error: {message}")]
    AuthError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("{phase} failed for {source_group} -> {target_group}: {source}")]
    RunFailed {
        phase: SyncPhase,
        source_group: String,
        target_group: String,
        #[source]
        source: Box<SyncError>,
    },
}

impl SyncError {
    pub fn fetch(group: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FetchError {
            group: group.into(),
            message: message.into(),
        }
    }

    pub fn apply(
        action: &'static str,
        group: impl Into<String>,
        member: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::ApplyError {
            group: group.into(),
            member: member.into(),
            action,
            message: message.into(),
        }
    }

    /// Phase the run was in when it failed, if this error came out of a sync run.
    pub fn phase(&self) -> Option<SyncPhase> {
        match self {
            Self::RunFailed { phase, .. } => Some(*phase),
            _ => None,
        }
    }

    /// One-line failure report for a run that did not finish. A failed run has
    /// no partial summary, so the completion count is always `Unknown`.
    pub fn failure_report(&self) -> String {
        match self.phase() {
            Some(phase) => format!(
                "Group sync failed during {}: {}. Group pairs completed: Unknown",
                phase, self
            ),
            None => format!("Group sync failed: {}. Group pairs completed: Unknown", self),
        }
    }

    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigError { .. }
                | Self::MissingConfigError { .. }
                | Self::InvalidConfigValueError { .. }
                | Self::TomlError(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_report_of_run_error() {
        let error = SyncError::RunFailed {
            phase: SyncPhase::Applying,
            source_group: "/groups/staff".to_string(),
            target_group: "staff@example.org".to_string(),
            source: Box::new(SyncError::apply(
                "insert",
                "staff@example.org",
                "gg@example.org",
                "directory API returned 403 Forbidden",
            )),
        };

        let report = error.failure_report();

        assert!(report.starts_with("Group sync failed during "));
        assert!(report.contains("staff@example.org"));
        assert!(report.ends_with("Group pairs completed: Unknown"));
    }

    #[test]
    fn test_failure_report_of_plain_error() {
        let error = SyncError::fetch("/groups/staff", "source API returned 503");

        assert_eq!(
            error.failure_report(),
            format!("Group sync failed: {}. Group pairs completed: Unknown", error)
        );
    }
}
