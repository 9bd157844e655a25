use crate::core::GroupMapping;
use crate::utils::error::{Result, SyncError};
use std::collections::HashSet;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(SyncError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(SyncError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(SyncError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(SyncError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(SyncError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(SyncError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(SyncError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// Loose shape check: one `@` with something on both sides and no whitespace.
pub fn validate_email(field_name: &str, value: &str) -> Result<()> {
    let valid = match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !value.chars().any(char::is_whitespace)
        }
        None => false,
    };

    if !valid {
        return Err(SyncError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value must be an email address".to_string(),
        });
    }
    Ok(())
}

pub fn validate_group_mappings(field_name: &str, mappings: &[GroupMapping]) -> Result<()> {
    if mappings.is_empty() {
        return Err(SyncError::MissingConfigError {
            field: field_name.to_string(),
        });
    }

    let mut targets = HashSet::new();
    for (index, mapping) in mappings.iter().enumerate() {
        validate_non_empty_string(&format!("{}[{}].source", field_name, index), &mapping.source)?;
        validate_email(&format!("{}[{}].target", field_name, index), &mapping.target)?;

        if !targets.insert(mapping.target.as_str()) {
            return Err(SyncError::InvalidConfigValueError {
                field: format!("{}[{}].target", field_name, index),
                value: mapping.target.clone(),
                reason: "Target group is configured more than once".to_string(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("source.base_url", "https://example.com").is_ok());
        assert!(validate_url("source.base_url", "http://example.com").is_ok());
        assert!(validate_url("source.base_url", "").is_err());
        assert!(validate_url("source.base_url", "invalid-url").is_err());
        assert!(validate_url("source.base_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("timeout", 30u64, 1, 300).is_ok());
        assert!(validate_range("timeout", 0u64, 1, 300).is_err());
        assert!(validate_range("timeout", 301u64, 1, 300).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("target", "staff@example.org").is_ok());
        assert!(validate_email("target", "staff").is_err());
        assert!(validate_email("target", "@example.org").is_err());
        assert!(validate_email("target", "staff@").is_err());
        assert!(validate_email("target", "a@b@c").is_err());
        assert!(validate_email("target", "st aff@example.org").is_err());
    }

    #[test]
    fn test_validate_group_mappings() {
        let ok = vec![
            GroupMapping::new("/a", "a@example.org"),
            GroupMapping::new("/b", "b@example.org"),
        ];
        assert!(validate_group_mappings("groups", &ok).is_ok());

        assert!(matches!(
            validate_group_mappings("groups", &[]),
            Err(SyncError::MissingConfigError { .. })
        ));

        let duplicate = vec![
            GroupMapping::new("/a", "a@example.org"),
            GroupMapping::new("/b", "a@example.org"),
        ];
        let err = validate_group_mappings("groups", &duplicate).unwrap_err();
        assert!(err.to_string().contains("groups[1].target"));

        let blank_source = vec![GroupMapping::new("  ", "a@example.org")];
        assert!(validate_group_mappings("groups", &blank_source).is_err());
    }
}
