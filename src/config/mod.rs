#[cfg(feature = "cli")]
pub mod cli;
pub mod lambda;
pub mod toml_config;

use crate::core::GroupMapping;
use crate::utils::error::{Result, SyncError};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

pub const DEFAULT_GROUPS_MAP_FILE: &str = "groups-map.json";

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "groups-sync")]
#[command(about = "Sync Google Group membership with a source-of-truth API")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "groups-sync.toml")]
    pub config: String,

    /// JSON groups map replacing the [[groups]] entries of the config file
    #[arg(long)]
    pub groups_map: Option<String>,

    /// Compute and report the changes without applying them
    #[arg(long)]
    pub dry_run: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

/// Parses a groups map: a JSON array of `{"source": ..., "target": ...}` objects.
/// A `["source", "target"]` pair is accepted in place of an object.
pub fn parse_groups_map(data: &[u8]) -> Result<Vec<GroupMapping>> {
    serde_json::from_slice(data).map_err(|e| SyncError::ConfigError {
        message: format!("Invalid groups map: {}", e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_groups_map() {
        let data = br#"[
            {"source": "/groups/staff", "target": "staff@example.org"},
            {"source": "/groups/faculty", "target": "faculty@example.org"}
        ]"#;

        let mappings = parse_groups_map(data).unwrap();

        assert_eq!(mappings.len(), 2);
        assert_eq!(mappings[1], GroupMapping::new("/groups/faculty", "faculty@example.org"));
    }

    #[test]
    fn test_parse_groups_map_accepts_pairs() {
        let data = br#"[
            ["/groups/staff", "staff@example.org"],
            {"source": "/groups/faculty", "target": "faculty@example.org"}
        ]"#;

        let mappings = parse_groups_map(data).unwrap();

        assert_eq!(
            mappings,
            vec![
                GroupMapping::new("/groups/staff", "staff@example.org"),
                GroupMapping::new("/groups/faculty", "faculty@example.org"),
            ]
        );
    }

    #[test]
    fn test_parse_groups_map_rejects_other_shapes() {
        assert!(parse_groups_map(br#"{"source": "/a", "target": "a@example.org"}"#).is_err());
        assert!(parse_groups_map(br#"[["/a"]]"#).is_err());
        assert!(parse_groups_map(br#"[["/a", "a@example.org", "extra"]]"#).is_err());
        assert!(parse_groups_map(b"not json").is_err());
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_cli_args() {
        let config = CliConfig::parse_from([
            "groups-sync",
            "--config",
            "sync.toml",
            "--groups-map",
            "map.json",
            "--dry-run",
        ]);

        assert_eq!(config.config, "sync.toml");
        assert_eq!(config.groups_map.as_deref(), Some("map.json"));
        assert!(config.dry_run);
        assert!(!config.verbose);
    }
}
