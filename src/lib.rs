pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{cli::LocalStorage, CliConfig};

#[cfg(feature = "lambda")]
pub use config::lambda::S3Storage;
pub use config::lambda::LambdaConfig;
pub use config::toml_config::SyncConfig;

pub use crate::core::{diff::diff_all_groups, sync::SyncEngine};
pub use domain::model::{GroupDiff, GroupMapping, GroupSyncSummary, SyncPhase, SyncReport};
pub use utils::error::{Result, SyncError};
