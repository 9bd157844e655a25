// Wiring shared by the CLI and Lambda entrypoints.

use crate::adapters::{
    GoogleAuth, GoogleCredentials, GoogleDirectoryClient, SourceApiClient, SourceApiConfig,
};
use crate::config::parse_groups_map;
use crate::config::toml_config::GoogleSettings;
use crate::core::sync::SyncEngine;
use crate::core::{GroupMapping, Storage};
use crate::utils::error::Result;
use crate::utils::validation::validate_group_mappings;
use reqwest::Client;

pub type GoogleSyncEngine = SyncEngine<SourceApiClient, GoogleDirectoryClient>;

pub async fn load_credentials<S: Storage>(storage: &S, path: &str) -> Result<GoogleCredentials> {
    let data = storage.read_file(path).await?;
    GoogleCredentials::from_json(&data)
}

pub async fn load_groups_map<S: Storage>(storage: &S, path: &str) -> Result<Vec<GroupMapping>> {
    let data = storage.read_file(path).await?;
    let mappings = parse_groups_map(&data)?;
    validate_group_mappings(path, &mappings)?;
    tracing::info!("Loaded {} group pair(s) from {}", mappings.len(), path);
    Ok(mappings)
}

pub fn build_engine(
    source: &SourceApiConfig,
    google: &GoogleSettings,
    credentials: GoogleCredentials,
) -> Result<GoogleSyncEngine> {
    let source_client = SourceApiClient::new(source.clone())?;

    let http_client = Client::builder().timeout(source.timeout()).build()?;
    let auth = GoogleAuth::new(credentials, google.delegated_admin.clone(), http_client.clone())?;
    let directory = GoogleDirectoryClient::new(http_client, auth, google.api_base_url())?;

    Ok(SyncEngine::new(source_client, directory))
}
