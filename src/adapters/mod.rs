// Adapters layer: concrete implementations of the member source and directory ports.

pub mod google;
pub mod google_auth;
pub mod source_api;

pub use google::GoogleDirectoryClient;
pub use google_auth::{GoogleAuth, GoogleCredentials};
pub use source_api::{SourceApiClient, SourceApiConfig};
