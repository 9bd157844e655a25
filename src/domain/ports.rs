use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
}

/// Source of truth for who should belong to a group.
#[async_trait]
pub trait MemberSource: Send + Sync {
    async fn fetch_members(&self, group: &str) -> Result<Vec<String>>;
}

/// The managed directory whose group membership gets reconciled.
///
/// `add_members` and `delete_members` must treat an empty slice as a no-op.
#[async_trait]
pub trait DirectoryClient: Send + Sync {
    async fn list_members(&self, group: &str) -> Result<Vec<String>>;
    async fn add_members(&self, group: &str, members: &[String]) -> Result<()>;
    async fn delete_members(&self, group: &str, members: &[String]) -> Result<()>;
}
