pub mod diff;
pub mod sync;

pub use crate::domain::model::{GroupDiff, GroupMapping, GroupSyncSummary, SyncPhase, SyncReport};
pub use crate::domain::ports::{DirectoryClient, MemberSource, Storage};
pub use crate::utils::error::Result;
