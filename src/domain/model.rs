use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A configured correspondence between a source group and a target group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMapping {
    pub source: String,
    pub target: String,
}

impl GroupMapping {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// Membership state of one group pair during a sync run.
///
/// `members_to_add` and `members_to_delete` are only meaningful after both
/// member lists have been populated and the diff has been computed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupDiff {
    pub source_group: String,
    pub target_group: String,
    pub source_members: Vec<String>,
    pub target_members: Vec<String>,
    pub members_to_add: Vec<String>,
    pub members_to_delete: Vec<String>,
}

impl GroupDiff {
    pub fn new(source_group: impl Into<String>, target_group: impl Into<String>) -> Self {
        Self {
            source_group: source_group.into(),
            target_group: target_group.into(),
            ..Default::default()
        }
    }

    pub fn has_changes(&self) -> bool {
        !self.members_to_add.is_empty() || !self.members_to_delete.is_empty()
    }

    pub fn summary(&self) -> GroupSyncSummary {
        GroupSyncSummary {
            source_group: self.source_group.clone(),
            target_group: self.target_group.clone(),
            added: self.members_to_add.len(),
            deleted: self.members_to_delete.len(),
        }
    }
}

impl From<&GroupMapping> for GroupDiff {
    fn from(mapping: &GroupMapping) -> Self {
        Self::new(mapping.source.clone(), mapping.target.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSyncSummary {
    pub source_group: String,
    pub target_group: String,
    pub added: usize,
    pub deleted: usize,
}

impl fmt::Display for GroupSyncSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Source Group: {}.   Target Group: {}.   Number Added: {}.   Number Deleted: {}",
            self.source_group, self.target_group, self.added, self.deleted
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncReport {
    pub summaries: Vec<GroupSyncSummary>,
    pub dry_run: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl SyncReport {
    pub fn total_added(&self) -> usize {
        self.summaries.iter().map(|s| s.added).sum()
    }

    pub fn total_deleted(&self) -> usize {
        self.summaries.iter().map(|s| s.deleted).sum()
    }
}

/// Phases of a single sync run, in the order they are entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncPhase {
    Init,
    PopulateSource,
    PopulateTarget,
    Diffed,
    Applying,
    Done,
    Failed,
}

impl SyncPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, SyncPhase::Done | SyncPhase::Failed)
    }
}

impl fmt::Display for SyncPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SyncPhase::Init => "init",
            SyncPhase::PopulateSource => "populate source members",
            SyncPhase::PopulateTarget => "populate target members",
            SyncPhase::Diffed => "diff",
            SyncPhase::Applying => "apply changes",
            SyncPhase::Done => "done",
            SyncPhase::Failed => "failed",
        };
        f.write_str(name)
    }
}
