use crate::core::diff::diff_all_groups;
use crate::domain::model::{GroupDiff, GroupMapping, SyncPhase, SyncReport};
use crate::domain::ports::{DirectoryClient, MemberSource};
use crate::utils::error::{Result, SyncError};
use chrono::Utc;
use std::sync::Mutex;

/// Drives a sync run: fetch source members, fetch target members, diff,
/// apply, summarize.
///
/// Group pairs are processed one at a time. The first collaborator failure
/// ends the run; changes already applied to the directory stay in place.
pub struct SyncEngine<S: MemberSource, D: DirectoryClient> {
    source: S,
    directory: D,
    phase: Mutex<SyncPhase>,
}

impl<S: MemberSource, D: DirectoryClient> SyncEngine<S, D> {
    pub fn new(source: S, directory: D) -> Self {
        Self {
            source,
            directory,
            phase: Mutex::new(SyncPhase::Init),
        }
    }

    /// Phase most recently entered by the last (or current) run.
    pub fn phase(&self) -> SyncPhase {
        self.phase.lock().map(|p| *p).unwrap_or(SyncPhase::Failed)
    }

    fn enter(&self, phase: SyncPhase) {
        if let Ok(mut current) = self.phase.lock() {
            *current = phase;
        }
    }

    /// Populates both sides of every pair and computes the changes without
    /// touching the directory.
    pub async fn plan(&self, mappings: &[GroupMapping]) -> Result<Vec<GroupDiff>> {
        self.enter(SyncPhase::Init);
        let mut groups: Vec<GroupDiff> = mappings.iter().map(GroupDiff::from).collect();

        self.enter(SyncPhase::PopulateSource);
        for group in groups.iter_mut() {
            tracing::debug!("Fetching source members for {}", group.source_group);
            match self.source.fetch_members(&group.source_group).await {
                Ok(members) => group.source_members = members,
                Err(e) => return Err(self.fail(SyncPhase::PopulateSource, group, e)),
            }
        }

        self.enter(SyncPhase::PopulateTarget);
        for group in groups.iter_mut() {
            tracing::debug!("Fetching target members for {}", group.target_group);
            match self.directory.list_members(&group.target_group).await {
                Ok(members) => group.target_members = members,
                Err(e) => return Err(self.fail(SyncPhase::PopulateTarget, group, e)),
            }
        }

        let groups = diff_all_groups(groups);
        self.enter(SyncPhase::Diffed);

        for group in &groups {
            tracing::debug!(
                "{} -> {}: {} to add, {} to delete",
                group.source_group,
                group.target_group,
                group.members_to_add.len(),
                group.members_to_delete.len()
            );
        }

        Ok(groups)
    }

    pub async fn run(&self, mappings: &[GroupMapping]) -> Result<SyncReport> {
        let started_at = Utc::now();
        tracing::info!("Starting group sync for {} group pair(s)", mappings.len());

        let groups = self.plan(mappings).await?;

        self.enter(SyncPhase::Applying);
        for group in &groups {
            self.apply(group)
                .await
                .map_err(|e| self.fail(SyncPhase::Applying, group, e))?;
        }

        Ok(self.finish(&groups, false, started_at))
    }

    /// Same as [`run`](Self::run) but stops after the diff.
    pub async fn dry_run(&self, mappings: &[GroupMapping]) -> Result<SyncReport> {
        let started_at = Utc::now();
        tracing::info!("Planning group sync for {} group pair(s)", mappings.len());

        let groups = self.plan(mappings).await?;
        for group in groups.iter().filter(|g| g.has_changes()) {
            tracing::info!(
                "[dry run] {}: would add {:?}, would delete {:?}",
                group.target_group,
                group.members_to_add,
                group.members_to_delete
            );
        }

        Ok(self.finish(&groups, true, started_at))
    }

    // add before delete, per group
    async fn apply(&self, group: &GroupDiff) -> Result<()> {
        if !group.members_to_add.is_empty() {
            tracing::debug!(
                "Adding {} member(s) to {}",
                group.members_to_add.len(),
                group.target_group
            );
            self.directory
                .add_members(&group.target_group, &group.members_to_add)
                .await?;
        }

        if !group.members_to_delete.is_empty() {
            tracing::debug!(
                "Deleting {} member(s) from {}",
                group.members_to_delete.len(),
                group.target_group
            );
            self.directory
                .delete_members(&group.target_group, &group.members_to_delete)
                .await?;
        }

        Ok(())
    }

    fn finish(
        &self,
        groups: &[GroupDiff],
        dry_run: bool,
        started_at: chrono::DateTime<Utc>,
    ) -> SyncReport {
        let summaries: Vec<_> = groups.iter().map(GroupDiff::summary).collect();
        for summary in &summaries {
            tracing::info!("{}", summary);
        }

        self.enter(SyncPhase::Done);
        SyncReport {
            summaries,
            dry_run,
            started_at,
            finished_at: Utc::now(),
        }
    }

    fn fail(&self, phase: SyncPhase, group: &GroupDiff, error: SyncError) -> SyncError {
        self.enter(SyncPhase::Failed);
        tracing::error!(
            "Group sync failed during {} ({} -> {}): {}",
            phase,
            group.source_group,
            group.target_group,
            error
        );
        SyncError::RunFailed {
            phase,
            source_group: group.source_group.clone(),
            target_group: group.target_group.clone(),
            source: Box::new(error),
        }
    }
}
