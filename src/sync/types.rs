//! Sync run results.

use serde::Serialize;

use crate::extract::ExtractionReport;
use crate::model::BranchRef;

/// Where a branch failed during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    /// Checkout or head resolution.
    Checkout,
    /// Persisting the snapshot or removing a stale one.
    Store,
}

/// A branch that could not be refreshed. Its prior snapshot, if any, is intact.
#[derive(Debug, Clone, Serialize)]
pub struct BranchFailure {
    pub branch: String,
    pub stage: FailureStage,
    pub message: String,
}

impl BranchFailure {
    pub fn new(branch: &str, stage: FailureStage, error: &dyn std::fmt::Display) -> Self {
        Self {
            branch: branch.to_string(),
            stage,
            message: error.to_string(),
        }
    }
}

/// A branch whose snapshot was (re)built.
#[derive(Debug, Clone, Serialize)]
pub struct BranchOutcome {
    /// Branch at the commit actually checked out
    pub branch: BranchRef,
    /// Row id of the new snapshot
    pub snapshot_id: i64,
    /// Head commit of the snapshot this one replaced
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replaced: Option<String>,
    pub files: usize,
    pub has_primary_document: bool,
    pub extraction: ExtractionReport,
}

/// Summary of one sync run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncReport {
    pub run_id: String,
    /// Remote branches matching the keyword
    pub fetched: usize,
    pub kept: Vec<BranchRef>,
    pub rebuilt: Vec<BranchOutcome>,
    pub failed: Vec<BranchFailure>,
    /// Superseded snapshots removed
    pub purged: usize,
    /// Stored branches no longer upstream
    pub orphaned: Vec<BranchRef>,
    /// Orphaned snapshots removed (only with pruning enabled)
    pub pruned: usize,
}

impl SyncReport {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// Names of failed branches, deduplicated, in failure order.
    #[must_use]
    pub fn failed_branches(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for failure in &self.failed {
            if !names.contains(&failure.branch) {
                names.push(failure.branch.clone());
            }
        }
        names
    }

    /// Total lines written across rebuilt snapshots.
    #[must_use]
    pub fn lines_written(&self) -> usize {
        self.rebuilt.iter().map(|o| o.extraction.lines_kept).sum()
    }
}
