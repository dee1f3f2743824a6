//! The incremental sync run.
//!
//! List matching remote branches, diff them against the store, then check
//! out, extract and persist each branch that needs a rebuild. Per-branch
//! failures are logged and reported; they never abort the run.

use std::path::Path;
use tracing::{debug, info, warn};

use super::plan::{plan, SyncPlan};
use super::types::{BranchFailure, BranchOutcome, FailureStage, SyncReport};
use crate::error::Result;
use crate::extract::{extract, extract_primary_document};
use crate::model::{BranchRef, BranchSnapshot, ExclusionRules, InclusionRules};
use crate::storage::SnapshotStore;
use crate::vcs::{list_branches, VersionControl, WorkingCopy};

/// Inputs of one sync run.
#[derive(Debug, Clone, Copy)]
pub struct SyncRequest<'a> {
    pub repo_url: &'a str,
    /// Local clone, shared by every branch of the run
    pub directory: &'a Path,
    pub keyword: &'a str,
    pub exclusions: &'a ExclusionRules,
    pub inclusions: &'a InclusionRules,
    /// Remove snapshots of branches no longer upstream
    pub prune: bool,
}

/// Bring the store in line with the matching remote branches.
///
/// # Errors
///
/// Returns an error if the branch list cannot be obtained, the inventory
/// cannot be read, or pruning fails. Branch-level failures are returned in
/// [`SyncReport::failed`] instead.
pub fn run_sync<V: VersionControl + ?Sized>(
    vcs: &V,
    store: &mut SnapshotStore,
    request: &SyncRequest<'_>,
) -> Result<SyncReport> {
    let fetched = list_branches(vcs, request.repo_url, request.directory, request.keyword)?;
    let existing = store.current_inventory()?;
    let plan = plan(&existing, &fetched);

    info!(
        fetched = fetched.len(),
        keep = plan.keep.len(),
        rebuild = plan.rebuild.len(),
        purge = plan.purge.len(),
        orphaned = plan.orphaned.len(),
        "Planned sync"
    );

    let mut report = SyncReport {
        run_id: store.run_id().to_string(),
        fetched: fetched.len(),
        kept: plan.keep.clone(),
        ..SyncReport::default()
    };

    for branch in &plan.keep {
        debug!(branch = %branch, "Unchanged");
        for stale in plan.superseded(&branch.name) {
            purge_stale(store, stale, &mut report);
        }
    }

    let mut working_copy = WorkingCopy::new(request.directory);
    for branch in &plan.rebuild {
        match rebuild_branch(vcs, store, &mut working_copy, &plan, branch, request, &mut report) {
            Ok(outcome) => report.rebuilt.push(outcome),
            Err(failure) => report.failed.push(failure),
        }
    }

    if !plan.orphaned.is_empty() {
        if request.prune {
            report.pruned = store.prune(&plan.orphaned)?;
            info!(pruned = report.pruned, "Pruned snapshots of deleted branches");
        } else {
            info!(
                count = plan.orphaned.len(),
                "Keeping snapshots of branches no longer upstream"
            );
        }
    }
    report.orphaned = plan.orphaned;

    info!(
        rebuilt = report.rebuilt.len(),
        kept = report.kept.len(),
        failed = report.failed.len(),
        "Sync finished"
    );
    Ok(report)
}

fn purge_stale(store: &mut SnapshotStore, stale: &BranchRef, report: &mut SyncReport) {
    match store.purge_branch(stale) {
        Ok(removed) => report.purged += removed,
        Err(e) => {
            warn!(branch = %stale, error = %e, "Cannot remove stale snapshot");
            report
                .failed
                .push(BranchFailure::new(&stale.name, FailureStage::Store, &e));
        }
    }
}

fn rebuild_branch<V: VersionControl + ?Sized>(
    vcs: &V,
    store: &mut SnapshotStore,
    working_copy: &mut WorkingCopy,
    plan: &SyncPlan,
    branch: &BranchRef,
    request: &SyncRequest<'_>,
    report: &mut SyncReport,
) -> std::result::Result<BranchOutcome, BranchFailure> {
    let checkout = working_copy.checkout(vcs, &branch.name).map_err(|e| {
        warn!(branch = %branch.name, error = %e, "Checkout failed, keeping prior snapshot");
        BranchFailure::new(&branch.name, FailureStage::Checkout, &e)
    })?;

    let checked_out = checkout.branch().clone();
    if checked_out.head_commit != branch.head_commit {
        debug!(
            branch = %branch.name,
            listed = %branch.short_commit(),
            actual = %checked_out.short_commit(),
            "Head moved since listing"
        );
    }

    let extraction = extract(checkout.root(), request.exclusions, request.inclusions);
    let primary_document = extract_primary_document(checkout.root());
    drop(checkout);

    let snapshot = BranchSnapshot {
        head_commit: checked_out.head_commit.clone(),
        branch_name: checked_out.name.clone(),
        primary_document,
        lines: extraction.lines,
    };

    let mut superseded = plan.superseded(&branch.name);
    let previous = superseded.next();

    let snapshot_id = store.replace(previous, &snapshot).map_err(|e| {
        warn!(branch = %checked_out, error = %e, "Cannot store snapshot, keeping prior one");
        BranchFailure::new(&branch.name, FailureStage::Store, &e)
    })?;
    if previous.is_some() {
        report.purged += 1;
    }
    for stale in superseded {
        purge_stale(store, stale, report);
    }

    info!(
        branch = %checked_out,
        files = snapshot.file_count(),
        lines = snapshot.lines.len(),
        replaced = previous.map(BranchRef::short_commit),
        "Stored snapshot"
    );

    Ok(BranchOutcome {
        files: snapshot.file_count(),
        has_primary_document: snapshot.primary_document.is_some(),
        branch: checked_out,
        snapshot_id,
        replaced: previous.map(|p| p.head_commit.clone()),
        extraction: extraction.report,
    })
}
