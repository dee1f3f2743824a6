//! Classification of branches into keep / rebuild / purge.

use serde::Serialize;

use crate::model::BranchRef;

/// Work derived from comparing the stored inventory with the fetched one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncPlan {
    /// Fetched branches whose stored snapshot is current.
    pub keep: Vec<BranchRef>,
    /// Fetched branches that need a fresh snapshot, in fetch order.
    pub rebuild: Vec<BranchRef>,
    /// Stored snapshots superseded by a newer head of the same branch.
    pub purge: Vec<BranchRef>,
    /// Stored snapshots whose branch was not fetched at all.
    pub orphaned: Vec<BranchRef>,
}

impl SyncPlan {
    /// Head commits of the snapshots to purge.
    #[must_use]
    pub fn purge_commits(&self) -> Vec<&str> {
        self.purge.iter().map(|b| b.head_commit.as_str()).collect()
    }

    /// Stored snapshots of `branch_name` that must go.
    pub fn superseded<'a>(&'a self, branch_name: &'a str) -> impl Iterator<Item = &'a BranchRef> + 'a {
        self.purge.iter().filter(move |b| b.name == branch_name)
    }

    /// True when nothing needs rebuilding or purging.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.rebuild.is_empty() && self.purge.is_empty()
    }
}

/// Compare the stored inventory with freshly fetched branches.
///
/// A fetched branch with no stored snapshot is rebuilt. One whose stored
/// head matches is kept. One whose stored head differs is rebuilt and the
/// stale snapshot goes to `purge`. Stored snapshots with no fetched
/// counterpart are only reported as `orphaned`.
#[must_use]
pub fn plan(existing: &[BranchRef], fetched: &[BranchRef]) -> SyncPlan {
    let mut result = SyncPlan::default();

    for branch in fetched {
        let stored: Vec<&BranchRef> = existing.iter().filter(|e| e.name == branch.name).collect();

        if stored.iter().any(|e| e.is_same_snapshot(branch)) {
            result.keep.push(branch.clone());
        } else {
            result.rebuild.push(branch.clone());
        }

        // Same name, other head: stale whether or not a current copy exists
        result.purge.extend(
            stored
                .into_iter()
                .filter(|e| e.head_commit != branch.head_commit)
                .cloned(),
        );
    }

    result.orphaned = existing
        .iter()
        .filter(|e| !fetched.iter().any(|f| f.name == e.name))
        .cloned()
        .collect();

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn refs(items: &[(&str, &str)]) -> Vec<BranchRef> {
        items.iter().map(|(n, h)| BranchRef::new(*n, *h)).collect()
    }

    #[test]
    fn test_head_change_and_new_branch() {
        let existing = refs(&[("main", "h1")]);
        let fetched = refs(&[("main", "h2"), ("dev", "h3")]);

        let plan = plan(&existing, &fetched);
        assert_eq!(plan.rebuild, fetched);
        assert_eq!(plan.purge_commits(), vec!["h1"]);
        assert!(plan.keep.is_empty());
        assert!(plan.orphaned.is_empty());
        assert_eq!(plan.superseded("main").count(), 1);
        assert_eq!(plan.superseded("dev").count(), 0);
    }

    #[test]
    fn test_unchanged_is_noop() {
        let existing = refs(&[("main", "h1"), ("dev", "h3")]);
        let plan = plan(&existing, &existing);
        assert!(plan.is_noop());
        assert_eq!(plan.keep.len(), 2);
    }

    #[test]
    fn test_orphans_reported_not_purged() {
        let existing = refs(&[("main", "h1"), ("gone", "h9")]);
        let fetched = refs(&[("main", "h1")]);

        let plan = plan(&existing, &fetched);
        assert_eq!(plan.orphaned, refs(&[("gone", "h9")]));
        assert!(plan.purge.is_empty());
    }

    #[test]
    fn test_shared_head_across_branches() {
        // A new branch at an already-stored commit still needs its own snapshot
        let existing = refs(&[("main", "h1")]);
        let fetched = refs(&[("main", "h1"), ("release", "h1")]);

        let plan = plan(&existing, &fetched);
        assert_eq!(plan.keep, refs(&[("main", "h1")]));
        assert_eq!(plan.rebuild, refs(&[("release", "h1")]));
        assert!(plan.purge.is_empty());
    }

    #[test]
    fn test_stale_duplicate_purged_alongside_current() {
        let existing = refs(&[("main", "h0"), ("main", "h1")]);
        let fetched = refs(&[("main", "h1")]);

        let plan = plan(&existing, &fetched);
        assert_eq!(plan.keep, fetched);
        assert_eq!(plan.purge, refs(&[("main", "h0")]));
    }
}
