//! Remote branch inventory.

use std::path::Path;
use tracing::info;

use super::{VcsError, VersionControl};
use crate::model::BranchRef;

/// Remote branches of `repo_url` whose name contains `keyword`.
///
/// Clones into `local_dir` when it holds no repository yet, otherwise
/// fetches all remotes first. An empty keyword keeps every branch. Order
/// follows the client's listing.
///
/// # Errors
///
/// Returns an error if cloning, fetching or listing fails.
pub fn list_branches<V: VersionControl + ?Sized>(
    vcs: &V,
    repo_url: &str,
    local_dir: &Path,
    keyword: &str,
) -> Result<Vec<BranchRef>, VcsError> {
    if !vcs.ensure_cloned(repo_url, local_dir)? {
        vcs.fetch_all(local_dir)?;
    }

    let all = vcs.list_remote_branches_with_heads(local_dir)?;
    let total = all.len();
    let matching: Vec<BranchRef> = all
        .into_iter()
        .filter(|b| b.name.contains(keyword))
        .collect();

    info!(total, matching = matching.len(), keyword, "Listed remote branches");
    Ok(matching)
}
