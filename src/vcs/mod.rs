//! Version-control access.
//!
//! The pipeline talks to version control only through the narrow
//! [`VersionControl`] trait:
//!
//! - [`git`] - `git` subprocess implementation
//! - [`inventory`] - Keyword-filtered remote branch listing
//!
//! The local clone is a single working tree shared by every branch of a
//! run. [`WorkingCopy`] owns it; a checkout borrows it mutably, so a second
//! checkout cannot start while the previous one is still being read.

pub mod git;
pub mod inventory;

#[cfg(test)]
pub(crate) mod fake;

use std::path::{Path, PathBuf};

use crate::model::BranchRef;

pub use git::GitCli;
pub use inventory::list_branches;

/// Version-control failures.
#[derive(Debug, thiserror::Error)]
pub enum VcsError {
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("unexpected output from `{command}`: {output}")]
    UnexpectedOutput { command: String, output: String },

    #[error("{} is a clone of {actual}, not {expected}", path.display())]
    ForeignClone {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("cannot prepare directory {}: {source}", path.display())]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Operations the snapshot pipeline needs from a version-control client.
///
/// Authentication and transport are the implementation's concern.
pub trait VersionControl {
    /// Make sure `dir` holds a clone of `url`. Returns `true` if a clone was made.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created, cloning fails, or
    /// `dir` is already a clone of a different remote.
    fn ensure_cloned(&self, url: &str, dir: &Path) -> Result<bool, VcsError>;

    /// Fetch every remote ref, dropping refs of branches deleted upstream.
    ///
    /// # Errors
    ///
    /// Returns an error if the fetch fails.
    fn fetch_all(&self, dir: &Path) -> Result<(), VcsError>;

    /// Every remote branch with the commit it points to.
    ///
    /// # Errors
    ///
    /// Returns an error if the refs cannot be listed.
    fn list_remote_branches_with_heads(&self, dir: &Path) -> Result<Vec<BranchRef>, VcsError>;

    /// Switch the working tree to `branch` exactly as last fetched.
    ///
    /// Local commits, edits and untracked files are discarded, so a branch
    /// whose history was rewritten upstream still checks out.
    ///
    /// # Errors
    ///
    /// Returns an error if the branch cannot be checked out.
    fn checkout_and_pull(&self, dir: &Path, branch: &str) -> Result<(), VcsError>;

    /// Commit the working tree is currently at.
    ///
    /// # Errors
    ///
    /// Returns an error if the head cannot be resolved.
    fn current_head(&self, dir: &Path) -> Result<String, VcsError>;
}

/// Exclusive handle on the local working tree.
#[derive(Debug)]
pub struct WorkingCopy {
    root: PathBuf,
}

impl WorkingCopy {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Check out `branch` and hold the tree until the returned guard drops.
    ///
    /// # Errors
    ///
    /// Returns an error if checkout or head resolution fails.
    pub fn checkout<V: VersionControl + ?Sized>(
        &mut self,
        vcs: &V,
        branch: &str,
    ) -> Result<Checkout<'_>, VcsError> {
        vcs.checkout_and_pull(&self.root, branch)?;
        let head_commit = vcs.current_head(&self.root)?;
        Ok(Checkout {
            root: &self.root,
            branch: BranchRef::new(branch, head_commit),
        })
    }
}

/// A branch checked out in a [`WorkingCopy`].
#[derive(Debug)]
pub struct Checkout<'a> {
    root: &'a Path,
    branch: BranchRef,
}

impl Checkout<'_> {
    /// Root of the checked-out tree.
    #[must_use]
    pub fn root(&self) -> &Path {
        self.root
    }

    /// Branch name and the commit actually checked out.
    #[must_use]
    pub fn branch(&self) -> &BranchRef {
        &self.branch
    }
}
