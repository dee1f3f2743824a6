//! In-memory version-control client for tests.
//!
//! Branches are lists of `(relative path, content)` pairs; checking one out
//! rewrites the target directory with exactly those files.

use std::cell::RefCell;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use super::{VcsError, VersionControl};
use crate::model::BranchRef;

struct FakeBranch {
    name: String,
    head: String,
    files: Vec<(String, String)>,
}

#[derive(Default)]
struct State {
    branches: Vec<FakeBranch>,
    cloned: bool,
    checked_out: Option<String>,
    failing: HashSet<String>,
    calls: Vec<String>,
}

#[derive(Default)]
pub(crate) struct FakeVcs {
    state: RefCell<State>,
}

fn owned(files: &[(&str, &str)]) -> Vec<(String, String)> {
    files
        .iter()
        .map(|(p, c)| ((*p).to_string(), (*c).to_string()))
        .collect()
}

impl FakeVcs {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_branch(self, name: &str, head: &str, files: &[(&str, &str)]) -> Self {
        self.set_branch(name, head, files);
        self
    }

    /// Add a branch or move an existing one to a new head and content.
    pub(crate) fn set_branch(&self, name: &str, head: &str, files: &[(&str, &str)]) {
        let mut state = self.state.borrow_mut();
        if let Some(branch) = state.branches.iter_mut().find(|b| b.name == name) {
            branch.head = head.to_string();
            branch.files = owned(files);
        } else {
            state.branches.push(FakeBranch {
                name: name.to_string(),
                head: head.to_string(),
                files: owned(files),
            });
        }
    }

    pub(crate) fn remove_branch(&self, name: &str) {
        self.state.borrow_mut().branches.retain(|b| b.name != name);
    }

    pub(crate) fn fail_checkout(&self, name: &str) {
        self.state.borrow_mut().failing.insert(name.to_string());
    }

    pub(crate) fn heal_checkout(&self, name: &str) {
        self.state.borrow_mut().failing.remove(name);
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.state.borrow().calls.clone()
    }

    pub(crate) fn checkouts(&self) -> usize {
        self.state
            .borrow()
            .calls
            .iter()
            .filter(|c| c.starts_with("checkout"))
            .count()
    }
}

fn io_err(dir: &Path) -> impl FnOnce(std::io::Error) -> VcsError + '_ {
    move |source| VcsError::Directory {
        path: dir.to_path_buf(),
        source,
    }
}

impl VersionControl for FakeVcs {
    fn ensure_cloned(&self, _url: &str, _dir: &Path) -> Result<bool, VcsError> {
        let mut state = self.state.borrow_mut();
        if state.cloned {
            return Ok(false);
        }
        state.cloned = true;
        state.calls.push("clone".to_string());
        Ok(true)
    }

    fn fetch_all(&self, _dir: &Path) -> Result<(), VcsError> {
        self.state.borrow_mut().calls.push("fetch".to_string());
        Ok(())
    }

    fn list_remote_branches_with_heads(&self, _dir: &Path) -> Result<Vec<BranchRef>, VcsError> {
        let mut state = self.state.borrow_mut();
        state.calls.push("list".to_string());
        Ok(state
            .branches
            .iter()
            .map(|b| BranchRef::new(&b.name, &b.head))
            .collect())
    }

    fn checkout_and_pull(&self, dir: &Path, branch: &str) -> Result<(), VcsError> {
        let mut state = self.state.borrow_mut();
        state.calls.push(format!("checkout {branch}"));

        if state.failing.contains(branch) {
            return Err(VcsError::CommandFailed {
                command: format!("git checkout {branch}"),
                status: "exit status: 1".to_string(),
                stderr: format!("error: pathspec '{branch}' did not match"),
            });
        }

        let Some(found) = state.branches.iter().find(|b| b.name == branch) else {
            return Err(VcsError::CommandFailed {
                command: format!("git checkout {branch}"),
                status: "exit status: 1".to_string(),
                stderr: "no such branch".to_string(),
            });
        };

        fs::create_dir_all(dir).map_err(io_err(dir))?;
        for entry in fs::read_dir(dir).map_err(io_err(dir))? {
            let path = entry.map_err(io_err(dir))?.path();
            if path.is_dir() {
                fs::remove_dir_all(&path).map_err(io_err(dir))?;
            } else {
                fs::remove_file(&path).map_err(io_err(dir))?;
            }
        }
        for (relative, content) in &found.files {
            let path = dir.join(relative);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(io_err(dir))?;
            }
            fs::write(&path, content).map_err(io_err(dir))?;
        }

        state.checked_out = Some(branch.to_string());
        Ok(())
    }

    fn current_head(&self, _dir: &Path) -> Result<String, VcsError> {
        let state = self.state.borrow();
        state
            .checked_out
            .as_deref()
            .and_then(|name| state.branches.iter().find(|b| b.name == name))
            .map(|b| b.head.clone())
            .ok_or_else(|| VcsError::UnexpectedOutput {
                command: "git rev-parse HEAD".to_string(),
                output: "HEAD".to_string(),
            })
    }
}
