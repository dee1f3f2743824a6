//! `git` subprocess implementation of [`VersionControl`].

use std::fs;
use std::path::Path;
use std::process::Command;
use tracing::{debug, info};

use super::{VcsError, VersionControl};
use crate::model::BranchRef;

/// Remote whose branches are snapshotted.
const REMOTE: &str = "origin";

/// Runs the `git` binary found on `PATH`.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: String,
}

impl Default for GitCli {
    fn default() -> Self {
        Self {
            program: "git".to_string(),
        }
    }
}

impl GitCli {
    /// Use a specific git executable.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Run git with `args` (inside `dir` when given) and return trimmed stdout.
    fn run(&self, dir: Option<&Path>, args: &[&str]) -> Result<String, VcsError> {
        let command = format!("git {}", args.join(" "));
        debug!(command = %command, dir = ?dir, "Running git");

        let mut cmd = Command::new(&self.program);
        cmd.args(args);
        if let Some(dir) = dir {
            cmd.current_dir(dir);
        }
        // Never block on a credential prompt
        cmd.env("GIT_TERMINAL_PROMPT", "0");

        let output = cmd.output().map_err(|source| VcsError::Spawn {
            command: command.clone(),
            source,
        })?;

        if !output.status.success() {
            return Err(VcsError::CommandFailed {
                command,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Whether `dir` is the root of its own working tree.
    ///
    /// A directory nested inside some other repository is not.
    fn is_clone_root(&self, dir: &Path) -> bool {
        let Ok(toplevel) = self.run(Some(dir), &["rev-parse", "--show-toplevel"]) else {
            return false;
        };
        match (fs::canonicalize(&toplevel), fs::canonicalize(dir)) {
            (Ok(top), Ok(dir)) => top == dir,
            _ => false,
        }
    }
}

/// Compare remote URLs ignoring a trailing `/` or `.git`.
fn same_remote(a: &str, b: &str) -> bool {
    fn normalize(url: &str) -> &str {
        let url = url.trim_end_matches('/');
        url.strip_suffix(".git").unwrap_or(url)
    }
    normalize(a) == normalize(b)
}

impl VersionControl for GitCli {
    fn ensure_cloned(&self, url: &str, dir: &Path) -> Result<bool, VcsError> {
        if dir.is_dir() && self.is_clone_root(dir) {
            let actual = self.run(Some(dir), &["remote", "get-url", REMOTE])?;
            if !same_remote(&actual, url) {
                return Err(VcsError::ForeignClone {
                    path: dir.to_path_buf(),
                    expected: url.to_string(),
                    actual,
                });
            }
            return Ok(false);
        }

        fs::create_dir_all(dir).map_err(|source| VcsError::Directory {
            path: dir.to_path_buf(),
            source,
        })?;

        info!(url, dir = %dir.display(), "Cloning repository");
        let target = dir.to_string_lossy().into_owned();
        self.run(None, &["clone", url, target.as_str()])?;
        Ok(true)
    }

    fn fetch_all(&self, dir: &Path) -> Result<(), VcsError> {
        // Drop remote-tracking refs of branches deleted upstream
        self.run(Some(dir), &["fetch", "--all", "--prune"])?;
        Ok(())
    }

    fn list_remote_branches_with_heads(&self, dir: &Path) -> Result<Vec<BranchRef>, VcsError> {
        let refs = format!("refs/remotes/{REMOTE}");
        let out = self.run(
            Some(dir),
            &["for-each-ref", "--format=%(refname:short) %(objectname)", refs.as_str()],
        )?;
        parse_remote_refs(&out)
    }

    fn checkout_and_pull(&self, dir: &Path, branch: &str) -> Result<(), VcsError> {
        // Local branch always equals the fetched ref; nothing is merged
        let remote_ref = format!("refs/remotes/{REMOTE}/{branch}");
        self.run(
            Some(dir),
            &["checkout", "--force", "-B", branch, remote_ref.as_str()],
        )?;
        self.run(Some(dir), &["clean", "-ffdx"])?;
        Ok(())
    }

    fn current_head(&self, dir: &Path) -> Result<String, VcsError> {
        self.run(Some(dir), &["rev-parse", "HEAD"])
    }
}

/// Parse `for-each-ref` output lines of the form `origin/<branch> <sha>`.
///
/// The symbolic `origin/HEAD` (shown as `origin`) is skipped.
fn parse_remote_refs(output: &str) -> Result<Vec<BranchRef>, VcsError> {
    let prefix = format!("{REMOTE}/");
    let mut branches = Vec::new();

    for line in output.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let Some((name, sha)) = line.rsplit_once(' ') else {
            return Err(VcsError::UnexpectedOutput {
                command: "git for-each-ref".to_string(),
                output: line.to_string(),
            });
        };

        let Some(branch) = name.strip_prefix(&prefix) else {
            continue;
        };
        if branch == "HEAD" {
            continue;
        }

        branches.push(BranchRef::new(branch, sha));
    }

    Ok(branches)
}
