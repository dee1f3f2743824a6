//! Sync command implementation.

use crate::cli::SyncArgs;
use crate::config::{resolve_db_path, resolve_rules, RulesSource};
use crate::error::{Error, Result};
use crate::storage::SnapshotStore;
use crate::sync::{run_sync, SyncReport, SyncRequest};
use crate::vcs::GitCli;
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

#[derive(Serialize)]
struct SyncOutput<'a> {
    db_path: String,
    exclusions: &'a RulesSource,
    inclusions: &'a RulesSource,
    #[serde(flatten)]
    report: &'a SyncReport,
}

/// Generate an identifier for one sync run.
fn new_run_id() -> String {
    format!("run_{}", &uuid::Uuid::new_v4().simple().to_string()[..12])
}

/// Execute the sync command.
///
/// Rules are resolved before the repository or database is touched, so a
/// configuration error leaves both alone.
///
/// # Errors
///
/// Returns an error if configuration is invalid, the branch list cannot be
/// obtained, the database fails, or any branch could not be refreshed.
pub fn execute(args: &SyncArgs, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let rules = resolve_rules(args.exclusions.as_deref(), args.inclusions.as_deref())?;

    if args.directory.exists() && !args.directory.is_dir() {
        return Err(Error::InvalidArgument(format!(
            "DIRECTORY {} exists and is not a directory",
            args.directory.display()
        )));
    }

    let db_path = resolve_db_path(db_path.map(PathBuf::as_path));
    let run_id = new_run_id();
    info!(run_id = %run_id, db = %db_path.display(), repo = %args.repo_url, "Starting sync");

    let mut store = SnapshotStore::open(&db_path)?.with_run_id(run_id);
    let vcs = GitCli::default();

    let report = run_sync(
        &vcs,
        &mut store,
        &SyncRequest {
            repo_url: &args.repo_url,
            directory: &args.directory,
            keyword: &args.keyword,
            exclusions: &rules.exclusions,
            inclusions: &rules.inclusions,
            prune: args.prune,
        },
    )?;

    if json {
        let output = SyncOutput {
            db_path: db_path.display().to_string(),
            exclusions: &rules.exclusions_source,
            inclusions: &rules.inclusions_source,
            report: &report,
        };
        println!("{}", serde_json::to_string(&output)?);
    } else {
        print_human(&report, &db_path, args.prune);
    }

    if report.is_complete() {
        Ok(())
    } else {
        let branches = report.failed_branches();
        Err(Error::SyncIncomplete {
            failed: branches.len(),
            branches,
        })
    }
}

fn print_human(report: &SyncReport, db_path: &std::path::Path, prune: bool) {
    println!(
        "{} {} matching branch(es) into {} {}",
        "Synced".green().bold(),
        report.fetched,
        db_path.display(),
        format!("({} lines written)", report.lines_written()).dimmed()
    );

    for outcome in &report.rebuilt {
        let verb = if outcome.replaced.is_some() {
            "replaced"
        } else {
            "added"
        };
        println!(
            "  {} {} {}",
            "+".green(),
            outcome.branch.to_string().bold(),
            format!(
                "({verb}, {} files, {} lines)",
                outcome.files, outcome.extraction.lines_kept
            )
            .dimmed()
        );
    }

    for branch in &report.kept {
        println!("  {} {} {}", "=".dimmed(), branch, "(unchanged)".dimmed());
    }

    for failure in &report.failed {
        println!(
            "  {} {} {}",
            "!".red().bold(),
            failure.branch.bold(),
            failure.message.red()
        );
    }

    if !report.orphaned.is_empty() {
        if prune {
            println!(
                "{} {} snapshot(s) of deleted branches",
                "Pruned".yellow().bold(),
                report.pruned
            );
        } else {
            println!(
                "{}",
                format!(
                    "{} stored branch(es) no longer upstream; pass --prune to remove them.",
                    report.orphaned.len()
                )
                .dimmed()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_id_shape() {
        let id = new_run_id();
        assert!(id.starts_with("run_"));
        assert_eq!(id.len(), 16);
        assert_ne!(id, new_run_id());
    }
}
