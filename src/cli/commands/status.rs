//! Status command implementation.

use crate::config::resolve_db_path;
use crate::error::{Error, Result};
use crate::model::{FileLine, StoredSnapshot};
use crate::storage::{Event, SnapshotStore, StoreCounts};
use chrono::{TimeZone, Utc};
use colored::Colorize;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Output for status command.
#[derive(Serialize)]
struct StatusOutput {
    db_path: String,
    exists: bool,
    counts: StoreCounts,
    snapshots: Vec<StoredSnapshot>,
    recent_events: Vec<Event>,
}

/// Per-file line totals of one snapshot.
#[derive(Serialize)]
struct FileSummary {
    path: String,
    lines: usize,
}

/// Output for `status --branch`.
#[derive(Serialize)]
struct BranchOutput {
    db_path: String,
    snapshot: StoredSnapshot,
    files: Vec<FileSummary>,
}

fn format_time(millis: i64) -> String {
    Utc.timestamp_millis_opt(millis)
        .single()
        .map_or_else(|| millis.to_string(), |t| t.format("%Y-%m-%d %H:%M:%S").to_string())
}

/// Execute status command.
///
/// The database is opened read-only. One that does not exist yet is
/// reported as empty and is not created.
///
/// # Errors
///
/// Returns an error if the database cannot be read, or if `branch` is given
/// and has no stored snapshot.
pub fn execute(
    db_path: Option<&PathBuf>,
    event_limit: u32,
    branch: Option<&str>,
    json: bool,
) -> Result<()> {
    let db_path = resolve_db_path(db_path.map(PathBuf::as_path));
    let exists = db_path.exists();

    if let Some(branch) = branch {
        return show_branch(&db_path, exists, branch, json);
    }

    let (counts, snapshots, recent_events) = if exists {
        let store = SnapshotStore::open_read_only(&db_path)?;
        (
            store.counts()?,
            store.list_snapshots()?,
            store.recent_events(event_limit)?,
        )
    } else {
        (StoreCounts::default(), Vec::new(), Vec::new())
    };

    if json {
        let output = StatusOutput {
            db_path: db_path.display().to_string(),
            exists,
            counts,
            snapshots,
            recent_events,
        };
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    println!("{}", "Repograb Status".bold().underline());
    println!();
    println!("Database: {}", db_path.display());

    if snapshots.is_empty() {
        println!();
        println!("{}", "No snapshots stored.".dimmed());
        println!(
            "{}",
            "Run 'repograb sync <REPO_URL> <DIRECTORY> <KEYWORD>' to create some.".dimmed()
        );
        return Ok(());
    }

    println!(
        "Snapshots: {}  Lines: {}",
        counts.snapshots, counts.lines
    );
    println!();
    println!("{}", "Branches:".blue().bold());
    for snapshot in &snapshots {
        let short: String = snapshot.head_commit.chars().take(10).collect();
        println!(
            "  {} {} {}",
            snapshot.branch_name.bold(),
            short.yellow(),
            format!("({} lines)", snapshot.line_count).dimmed()
        );
    }

    if !recent_events.is_empty() {
        println!();
        println!("{}", "Recent Changes:".blue().bold());
        for event in &recent_events {
            let short: String = event.head_commit.chars().take(10).collect();
            println!(
                "  {} {:<18} {} {}",
                format_time(event.created_at).dimmed(),
                event.event_type.as_str(),
                event.branch_name,
                short.yellow()
            );
        }
    }

    Ok(())
}

/// Detail of the latest snapshot of one branch.
fn show_branch(db_path: &Path, exists: bool, branch: &str, json: bool) -> Result<()> {
    let not_found = || Error::SnapshotNotFound {
        branch: branch.to_string(),
    };
    if !exists {
        return Err(not_found());
    }

    let store = SnapshotStore::open_read_only(db_path)?;
    let snapshot = store.get_snapshot(branch)?.ok_or_else(not_found)?;
    let files = summarize_files(&store.snapshot_lines(snapshot.id)?);

    if json {
        let output = BranchOutput {
            db_path: db_path.display().to_string(),
            snapshot,
            files,
        };
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    println!("{}", snapshot.branch_name.bold().underline());
    println!();
    println!("Head:   {}", snapshot.head_commit.yellow());
    println!("Lines:  {}", snapshot.line_count);
    println!(
        "README: {}",
        snapshot
            .primary_document
            .as_ref()
            .map_or_else(|| "none".dimmed().to_string(), |doc| format!("{} bytes", doc.len()))
    );

    if !files.is_empty() {
        println!();
        println!("{}", "Files:".blue().bold());
        for file in &files {
            println!("  {} {}", file.path, format!("({} lines)", file.lines).dimmed());
        }
    }

    Ok(())
}

/// Group consecutive lines by path, keeping first-seen order.
fn summarize_files(lines: &[FileLine]) -> Vec<FileSummary> {
    let mut files: Vec<FileSummary> = Vec::new();
    for line in lines {
        match files.last_mut() {
            Some(last) if last.path == line.relative_path => last.lines += 1,
            _ => files.push(FileSummary {
                path: line.relative_path.clone(),
                lines: 1,
            }),
        }
    }
    files
}
