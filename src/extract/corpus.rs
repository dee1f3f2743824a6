//! Directory walk producing the per-line corpus of a checkout.

use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

use super::encoding::decode;
use super::filter::{is_line_significant, is_path_included};
use super::ExtractError;
use crate::model::{ExclusionRules, FileLine, InclusionRules};

/// Name of the version-control metadata directory, never descended into.
const VCS_METADATA_DIR: &str = ".git";

/// Counters describing one extraction pass.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionReport {
    /// Regular files seen by the walk.
    pub files_scanned: usize,
    /// Files that passed the path rules and were decoded.
    pub files_included: usize,
    /// Files rejected by exclusion or inclusion rules.
    pub files_excluded: usize,
    /// Files (or directory entries) that could not be read or decoded.
    pub files_failed: usize,
    /// Lines emitted.
    pub lines_kept: usize,
    /// Blank or filler lines dropped.
    pub lines_dropped: usize,
}

/// Result of extracting one checkout.
#[derive(Debug, Default, Clone)]
pub struct Extraction {
    pub lines: Vec<FileLine>,
    pub report: ExtractionReport,
}

/// Extract every significant line of every eligible file under `root`.
///
/// Entries are visited sorted by file name, so the output order is stable
/// for a given tree. Unreadable files are logged and skipped.
#[must_use]
pub fn extract(
    root: &Path,
    exclusions: &ExclusionRules,
    inclusions: &InclusionRules,
) -> Extraction {
    let mut extraction = Extraction::default();

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !(e.depth() > 0 && e.file_type().is_dir() && e.file_name() == VCS_METADATA_DIR));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "Skipping unreadable directory entry");
                extraction.report.files_failed += 1;
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }
        extraction.report.files_scanned += 1;

        let Some(relative) = relative_path(root, entry.path()) else {
            continue;
        };

        if !is_path_included(&relative, exclusions, inclusions) {
            extraction.report.files_excluded += 1;
            continue;
        }

        match read_lines(entry.path(), &relative) {
            Ok((lines, dropped)) => {
                extraction.report.files_included += 1;
                extraction.report.lines_kept += lines.len();
                extraction.report.lines_dropped += dropped;
                extraction.lines.extend(lines);
            }
            Err(e) => {
                warn!(path = %relative, error = %e, "Skipping file");
                extraction.report.files_failed += 1;
            }
        }
    }

    debug!(
        root = %root.display(),
        files = extraction.report.files_included,
        lines = extraction.report.lines_kept,
        "Extraction finished"
    );

    extraction
}

/// Read, decode and filter one file. Returns kept lines and the number dropped.
fn read_lines(path: &Path, relative: &str) -> Result<(Vec<FileLine>, usize), ExtractError> {
    let bytes = fs::read(path).map_err(|source| ExtractError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let decoded = decode(&bytes).map_err(|encoding| ExtractError::Malformed {
        path: path.to_path_buf(),
        encoding,
    })?;

    let mut kept = Vec::new();
    let mut dropped = 0;
    for (index, line) in physical_lines(&decoded.text).enumerate() {
        if is_line_significant(line) {
            kept.push(FileLine::new(relative, line_number(index), line));
        } else {
            dropped += 1;
        }
    }

    Ok((kept, dropped))
}

fn line_number(index: usize) -> i64 {
    i64::try_from(index).map_or(i64::MAX, |i| i + 1)
}

/// Path of `path` relative to `root`, with `/` separators.
fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<_> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect();
    if parts.is_empty() {
        return None;
    }
    Some(parts.join("/"))
}

/// Split text into physical lines.
///
/// `\r\n`, `\n` and a lone `\r` each end a line; a terminator at the very
/// end does not start another one.
pub(crate) fn physical_lines(text: &str) -> PhysicalLines<'_> {
    PhysicalLines { rest: text }
}

pub(crate) struct PhysicalLines<'a> {
    rest: &'a str,
}

impl<'a> Iterator for PhysicalLines<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.rest.is_empty() {
            return None;
        }
        match self.rest.find(['\r', '\n']) {
            Some(i) => {
                let line = &self.rest[..i];
                let skip = if self.rest[i..].starts_with("\r\n") { 2 } else { 1 };
                self.rest = &self.rest[i + skip..];
                Some(line)
            }
            None => {
                let line = self.rest;
                self.rest = "";
                Some(line)
            }
        }
    }
}
