//! Path selection and noise-line predicates.
//!
//! Both predicates are pure: no I/O, no state.

use regex::Regex;
use std::sync::LazyLock;

use crate::model::{ExclusionRules, InclusionRules};

/// Lines made only of `*`, `/`, `<!--`, `-->` and whitespace.
static FILLER_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[*/\s]|<!--|-->)+$").expect("filler pattern is a valid regex")
});

/// Whether a line carries indexable content.
///
/// Blank lines and decorative filler such as `//*******` or `<!-- -->`
/// are noise. Any other character makes the line significant.
#[must_use]
pub fn is_line_significant(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return false;
    }
    !FILLER_LINE.is_match(trimmed)
}

/// Extension of a file name including the leading dot.
///
/// The suffix from the last `.` on, so `.gitignore` is its own extension
/// and `archive.tar.gz` has `.gz`. Names without a dot, or ending in one,
/// have none.
#[must_use]
pub fn dotted_extension(file_name: &str) -> Option<&str> {
    let ext = &file_name[file_name.rfind('.')?..];
    (ext.len() > 1).then_some(ext)
}

/// Whether a file belongs in the corpus.
///
/// `relative_path` is `/`-separated and relative to the checkout root.
/// Folder exclusions match whole leading segments of the file's directory,
/// case-insensitively: `secrets` excludes `secrets/a.txt` and
/// `Secrets/deep/b.txt` but not `secretsauce/c.txt`. File exclusions match
/// the exact file name. Only then is the extension checked against the
/// allow-list.
#[must_use]
pub fn is_path_included(
    relative_path: &str,
    exclusions: &ExclusionRules,
    inclusions: &InclusionRules,
) -> bool {
    let (directory, file_name) = relative_path
        .rsplit_once('/')
        .unwrap_or(("", relative_path));

    if !directory.is_empty() {
        let directory = directory.to_lowercase();
        let excluded = exclusions.normalized_folders().any(|folder| {
            directory
                .strip_prefix(folder.as_str())
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
        });
        if excluded {
            return false;
        }
    }

    if exclusions.file_exclusions.contains(file_name) {
        return false;
    }

    dotted_extension(file_name).is_some_and(|ext| inclusions.includes_extension(ext))
}
