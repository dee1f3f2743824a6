//! Branch snapshot models.
//!
//! A `BranchSnapshot` is built fresh for each branch that needs a rebuild,
//! persisted in one transaction, then dropped.

use serde::{Deserialize, Serialize};

use super::BranchRef;

/// One significant line of one file in a branch's corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileLine {
    /// Path relative to the checkout root, `/`-separated
    pub relative_path: String,

    /// 1-based physical line number within the file
    pub line_number: i64,

    /// Line text without its terminator
    pub content: String,
}

impl FileLine {
    pub fn new(relative_path: impl Into<String>, line_number: i64, content: impl Into<String>) -> Self {
        Self {
            relative_path: relative_path.into(),
            line_number,
            content: content.into(),
        }
    }
}

/// The text corpus of one branch at one commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchSnapshot {
    /// Commit the checkout was at when the corpus was extracted
    pub head_commit: String,

    /// Branch name
    pub branch_name: String,

    /// Root `README.md` with images inlined, if present
    pub primary_document: Option<String>,

    /// Significant lines in traversal order
    pub lines: Vec<FileLine>,
}

impl BranchSnapshot {
    #[must_use]
    pub fn branch_ref(&self) -> BranchRef {
        BranchRef::new(&self.branch_name, &self.head_commit)
    }

    /// Number of distinct files contributing at least one line.
    #[must_use]
    pub fn file_count(&self) -> usize {
        let mut count = 0;
        let mut last: Option<&str> = None;
        for line in &self.lines {
            if last != Some(line.relative_path.as_str()) {
                count += 1;
                last = Some(&line.relative_path);
            }
        }
        count
    }
}

/// Summary of a persisted snapshot row.
#[derive(Debug, Clone, Serialize)]
pub struct StoredSnapshot {
    /// Generated row identifier
    pub id: i64,
    pub head_commit: String,
    pub branch_name: String,
    pub primary_document: Option<String>,
    /// Number of file-line rows referencing this snapshot
    pub line_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_count_groups_consecutive_paths() {
        let snapshot = BranchSnapshot {
            head_commit: "h1".into(),
            branch_name: "main".into(),
            primary_document: None,
            lines: vec![
                FileLine::new("a.rs", 1, "fn a() {}"),
                FileLine::new("a.rs", 3, "fn b() {}"),
                FileLine::new("src/b.rs", 1, "mod x;"),
            ],
        };
        assert_eq!(snapshot.file_count(), 2);
        assert_eq!(snapshot.branch_ref(), BranchRef::new("main", "h1"));
    }
}
