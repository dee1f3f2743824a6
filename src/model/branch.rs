//! Branch reference model.

use serde::{Deserialize, Serialize};

/// A remote branch and the commit it currently points to.
///
/// Identity is the branch `name`; `head_commit` is the version token.
/// Two refs with the same name and head commit describe the same
/// snapshot content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BranchRef {
    /// Branch name without the remote prefix (e.g. `main`, `feature/login`)
    pub name: String,

    /// Full commit identifier the branch points to
    pub head_commit: String,
}

impl BranchRef {
    pub fn new(name: impl Into<String>, head_commit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            head_commit: head_commit.into(),
        }
    }

    /// Same branch, same content.
    #[must_use]
    pub fn is_same_snapshot(&self, other: &Self) -> bool {
        self.name == other.name && self.head_commit == other.head_commit
    }

    /// Abbreviated head commit for display.
    #[must_use]
    pub fn short_commit(&self) -> &str {
        let end = self
            .head_commit
            .char_indices()
            .nth(10)
            .map_or(self.head_commit.len(), |(i, _)| i);
        &self.head_commit[..end]
    }
}

impl std::fmt::Display for BranchRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.name, self.short_commit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_snapshot_requires_name_and_commit() {
        let a = BranchRef::new("main", "abc");
        assert!(a.is_same_snapshot(&BranchRef::new("main", "abc")));
        assert!(!a.is_same_snapshot(&BranchRef::new("main", "def")));
        assert!(!a.is_same_snapshot(&BranchRef::new("dev", "abc")));
    }

    #[test]
    fn test_display_shortens_commit() {
        let b = BranchRef::new("dev", "0123456789abcdef0123");
        assert_eq!(b.to_string(), "dev@0123456789");
        assert_eq!(BranchRef::new("x", "ab").short_commit(), "ab");
    }
}
