//! File selection rules.
//!
//! Rules files use the RepoGrabber JSON key names
//! (`FolderExclusions`, `FileExclusions`, `FileTypeInclusions`);
//! camelCase and snake_case spellings are accepted too.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Deny-list of folders and file names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionRules {
    /// Relative directory prefixes, matched case-insensitively
    #[serde(
        rename = "FolderExclusions",
        alias = "folderExclusions",
        alias = "folder_exclusions",
        default
    )]
    pub folder_exclusions: Vec<String>,

    /// Exact file names (no directory part)
    #[serde(
        rename = "FileExclusions",
        alias = "fileExclusions",
        alias = "file_exclusions",
        default
    )]
    pub file_exclusions: BTreeSet<String>,
}

impl ExclusionRules {
    /// Rules used when no exclusion file is configured.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            folder_exclusions: [".git", ".vs", ".idea", "node_modules", "bin", "obj", "target"]
                .into_iter()
                .map(String::from)
                .collect(),
            file_exclusions: ["package-lock.json", "yarn.lock", "Cargo.lock"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }

    /// Folder exclusions with separators normalized to `/` and no
    /// trailing separator, lowercased for comparison.
    pub(crate) fn normalized_folders(&self) -> impl Iterator<Item = String> + '_ {
        self.folder_exclusions
            .iter()
            .map(|f| f.replace('\\', "/").trim_end_matches('/').to_lowercase())
            .filter(|f| !f.is_empty())
    }
}

/// Allow-list of file extensions (with leading dot).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InclusionRules {
    #[serde(
        rename = "FileTypeInclusions",
        alias = "fileTypeInclusions",
        alias = "file_type_inclusions",
        default
    )]
    pub file_type_inclusions: BTreeSet<String>,
}

impl InclusionRules {
    /// Rules used when no inclusion file is configured.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            file_type_inclusions: [
                ".md", ".txt", ".rs", ".toml", ".cs", ".csproj", ".sln", ".py", ".js", ".ts",
                ".tsx", ".jsx", ".java", ".kt", ".go", ".c", ".h", ".cpp", ".hpp", ".json",
                ".yaml", ".yml", ".xml", ".html", ".css", ".sql", ".sh", ".ps1",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }

    #[must_use]
    pub fn includes_extension(&self, extension: &str) -> bool {
        self.file_type_inclusions.contains(extension)
    }
}
