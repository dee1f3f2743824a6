//! Error types for Repograb.
//!
//! Provides structured error handling with:
//! - Machine-readable error codes (`ErrorCode`)
//! - Category-based exit codes (2=db, 3=vcs, 4=validation, etc.)
//! - Context-aware recovery hints
//! - Structured JSON output for piped / non-TTY consumers

use std::path::PathBuf;
use thiserror::Error;

use crate::vcs::VcsError;

/// Result type alias for Repograb operations.
pub type Result<T> = std::result::Result<T, Error>;

// ── Error Code ────────────────────────────────────────────────

/// Machine-readable error codes grouped by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Database (exit 2)
    DatabaseError,
    SnapshotNotFound,

    // Version control (exit 3)
    VcsError,

    // Validation (exit 4)
    InvalidArgument,

    // Sync (exit 6)
    SyncIncomplete,

    // Config (exit 7)
    ConfigError,

    // I/O (exit 8)
    IoError,
    JsonError,
}

impl ErrorCode {
    /// Machine-readable SCREAMING_SNAKE code string.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::DatabaseError => "DATABASE_ERROR",
            Self::SnapshotNotFound => "SNAPSHOT_NOT_FOUND",
            Self::VcsError => "VCS_ERROR",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::SyncIncomplete => "SYNC_INCOMPLETE",
            Self::ConfigError => "CONFIG_ERROR",
            Self::IoError => "IO_ERROR",
            Self::JsonError => "JSON_ERROR",
        }
    }

    /// Category-based exit code.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::DatabaseError | Self::SnapshotNotFound => 2,
            Self::VcsError => 3,
            Self::InvalidArgument => 4,
            Self::SyncIncomplete => 6,
            Self::ConfigError => 7,
            Self::IoError | Self::JsonError => 8,
        }
    }

    /// Whether re-running the same command may succeed.
    ///
    /// True for transient conditions (a locked database, a flaky remote,
    /// branches skipped mid-run). False for bad input or configuration.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::DatabaseError | Self::VcsError | Self::SyncIncomplete
        )
    }
}

// ── Error Enum ────────────────────────────────────────────────

/// Errors that can occur in Repograb operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Rules file not found: {path}")]
    RulesFileNotFound { path: PathBuf },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Version control error: {0}")]
    Vcs(#[from] VcsError),

    #[error("No snapshot stored for branch: {branch}")]
    SnapshotNotFound { branch: String },

    #[error("Sync finished with {failed} failed branch(es): {}", branches.join(", "))]
    SyncIncomplete { failed: usize, branches: Vec<String> },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl Error {
    /// Map this error to its structured `ErrorCode`.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::RulesFileNotFound { .. } | Self::Config(_) => ErrorCode::ConfigError,
            Self::Vcs(_) => ErrorCode::VcsError,
            Self::SnapshotNotFound { .. } => ErrorCode::SnapshotNotFound,
            Self::SyncIncomplete { .. } => ErrorCode::SyncIncomplete,
            Self::Database(_) => ErrorCode::DatabaseError,
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) => ErrorCode::JsonError,
            Self::InvalidArgument(_) => ErrorCode::InvalidArgument,
        }
    }

    /// Category-based exit code, delegating to the `ErrorCode`.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        self.error_code().exit_code()
    }

    /// Context-aware recovery hint.
    ///
    /// Returns `None` if no actionable suggestion exists.
    #[must_use]
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::RulesFileNotFound { path } => Some(format!(
                "Create {} or omit the flag to use the built-in rules.",
                path.display()
            )),

            Self::Config(msg) if msg.contains("parse") => Some(
                "Exclusion files look like {\"FolderExclusions\": [...], \"FileExclusions\": [...]}; \
                 inclusion files like {\"FileTypeInclusions\": [\".rs\", \".md\"]}"
                    .to_string(),
            ),

            Self::Vcs(VcsError::Spawn { .. }) => {
                Some("Is `git` installed and on PATH?".to_string())
            }

            Self::Vcs(VcsError::ForeignClone { path, .. }) => Some(format!(
                "Pick another DIRECTORY or remove {} so it can be cloned again.",
                path.display()
            )),

            Self::SnapshotNotFound { .. } => {
                Some("Use `repograb status` to list stored snapshots.".to_string())
            }

            Self::SyncIncomplete { .. } => Some(
                "Prior snapshots of the failed branches were kept. Re-run `repograb sync` to retry them."
                    .to_string(),
            ),

            Self::Config(_)
            | Self::Vcs(_)
            | Self::Database(_)
            | Self::Io(_)
            | Self::Json(_)
            | Self::InvalidArgument(_) => None,
        }
    }

    /// Structured JSON representation for machine consumption.
    #[must_use]
    pub fn to_structured_json(&self) -> serde_json::Value {
        let code = self.error_code();
        let mut obj = serde_json::json!({
            "error": {
                "code": code.as_str(),
                "message": self.to_string(),
                "retryable": code.is_retryable(),
                "exit_code": code.exit_code(),
            }
        });

        if let Some(hint) = self.hint() {
            obj["error"]["hint"] = serde_json::Value::String(hint);
        }

        obj
    }
}
