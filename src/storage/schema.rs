//! Database schema definitions.
//!
//! `BranchContent` and `FileLine` keep the table and column names of the
//! RepoGrabber database so existing consumers can read stores
//! written by this tool and vice versa.

use rusqlite::{Connection, Result};

/// Current schema version for migration tracking.
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// The base SQL schema.
///
/// A file line never outlives its snapshot: deletes remove `FileLine` rows
/// before their `BranchContent` row inside one transaction, and the foreign
/// key rejects orphans on insert.
pub const SCHEMA_SQL: &str = r"
-- ====================
-- Schema Version Tracking
-- ====================

CREATE TABLE IF NOT EXISTS schema_migrations (
    version TEXT PRIMARY KEY,
    applied_at INTEGER NOT NULL
);

-- ====================
-- Snapshot Tables
-- ====================

-- One row per branch snapshot
CREATE TABLE IF NOT EXISTS BranchContent (
    Id INTEGER PRIMARY KEY AUTOINCREMENT,
    HeadHash TEXT,
    BranchName TEXT,
    ReadmeContent TEXT
);

-- Significant lines of every extracted file in a snapshot
CREATE TABLE IF NOT EXISTS FileLine (
    Id INTEGER PRIMARY KEY AUTOINCREMENT,
    BranchContentId INTEGER,
    RelativePath TEXT,
    LineNumber INTEGER CHECK (LineNumber >= 1),
    LineContent TEXT,
    FOREIGN KEY(BranchContentId) REFERENCES BranchContent(Id)
);
";

/// Apply the schema to the database.
///
/// Idempotent: every statement uses `IF NOT EXISTS`.
///
/// # Errors
///
/// Returns an error if the SQL execution fails or pragmas cannot be set.
pub fn apply_schema(conn: &Connection) -> Result<()> {
    // WAL lets other processes read while a sync transaction is open
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    conn.pragma_update(None, "temp_store", "MEMORY")?;

    conn.execute_batch(SCHEMA_SQL)?;

    super::migrations::run_migrations(conn)?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_migrations (version, applied_at) VALUES (?1, ?2)",
        rusqlite::params![
            format!("v{CURRENT_SCHEMA_VERSION}"),
            chrono::Utc::now().timestamp_millis()
        ],
    )?;

    Ok(())
}
