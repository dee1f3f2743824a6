//! Database migrations embedded at compile time.
//!
//! Migrations are sourced from `/migrations/` at the repo root and
//! embedded into the binary using `include_str!`.

use rusqlite::{Connection, Result};
use tracing::info;

/// A single migration with version identifier and SQL content.
struct Migration {
    version: &'static str,
    sql: &'static str,
}

/// All migrations in order.
///
/// Version names match the SQL filenames (without .sql extension).
const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "001_snapshot_indexes",
        sql: include_str!("../../migrations/001_snapshot_indexes.sql"),
    },
    Migration {
        version: "002_sync_events",
        sql: include_str!("../../migrations/002_sync_events.sql"),
    },
];

/// Run all pending migrations on the database.
///
/// Already-applied migrations (tracked in `schema_migrations`) are skipped,
/// so this is safe to call on every open. Databases written by earlier
/// tools that only have the two snapshot tables are upgraded in place.
///
/// # Errors
///
/// Returns an error if a migration fails to apply.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version TEXT PRIMARY KEY,
            applied_at INTEGER NOT NULL
        )",
        [],
    )?;

    let applied: std::collections::HashSet<String> = conn
        .prepare("SELECT version FROM schema_migrations")?
        .query_map([], |row| row.get(0))?
        .collect::<Result<_, _>>()?;

    for migration in MIGRATIONS {
        if applied.contains(migration.version) {
            continue;
        }

        info!(version = migration.version, "Applying migration");
        conn.execute_batch(migration.sql)?;

        conn.execute(
            "INSERT INTO schema_migrations (version, applied_at) VALUES (?1, ?2)",
            rusqlite::params![migration.version, chrono::Utc::now().timestamp_millis()],
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::schema::SCHEMA_SQL;

    fn setup_db(conn: &Connection) {
        conn.execute_batch(SCHEMA_SQL).expect("Base schema should apply");
    }

    fn applied_count(conn: &Connection) -> i64 {
        conn.query_row("SELECT COUNT(*) FROM schema_migrations", [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn test_run_migrations_fresh_db() {
        let conn = Connection::open_in_memory().unwrap();
        setup_db(&conn);
        run_migrations(&conn).expect("Migrations should apply to fresh database");
        assert_eq!(applied_count(&conn), 2);

        let has_events: bool = conn
            .prepare("SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'sync_events'")
            .unwrap()
            .exists([])
            .unwrap();
        assert!(has_events);
    }

    #[test]
    fn test_run_migrations_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        setup_db(&conn);
        run_migrations(&conn).expect("First run should succeed");
        run_migrations(&conn).expect("Second run should succeed (idempotent)");
        assert_eq!(applied_count(&conn), 2);
    }

    #[test]
    fn test_upgrades_legacy_database() {
        // Tables as written by RepoGrabber: no migrations table, no indexes
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE BranchContent (Id INTEGER PRIMARY KEY AUTOINCREMENT, HeadHash TEXT, BranchName TEXT, ReadmeContent TEXT);
             CREATE TABLE FileLine (Id INTEGER PRIMARY KEY AUTOINCREMENT, BranchContentId INTEGER, RelativePath TEXT, LineNumber INTEGER, LineContent TEXT,
                 FOREIGN KEY(BranchContentId) REFERENCES BranchContent(Id));
             INSERT INTO BranchContent (HeadHash, BranchName) VALUES ('h1', 'main');",
        )
        .unwrap();

        run_migrations(&conn).unwrap();
        assert_eq!(applied_count(&conn), 2);

        let kept: i64 = conn
            .query_row("SELECT COUNT(*) FROM BranchContent", [], |row| row.get(0))
            .unwrap();
        assert_eq!(kept, 1);
    }
}
