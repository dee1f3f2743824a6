//! SQLite snapshot store.
//!
//! Every write goes through [`SnapshotStore::mutate`], which wraps the change
//! and its audit events in one IMMEDIATE transaction. A snapshot row and its
//! file lines are therefore always inserted or removed together.

use crate::error::Result;
use crate::model::{BranchRef, BranchSnapshot, FileLine, StoredSnapshot};
use crate::storage::events::{insert_event, recent_events, Event, EventType};
use crate::storage::schema::apply_schema;
use rusqlite::{Connection, OpenFlags, OptionalExtension, Transaction};
use serde::Serialize;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite-backed snapshot store.
#[derive(Debug)]
pub struct SnapshotStore {
    conn: Connection,
    run_id: String,
    /// Whether `sync_events` exists; databases written by RepoGrabber lack it
    /// until opened for writing.
    has_events: bool,
}

/// Context for a mutation operation, collecting audit events.
pub struct MutationContext {
    /// Name of the operation being performed.
    pub op_name: String,
    /// Sync run the mutation belongs to.
    pub run_id: String,
    /// Events to write at the end of the transaction.
    pub events: Vec<Event>,
}

impl MutationContext {
    #[must_use]
    pub fn new(op_name: &str, run_id: &str) -> Self {
        Self {
            op_name: op_name.to_string(),
            run_id: run_id.to_string(),
            events: Vec::new(),
        }
    }

    /// Record an event for this operation.
    pub fn record_event(&mut self, event_type: EventType, branch: &BranchRef) -> &mut Event {
        self.events.push(Event::new(
            event_type,
            &branch.name,
            &branch.head_commit,
            &self.run_id,
        ));
        let last = self.events.len() - 1;
        &mut self.events[last]
    }
}

/// Row totals across the whole store.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StoreCounts {
    pub snapshots: usize,
    pub lines: usize,
    pub events: usize,
}

fn to_usize(n: i64) -> usize {
    usize::try_from(n).unwrap_or(0)
}

/// Snapshot rows matching a `WHERE` clause, with their line counts.
fn matching_rows(
    conn: &Connection,
    clause: &str,
    params: &[&dyn rusqlite::ToSql],
) -> rusqlite::Result<Vec<(i64, BranchRef, usize)>> {
    let sql = format!(
        "SELECT b.Id, b.BranchName, b.HeadHash,
                (SELECT COUNT(*) FROM FileLine f WHERE f.BranchContentId = b.Id)
         FROM BranchContent b WHERE {clause} ORDER BY b.Id"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params, |row| {
        let name: Option<String> = row.get(1)?;
        let head: Option<String> = row.get(2)?;
        Ok((
            row.get(0)?,
            BranchRef::new(name.unwrap_or_default(), head.unwrap_or_default()),
            to_usize(row.get(3)?),
        ))
    })?;
    rows.collect()
}

/// Delete snapshot rows (lines first) and record one event per row.
fn delete_rows(
    tx: &Transaction,
    ctx: &mut MutationContext,
    rows: &[(i64, BranchRef, usize)],
    event_type: EventType,
) -> rusqlite::Result<usize> {
    for (id, branch, line_count) in rows {
        tx.execute("DELETE FROM FileLine WHERE BranchContentId = ?1", [id])?;
        tx.execute("DELETE FROM BranchContent WHERE Id = ?1", [id])?;
        ctx.record_event(event_type, branch).line_count = i64::try_from(*line_count).ok();
    }
    Ok(rows.len())
}

/// Insert the snapshot row and all of its lines, returning the new row id.
fn insert_rows(tx: &Transaction, snapshot: &BranchSnapshot) -> rusqlite::Result<i64> {
    tx.execute(
        "INSERT INTO BranchContent (HeadHash, BranchName, ReadmeContent) VALUES (?1, ?2, ?3)",
        rusqlite::params![
            snapshot.head_commit,
            snapshot.branch_name,
            snapshot.primary_document
        ],
    )?;
    let id = tx.last_insert_rowid();

    let mut stmt = tx.prepare_cached(
        "INSERT INTO FileLine (BranchContentId, RelativePath, LineNumber, LineContent)
         VALUES (?1, ?2, ?3, ?4)",
    )?;
    for line in &snapshot.lines {
        stmt.execute(rusqlite::params![
            id,
            line.relative_path,
            line.line_number,
            line.content
        ])?;
    }
    Ok(id)
}

impl SnapshotStore {
    /// Open a database at the given path.
    ///
    /// Creates the database and applies schema if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or schema fails.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;

        apply_schema(&conn)?;
        Ok(Self {
            conn,
            run_id: String::new(),
            has_events: true,
        })
    }

    /// Open an existing database without modifying it.
    ///
    /// No schema or migrations are applied, so a database written by
    /// RepoGrabber is read as-is and reports no audit events.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn open_read_only(path: &Path) -> Result<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        conn.busy_timeout(BUSY_TIMEOUT)?;

        let has_events = conn
            .prepare("SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'sync_events'")?
            .exists([])?;
        Ok(Self {
            conn,
            run_id: String::new(),
            has_events,
        })
    }

    /// Open an in-memory database (for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        apply_schema(&conn)?;
        Ok(Self {
            conn,
            run_id: String::new(),
            has_events: true,
        })
    }

    /// Tag subsequent audit events with a sync run identifier.
    #[must_use]
    pub fn with_run_id(mut self, run_id: impl Into<String>) -> Self {
        self.run_id = run_id.into();
        self
    }

    #[must_use]
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    #[cfg(test)]
    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Execute a mutation with the transaction protocol.
    ///
    /// This method:
    /// 1. Begins an IMMEDIATE transaction (for write locking)
    /// 2. Executes the mutation closure
    /// 3. Writes audit events
    /// 4. Commits (or rolls back on error)
    ///
    /// # Errors
    ///
    /// Returns an error if any step fails. The transaction is rolled back on error.
    pub fn mutate<F, R>(&mut self, op: &str, f: F) -> Result<R>
    where
        F: FnOnce(&Transaction, &mut MutationContext) -> Result<R>,
    {
        let tx = self
            .conn
            .transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;

        let mut ctx = MutationContext::new(op, &self.run_id);

        let result = f(&tx, &mut ctx)?;

        for event in &ctx.events {
            insert_event(&tx, event)?;
        }

        tx.commit()?;
        debug!(op, events = ctx.events.len(), "Committed");

        Ok(result)
    }

    // ==================
    // Inventory
    // ==================

    /// Branch and head commit of every persisted snapshot, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn current_inventory(&self) -> Result<Vec<BranchRef>> {
        let mut stmt = self
            .conn
            .prepare("SELECT BranchName, HeadHash FROM BranchContent ORDER BY Id")?;
        let rows = stmt.query_map([], |row| {
            let name: Option<String> = row.get(0)?;
            let head: Option<String> = row.get(1)?;
            Ok(BranchRef::new(
                name.unwrap_or_default(),
                head.unwrap_or_default(),
            ))
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    // ==================
    // Writes
    // ==================

    /// Delete every snapshot at `head_commit` together with its lines.
    ///
    /// Returns the number of snapshots removed; zero is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction fails.
    pub fn purge(&mut self, head_commit: &str) -> Result<usize> {
        self.mutate("purge", |tx, ctx| {
            let rows = matching_rows(tx, "b.HeadHash = ?1", rusqlite::params![head_commit])?;
            Ok(delete_rows(tx, ctx, &rows, EventType::SnapshotPurged)?)
        })
    }

    /// Delete the snapshot of one branch at one head commit.
    ///
    /// Unlike [`purge`](Self::purge), another branch that happens to share
    /// the same head commit keeps its snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction fails.
    pub fn purge_branch(&mut self, branch: &BranchRef) -> Result<usize> {
        self.mutate("purge_branch", |tx, ctx| {
            let rows = matching_rows(
                tx,
                "b.BranchName = ?1 AND b.HeadHash = ?2",
                rusqlite::params![branch.name, branch.head_commit],
            )?;
            Ok(delete_rows(tx, ctx, &rows, EventType::SnapshotPurged)?)
        })
    }

    /// Persist a snapshot and all its lines atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if any insert fails; nothing is written in that case.
    pub fn insert(&mut self, snapshot: &BranchSnapshot) -> Result<i64> {
        self.replace(None, snapshot)
    }

    /// Remove `superseded` (if any) and insert `snapshot` in one transaction.
    ///
    /// If the insert fails the superseded snapshot is still in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction fails.
    pub fn replace(
        &mut self,
        superseded: Option<&BranchRef>,
        snapshot: &BranchSnapshot,
    ) -> Result<i64> {
        let op = if superseded.is_some() { "replace" } else { "insert" };
        self.mutate(op, |tx, ctx| {
            let removed = match superseded {
                Some(old) => {
                    let rows = matching_rows(
                        tx,
                        "b.BranchName = ?1 AND b.HeadHash = ?2",
                        rusqlite::params![old.name, old.head_commit],
                    )?;
                    for (id, _, _) in &rows {
                        tx.execute("DELETE FROM FileLine WHERE BranchContentId = ?1", [id])?;
                        tx.execute("DELETE FROM BranchContent WHERE Id = ?1", [id])?;
                    }
                    !rows.is_empty()
                }
                None => false,
            };

            let id = insert_rows(tx, snapshot)?;

            let branch = snapshot.branch_ref();
            match superseded {
                Some(old) if removed => {
                    let event = ctx.record_event(EventType::SnapshotReplaced, &branch);
                    event.old_head_commit = Some(old.head_commit.clone());
                    event.line_count = i64::try_from(snapshot.lines.len()).ok();
                }
                _ => {
                    ctx.record_event(EventType::SnapshotInserted, &branch).line_count =
                        i64::try_from(snapshot.lines.len()).ok();
                }
            }
            Ok(id)
        })
    }

    /// Remove snapshots of branches that no longer exist upstream.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction fails.
    pub fn prune(&mut self, orphaned: &[BranchRef]) -> Result<usize> {
        if orphaned.is_empty() {
            return Ok(0);
        }
        self.mutate("prune", |tx, ctx| {
            let mut removed = 0;
            for branch in orphaned {
                let rows = matching_rows(
                    tx,
                    "b.BranchName = ?1 AND b.HeadHash = ?2",
                    rusqlite::params![branch.name, branch.head_commit],
                )?;
                removed += delete_rows(tx, ctx, &rows, EventType::SnapshotPruned)?;
            }
            Ok(removed)
        })
    }

    // ==================
    // Reads
    // ==================

    /// Latest stored snapshot of a branch.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_snapshot(&self, branch_name: &str) -> Result<Option<StoredSnapshot>> {
        let snapshot = self
            .conn
            .query_row(
                "SELECT b.Id, b.HeadHash, b.BranchName, b.ReadmeContent,
                        (SELECT COUNT(*) FROM FileLine f WHERE f.BranchContentId = b.Id)
                 FROM BranchContent b WHERE b.BranchName = ?1
                 ORDER BY b.Id DESC LIMIT 1",
                [branch_name],
                map_stored,
            )
            .optional()?;
        Ok(snapshot)
    }

    /// Every stored snapshot with its line count, ordered by branch name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_snapshots(&self) -> Result<Vec<StoredSnapshot>> {
        let mut stmt = self.conn.prepare(
            "SELECT b.Id, b.HeadHash, b.BranchName, NULL,
                    (SELECT COUNT(*) FROM FileLine f WHERE f.BranchContentId = b.Id)
             FROM BranchContent b
             ORDER BY b.BranchName, b.Id",
        )?;
        let rows = stmt.query_map([], map_stored)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Lines of a stored snapshot in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn snapshot_lines(&self, snapshot_id: i64) -> Result<Vec<FileLine>> {
        let mut stmt = self.conn.prepare(
            "SELECT RelativePath, LineNumber, LineContent FROM FileLine
             WHERE BranchContentId = ?1 ORDER BY Id",
        )?;
        let rows = stmt.query_map([snapshot_id], |row| {
            let path: Option<String> = row.get(0)?;
            let content: Option<String> = row.get(2)?;
            Ok(FileLine::new(
                path.unwrap_or_default(),
                row.get(1)?,
                content.unwrap_or_default(),
            ))
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Row totals.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn counts(&self) -> Result<StoreCounts> {
        let mut counts = self.conn.query_row(
            "SELECT (SELECT COUNT(*) FROM BranchContent), (SELECT COUNT(*) FROM FileLine)",
            [],
            |row| {
                Ok(StoreCounts {
                    snapshots: to_usize(row.get(0)?),
                    lines: to_usize(row.get(1)?),
                    events: 0,
                })
            },
        )?;
        if self.has_events {
            let events: i64 =
                self.conn
                    .query_row("SELECT COUNT(*) FROM sync_events", [], |row| row.get(0))?;
            counts.events = to_usize(events);
        }
        Ok(counts)
    }

    /// Most recent audit events, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn recent_events(&self, limit: u32) -> Result<Vec<Event>> {
        if !self.has_events {
            return Ok(Vec::new());
        }
        Ok(recent_events(&self.conn, limit)?)
    }
}

fn map_stored(row: &rusqlite::Row<'_>) -> rusqlite::Result<StoredSnapshot> {
    let head: Option<String> = row.get(1)?;
    let name: Option<String> = row.get(2)?;
    Ok(StoredSnapshot {
        id: row.get(0)?,
        head_commit: head.unwrap_or_default(),
        branch_name: name.unwrap_or_default(),
        primary_document: row.get(3)?,
        line_count: to_usize(row.get(4)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(branch: &str, head: &str, lines: &[(&str, i64, &str)]) -> BranchSnapshot {
        BranchSnapshot {
            head_commit: head.to_string(),
            branch_name: branch.to_string(),
            primary_document: Some(format!("# {branch}")),
            lines: lines
                .iter()
                .map(|(path, n, text)| FileLine::new(*path, *n, *text))
                .collect(),
        }
    }

    #[test]
    fn test_open_memory() {
        let storage = SnapshotStore::open_memory();
        assert!(storage.is_ok());
    }

    #[test]
    fn test_open_file_twice() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("branchcontent.db");
        {
            let mut store = SnapshotStore::open(&path).unwrap();
            store.insert(&snapshot("main", "h1", &[("a.rs", 1, "x")])).unwrap();
        }
        let store = SnapshotStore::open(&path).unwrap();
        assert_eq!(store.current_inventory().unwrap(), vec![BranchRef::new("main", "h1")]);
    }

    #[test]
    fn test_read_only_open_leaves_legacy_database_untouched() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("legacy.db");
        {
            let conn = Connection::open(&path).unwrap();
            conn.execute_batch(
                "CREATE TABLE BranchContent (Id INTEGER PRIMARY KEY AUTOINCREMENT, HeadHash TEXT, BranchName TEXT, ReadmeContent TEXT);
                 CREATE TABLE FileLine (Id INTEGER PRIMARY KEY AUTOINCREMENT, BranchContentId INTEGER, RelativePath TEXT, LineNumber INTEGER, LineContent TEXT);
                 INSERT INTO BranchContent (HeadHash, BranchName) VALUES ('h1', 'main');
                 INSERT INTO FileLine (BranchContentId, RelativePath, LineNumber, LineContent) VALUES (1, 'a.rs', 1, 'x');",
            )
            .unwrap();
        }

        {
            let store = SnapshotStore::open_read_only(&path).unwrap();
            let counts = store.counts().unwrap();
            assert_eq!(counts.snapshots, 1);
            assert_eq!(counts.lines, 1);
            assert_eq!(counts.events, 0);
            assert!(store.recent_events(10).unwrap().is_empty());
            assert_eq!(store.list_snapshots().unwrap()[0].branch_name, "main");
        }

        let conn = Connection::open(&path).unwrap();
        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type IN ('table', 'index') AND name NOT LIKE 'sqlite_%' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<rusqlite::Result<_>>()
            .unwrap();
        assert_eq!(tables, vec!["BranchContent", "FileLine"]);
    }

    #[test]
    fn test_read_only_store_rejects_writes() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("branchcontent.db");
        SnapshotStore::open(&path)
            .unwrap()
            .insert(&snapshot("main", "h1", &[("a.rs", 1, "x")]))
            .unwrap();

        let mut store = SnapshotStore::open_read_only(&path).unwrap();
        assert_eq!(store.counts().unwrap().events, 1);
        assert!(store.purge("h1").is_err());
        assert_eq!(store.current_inventory().unwrap().len(), 1);
    }

    #[test]
    fn test_insert_and_read_back() {
        let mut store = SnapshotStore::open_memory().unwrap().with_run_id("run_test");
        let id = store
            .insert(&snapshot(
                "main",
                "h1",
                &[("a.rs", 1, "fn a() {}"), ("a.rs", 4, "fn b() {}"), ("b/c.md", 2, "# C")],
            ))
            .unwrap();

        let stored = store.get_snapshot("main").unwrap().unwrap();
        assert_eq!(stored.id, id);
        assert_eq!(stored.head_commit, "h1");
        assert_eq!(stored.primary_document.as_deref(), Some("# main"));
        assert_eq!(stored.line_count, 3);

        let lines = store.snapshot_lines(id).unwrap();
        assert_eq!(lines[1], FileLine::new("a.rs", 4, "fn b() {}"));
        assert_eq!(lines[2].relative_path, "b/c.md");

        let events = store.recent_events(10).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, EventType::SnapshotInserted);
        assert_eq!(events[0].run_id, "run_test");
        assert_eq!(events[0].line_count, Some(3));
    }

    #[test]
    fn test_purge_removes_lines() {
        let mut store = SnapshotStore::open_memory().unwrap();
        store.insert(&snapshot("main", "h1", &[("a.rs", 1, "x"), ("a.rs", 2, "y")])).unwrap();
        store.insert(&snapshot("dev", "h2", &[("a.rs", 1, "z")])).unwrap();

        assert_eq!(store.purge("h1").unwrap(), 1);
        assert_eq!(store.current_inventory().unwrap(), vec![BranchRef::new("dev", "h2")]);

        let counts = store.counts().unwrap();
        assert_eq!(counts.snapshots, 1);
        assert_eq!(counts.lines, 1);
    }

    #[test]
    fn test_purge_absent_is_noop() {
        let mut store = SnapshotStore::open_memory().unwrap();
        store.insert(&snapshot("main", "h1", &[])).unwrap();
        assert_eq!(store.purge("nope").unwrap(), 0);
        assert_eq!(store.current_inventory().unwrap().len(), 1);
        // No event for a purge that removed nothing
        assert_eq!(store.counts().unwrap().events, 1);
    }

    #[test]
    fn test_purge_branch_spares_shared_head() {
        let mut store = SnapshotStore::open_memory().unwrap();
        store.insert(&snapshot("main", "h1", &[("a.rs", 1, "x")])).unwrap();
        store.insert(&snapshot("release", "h1", &[("a.rs", 1, "x")])).unwrap();

        assert_eq!(store.purge_branch(&BranchRef::new("main", "h1")).unwrap(), 1);
        assert_eq!(
            store.current_inventory().unwrap(),
            vec![BranchRef::new("release", "h1")]
        );
    }

    #[test]
    fn test_replace_swaps_head() {
        let mut store = SnapshotStore::open_memory().unwrap();
        store.insert(&snapshot("main", "h1", &[("a.rs", 1, "old")])).unwrap();

        let old = BranchRef::new("main", "h1");
        let id = store
            .replace(Some(&old), &snapshot("main", "h2", &[("a.rs", 1, "new")]))
            .unwrap();

        assert_eq!(store.current_inventory().unwrap(), vec![BranchRef::new("main", "h2")]);
        assert_eq!(store.snapshot_lines(id).unwrap()[0].content, "new");
        assert_eq!(store.counts().unwrap().lines, 1);

        let events = store.recent_events(1).unwrap();
        assert_eq!(events[0].event_type, EventType::SnapshotReplaced);
        assert_eq!(events[0].old_head_commit.as_deref(), Some("h1"));
    }

    #[test]
    fn test_failed_replace_keeps_prior_snapshot() {
        let mut store = SnapshotStore::open_memory().unwrap();
        store.insert(&snapshot("main", "h1", &[("a.rs", 1, "old")])).unwrap();

        // Line number 0 violates the CHECK constraint after the delete ran
        let broken = snapshot("main", "h2", &[("a.rs", 1, "ok"), ("a.rs", 0, "bad")]);
        let result = store.replace(Some(&BranchRef::new("main", "h1")), &broken);
        assert!(result.is_err());

        assert_eq!(store.current_inventory().unwrap(), vec![BranchRef::new("main", "h1")]);
        let counts = store.counts().unwrap();
        assert_eq!(counts.lines, 1);
        assert_eq!(counts.events, 1);
    }

    #[test]
    fn test_prune() {
        let mut store = SnapshotStore::open_memory().unwrap();
        store.insert(&snapshot("main", "h1", &[])).unwrap();
        store.insert(&snapshot("gone", "h9", &[("x.txt", 1, "x")])).unwrap();

        assert_eq!(store.prune(&[]).unwrap(), 0);
        assert_eq!(store.prune(&[BranchRef::new("gone", "h9")]).unwrap(), 1);
        assert_eq!(store.current_inventory().unwrap(), vec![BranchRef::new("main", "h1")]);
        assert_eq!(store.recent_events(1).unwrap()[0].event_type, EventType::SnapshotPruned);
    }

    #[test]
    fn test_list_snapshots_sorted() {
        let mut store = SnapshotStore::open_memory().unwrap();
        store.insert(&snapshot("release", "h2", &[("a", 1, "x")])).unwrap();
        store.insert(&snapshot("main", "h1", &[])).unwrap();

        let listed = store.list_snapshots().unwrap();
        let names: Vec<_> = listed.iter().map(|s| s.branch_name.as_str()).collect();
        assert_eq!(names, vec!["main", "release"]);
        assert!(listed[0].primary_document.is_none());
        assert_eq!(listed[1].line_count, 1);
        assert!(store.get_snapshot("absent").unwrap().is_none());
    }
}
