//! Audit event storage and retrieval.
//!
//! Every snapshot insert or delete leaves one event, written in the same
//! transaction as the change it describes.

use rusqlite::{Connection, Result};
use serde::Serialize;

/// Event types for audit logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// A new branch was snapshotted.
    SnapshotInserted,
    /// A snapshot was replaced by one at a newer head commit.
    SnapshotReplaced,
    /// A snapshot was deleted by head commit.
    SnapshotPurged,
    /// A snapshot of a branch no longer upstream was removed.
    SnapshotPruned,
}

impl EventType {
    /// Get the string representation for storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SnapshotInserted => "snapshot_inserted",
            Self::SnapshotReplaced => "snapshot_replaced",
            Self::SnapshotPurged => "snapshot_purged",
            Self::SnapshotPruned => "snapshot_pruned",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "snapshot_inserted" => Some(Self::SnapshotInserted),
            "snapshot_replaced" => Some(Self::SnapshotReplaced),
            "snapshot_purged" => Some(Self::SnapshotPurged),
            "snapshot_pruned" => Some(Self::SnapshotPruned),
            _ => None,
        }
    }
}

/// An audit event record.
#[derive(Debug, Clone, Serialize)]
pub struct Event {
    pub id: i64,
    pub event_type: EventType,
    pub branch_name: String,
    pub head_commit: String,
    /// Head commit of the snapshot this one superseded
    pub old_head_commit: Option<String>,
    pub line_count: Option<i64>,
    /// Identifier of the sync run that made the change
    pub run_id: String,
    pub created_at: i64,
}

impl Event {
    /// Create a new event (id will be assigned by database).
    #[must_use]
    pub fn new(event_type: EventType, branch_name: &str, head_commit: &str, run_id: &str) -> Self {
        Self {
            id: 0,
            event_type,
            branch_name: branch_name.to_string(),
            head_commit: head_commit.to_string(),
            old_head_commit: None,
            line_count: None,
            run_id: run_id.to_string(),
            created_at: chrono::Utc::now().timestamp_millis(),
        }
    }
}

/// Insert an event into the database.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_event(conn: &Connection, event: &Event) -> Result<i64> {
    conn.execute(
        "INSERT INTO sync_events (event_type, branch_name, head_commit, old_head_commit, line_count, run_id, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        rusqlite::params![
            event.event_type.as_str(),
            event.branch_name,
            event.head_commit,
            event.old_head_commit,
            event.line_count,
            event.run_id,
            event.created_at,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Most recent events, newest first.
///
/// Rows with an unknown event type are skipped.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn recent_events(conn: &Connection, limit: u32) -> Result<Vec<Event>> {
    let mut stmt = conn.prepare(
        "SELECT id, event_type, branch_name, head_commit, old_head_commit, line_count, run_id, created_at
         FROM sync_events
         ORDER BY created_at DESC, id DESC
         LIMIT ?1",
    )?;

    let rows = stmt.query_map([limit], |row| {
        let kind: String = row.get(1)?;
        Ok(EventType::parse(&kind).map(|event_type| Event {
            id: row.get(0).unwrap_or_default(),
            event_type,
            branch_name: row.get(2).unwrap_or_default(),
            head_commit: row.get(3).unwrap_or_default(),
            old_head_commit: row.get(4).ok().flatten(),
            line_count: row.get(5).ok().flatten(),
            run_id: row.get(6).unwrap_or_default(),
            created_at: row.get(7).unwrap_or_default(),
        }))
    })?;

    let mut events = Vec::new();
    for row in rows {
        if let Some(event) = row? {
            events.push(event);
        }
    }
    Ok(events)
}
