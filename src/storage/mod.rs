//! SQLite storage layer for branch snapshots.
//!
//! This module provides the persistence layer using SQLite with:
//! - WAL mode so readers are never blocked by a running sync
//! - Transaction discipline for atomic snapshot replacement
//! - Audit events for history
//!
//! # Submodules
//!
//! - [`events`] - Audit event storage
//! - [`migrations`] - Embedded schema migrations
//! - [`schema`] - Database schema definitions
//! - [`sqlite`] - Snapshot store implementation

pub mod events;
pub mod migrations;
pub mod schema;
pub mod sqlite;

pub use events::{Event, EventType};
pub use sqlite::{MutationContext, SnapshotStore, StoreCounts};
