//! Repograb - incremental branch snapshots into SQLite
//!
//! Snapshots the text of every remote branch matching a keyword into a
//! SQLite database, re-extracting only branches whose head commit moved.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface using clap
//! - [`model`] - Data types (BranchRef, BranchSnapshot, FileLine, rules)
//! - [`vcs`] - Version-control trait and `git` subprocess client
//! - [`extract`] - Corpus extraction (encoding, filtering, README images)
//! - [`storage`] - SQLite snapshot store
//! - [`sync`] - Plan and run an incremental sync
//! - [`config`] - Database path and rule file resolution
//! - [`error`] - Error types and handling

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod model;
pub mod storage;
pub mod sync;
pub mod vcs;

pub use error::{Error, Result};
