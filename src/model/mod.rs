//! Data models for Repograb.
//!
//! This module contains all domain models:
//! - BranchRef (branch name + head commit)
//! - FileLine / BranchSnapshot (extracted corpus of one branch)
//! - ExclusionRules / InclusionRules (file selection)

pub mod branch;
pub mod rules;
pub mod snapshot;

pub use branch::BranchRef;
pub use rules::{ExclusionRules, InclusionRules};
pub use snapshot::{BranchSnapshot, FileLine, StoredSnapshot};
