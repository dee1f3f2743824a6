//! Incremental branch snapshot synchronization.
//!
//! - **Plan**: diff the stored inventory against fetched branches
//! - **Pipeline**: checkout, extract and persist each branch to rebuild
//!
//! # Example
//!
//! ```ignore
//! use repograb::sync::{run_sync, SyncRequest};
//!
//! let report = run_sync(&GitCli::default(), &mut store, &SyncRequest {
//!     repo_url: "https://host/repo.git",
//!     directory: Path::new("./checkout"),
//!     keyword: "release",
//!     exclusions: &exclusions,
//!     inclusions: &inclusions,
//!     prune: false,
//! })?;
//! ```

mod pipeline;
mod plan;
mod types;

pub use pipeline::{run_sync, SyncRequest};
pub use plan::{plan, SyncPlan};
pub use types::{BranchFailure, BranchOutcome, FailureStage, SyncReport};
