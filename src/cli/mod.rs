//! CLI definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

/// Repograb - snapshot the text of matching git branches into SQLite
#[derive(Parser, Debug)]
#[command(name = "repograb", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Database path (default: ./branchcontent.db)
    #[arg(long, global = true, env = "REPOGRAB_DB")]
    pub db: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no output except errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Snapshot every remote branch whose name contains KEYWORD
    Sync(SyncArgs),

    /// Show stored snapshots and recent changes
    Status {
        /// Number of recent audit events to show
        #[arg(long, default_value = "10")]
        events: u32,

        /// Show the stored snapshot of one branch instead
        #[arg(long)]
        branch: Option<String>,
    },

    /// Print version information
    Version,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(clap::Args, Debug)]
pub struct SyncArgs {
    /// Repository to clone or fetch from
    pub repo_url: String,

    /// Local working directory for the clone (shared by all branches)
    pub directory: PathBuf,

    /// Substring a branch name must contain ("" matches every branch)
    pub keyword: String,

    /// JSON file with FolderExclusions / FileExclusions
    #[arg(long, env = "REPOGRAB_EXCLUSIONS")]
    pub exclusions: Option<PathBuf>,

    /// JSON file with FileTypeInclusions
    #[arg(long, env = "REPOGRAB_INCLUSIONS")]
    pub inclusions: Option<PathBuf>,

    /// Remove snapshots of branches that no longer exist upstream
    #[arg(long)]
    pub prune: bool,
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_sync() {
        let cli = Cli::try_parse_from([
            "repograb",
            "sync",
            "https://host/repo.git",
            "./work",
            "release",
            "--prune",
            "--db",
            "/tmp/x.db",
        ])
        .unwrap();

        let Commands::Sync(args) = cli.command else {
            panic!("expected sync");
        };
        assert_eq!(args.keyword, "release");
        assert!(args.prune);
        assert_eq!(cli.db, Some(PathBuf::from("/tmp/x.db")));
    }

    #[test]
    fn test_parse_status_branch() {
        let cli = Cli::try_parse_from(["repograb", "status", "--branch", "release/1.0"]).unwrap();
        let Commands::Status { branch, events } = cli.command else {
            panic!("expected status");
        };
        assert_eq!(branch.as_deref(), Some("release/1.0"));
        assert_eq!(events, 10);
    }

    #[test]
    fn test_sync_requires_all_positionals() {
        let err = Cli::try_parse_from(["repograb", "sync", "https://host/repo.git"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }
}
