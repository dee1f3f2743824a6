//! Configuration management.
//!
//! Resolves the database path and loads the path rules that decide which
//! files of a checkout are extracted.
//!
//! # Rule resolution
//!
//! For each of the exclusion and inclusion rules, the first match wins:
//! 1. An explicit file (`--exclusions` / `--inclusions`, or the
//!    `REPOGRAB_EXCLUSIONS` / `REPOGRAB_INCLUSIONS` environment variables)
//! 2. `~/.repograb/exclusions.json` / `~/.repograb/inclusions.json`, if present
//! 3. Built-in defaults
//!
//! An explicit file that is missing or malformed is an error; it never
//! falls through to the next source.

use crate::error::{Error, Result};
use crate::model::{ExclusionRules, InclusionRules};

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Database file used when none is configured, relative to the working directory.
pub const DEFAULT_DB_PATH: &str = "branchcontent.db";

/// File name of user-level exclusion rules.
pub const EXCLUSIONS_FILE: &str = "exclusions.json";

/// File name of user-level inclusion rules.
pub const INCLUSIONS_FILE: &str = "inclusions.json";

/// Where a set of rules came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "path", rename_all = "snake_case")]
pub enum RulesSource {
    Explicit(PathBuf),
    UserDefault(PathBuf),
    Builtin,
}

impl fmt::Display for RulesSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Explicit(path) | Self::UserDefault(path) => write!(f, "{}", path.display()),
            Self::Builtin => f.write_str("built-in"),
        }
    }
}

/// Both rule sets for a run, with their origins.
#[derive(Debug, Clone)]
pub struct RunRules {
    pub exclusions: ExclusionRules,
    pub exclusions_source: RulesSource,
    pub inclusions: InclusionRules,
    pub inclusions_source: RulesSource,
}

/// User-level configuration directory (`~/.repograb/`).
#[must_use]
pub fn global_repograb_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".repograb"))
}

/// Resolve the database path.
///
/// The `REPOGRAB_DB` environment variable is folded into `explicit_path`
/// by the CLI layer.
#[must_use]
pub fn resolve_db_path(explicit_path: Option<&Path>) -> PathBuf {
    explicit_path.map_or_else(|| PathBuf::from(DEFAULT_DB_PATH), Path::to_path_buf)
}

fn load_rules<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.is_file() {
        return Err(Error::RulesFileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse {}: {e}", path.display())))
}

/// Load exclusion rules from a JSON file.
///
/// # Errors
///
/// Returns `RulesFileNotFound` if the file does not exist, or `Config` if
/// it is not valid rules JSON.
pub fn load_exclusions(path: &Path) -> Result<ExclusionRules> {
    load_rules(path)
}

/// Load inclusion rules from a JSON file.
///
/// # Errors
///
/// Returns `RulesFileNotFound` if the file does not exist, or `Config` if
/// it is not valid rules JSON.
pub fn load_inclusions(path: &Path) -> Result<InclusionRules> {
    load_rules(path)
}

fn resolve_in<T: DeserializeOwned>(
    explicit: Option<&Path>,
    user_dir: Option<&Path>,
    file_name: &str,
    builtin: fn() -> T,
) -> Result<(T, RulesSource)> {
    if let Some(path) = explicit {
        return Ok((load_rules(path)?, RulesSource::Explicit(path.to_path_buf())));
    }

    if let Some(candidate) = user_dir.map(|dir| dir.join(file_name)) {
        if candidate.is_file() {
            let rules = load_rules(&candidate)?;
            return Ok((rules, RulesSource::UserDefault(candidate)));
        }
    }

    Ok((builtin(), RulesSource::Builtin))
}

/// Resolve both rule sets for a run.
///
/// # Errors
///
/// Returns an error if a configured rules file is missing or malformed.
pub fn resolve_rules(exclusions: Option<&Path>, inclusions: Option<&Path>) -> Result<RunRules> {
    resolve_rules_in(exclusions, inclusions, global_repograb_dir().as_deref())
}

pub(crate) fn resolve_rules_in(
    exclusions: Option<&Path>,
    inclusions: Option<&Path>,
    user_dir: Option<&Path>,
) -> Result<RunRules> {
    let (exclusions, exclusions_source) =
        resolve_in(exclusions, user_dir, EXCLUSIONS_FILE, ExclusionRules::builtin)?;
    let (inclusions, inclusions_source) =
        resolve_in(inclusions, user_dir, INCLUSIONS_FILE, InclusionRules::builtin)?;

    debug!(
        exclusions = %exclusions_source,
        inclusions = %inclusions_source,
        "Resolved path rules"
    );

    Ok(RunRules {
        exclusions,
        exclusions_source,
        inclusions,
        inclusions_source,
    })
}
