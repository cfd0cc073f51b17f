//! Core types for bugswap

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

// ============================================================================
// Catalog Types
// ============================================================================

/// One file substitution: the buggy variant and the live file it replaces
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMapping {
    /// Path to the pre-authored buggy variant
    pub source: PathBuf,

    /// Path to the live file that gets overwritten
    pub target: PathBuf,
}

/// A named, catalogued set of file substitutions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BugDefinition {
    /// Unique key within the catalog
    pub name: String,

    /// Human-readable description of the visual defect
    pub description: String,

    /// Substitutions applied in declared order
    pub files: Vec<FileMapping>,
}

/// Catalog entry as shown by `list`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BugSummary {
    pub name: String,
    pub description: String,
    pub files: usize,
}

impl From<&BugDefinition> for BugSummary {
    fn from(bug: &BugDefinition) -> Self {
        Self {
            name: bug.name.clone(),
            description: bug.description.clone(),
            files: bug.files.len(),
        }
    }
}

// ============================================================================
// Operation Reports
// ============================================================================

/// Outcome of injecting a bug
#[derive(Debug, Clone, Default, Serialize)]
pub struct InjectReport {
    pub bug: String,

    /// Targets overwritten with buggy content, in declared order
    pub replaced: Vec<PathBuf>,

    /// Backups created by this run (existing backups are left alone)
    pub backups_created: Vec<PathBuf>,
}

/// A restore that found no backup for a target.
///
/// Non-fatal: the target is left as it is and processing continues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingBackup {
    pub bug: String,
    pub target: PathBuf,
}

impl fmt::Display for MissingBackup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "No backup found for {} ({})", self.target.display(), self.bug)
    }
}

/// Outcome of restoring one bug or the whole catalog
#[derive(Debug, Clone, Default, Serialize)]
pub struct RestoreReport {
    /// Targets copied back from their backup
    pub restored: Vec<PathBuf>,

    /// Targets without a backup
    pub missing: Vec<MissingBackup>,

    /// Bugs a bulk restore could not finish; their later mappings were skipped
    pub failed: Vec<RestoreFailure>,
}

impl RestoreReport {
    pub fn is_empty(&self) -> bool {
        self.restored.is_empty() && self.missing.is_empty() && self.failed.is_empty()
    }
}

/// A bug whose restore stopped on a filesystem error
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RestoreFailure {
    pub bug: String,
    pub error: String,
}

// ============================================================================
// Status Types
// ============================================================================

/// State of a single target relative to its buggy source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileState {
    /// Target content differs from the buggy variant
    Clean,
    /// Target content equals the buggy variant
    Injected,
    /// Target does not exist
    Missing,
}

impl fmt::Display for FileState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileState::Clean => write!(f, "clean"),
            FileState::Injected => write!(f, "injected"),
            FileState::Missing => write!(f, "missing"),
        }
    }
}

/// Aggregate state of a bug across all its targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BugState {
    Clean,
    Injected,
    Partial,
}

impl BugState {
    /// Fold per-file states: all injected, none injected, or a mix
    pub fn from_files(states: &[FileState]) -> Self {
        let injected = states.iter().filter(|s| **s == FileState::Injected).count();
        if injected == 0 {
            BugState::Clean
        } else if injected == states.len() {
            BugState::Injected
        } else {
            BugState::Partial
        }
    }
}

impl fmt::Display for BugState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BugState::Clean => write!(f, "clean"),
            BugState::Injected => write!(f, "injected"),
            BugState::Partial => write!(f, "partial"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FileStatus {
    pub target: PathBuf,
    pub state: FileState,
    pub has_backup: bool,

    /// SHA-256 of the current target content, if it exists
    pub target_sha256: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BugStatus {
    pub name: String,
    pub state: BugState,
    pub files: Vec<FileStatus>,
}
