//! Fixture switcher: inject and restore catalogued bugs in a working tree
//!
//! Every operation re-derives its state from disk. The backup sidecars are
//! the only persistent state, which makes re-running `inject` after an
//! interrupted run safe: a target that already has a backup is never backed
//! up again, so the true original is never replaced by buggy content.

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::backup;
use crate::catalog::Catalog;
use crate::error::Result;
use crate::types::{
    BugDefinition, BugState, BugStatus, BugSummary, FileMapping, FileState, FileStatus,
    InjectReport, MissingBackup, RestoreFailure, RestoreReport,
};

/// Applies and reverts bugs from a catalog against a working-tree root
#[derive(Debug, Clone)]
pub struct FixtureSwitcher {
    root: PathBuf,
    catalog: Catalog,
}

impl FixtureSwitcher {
    pub fn new(root: impl Into<PathBuf>, catalog: Catalog) -> Self {
        Self {
            root: root.into(),
            catalog,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The catalog in declared order
    pub fn list(&self) -> Vec<BugSummary> {
        self.catalog.summaries()
    }

    /// Replace every target of `name` with its buggy variant.
    ///
    /// Mappings are processed in declared order. A filesystem failure aborts
    /// the remaining mappings; files already replaced stay replaced.
    pub fn inject(&self, name: &str) -> Result<InjectReport> {
        let bug = self.catalog.require(name)?;
        let suffix = self.catalog.backup_suffix();

        let mut report = InjectReport {
            bug: bug.name.clone(),
            ..Default::default()
        };

        for mapping in &bug.files {
            let (source, target) = self.resolve(mapping);

            if let Some(created) = backup::ensure_backup(&target, suffix)? {
                debug!("Backed up {} to {}", target.display(), created.display());
                report.backups_created.push(created);
            }

            backup::replace_file(&source, &target)?;
            report.replaced.push(target);
        }

        info!(
            "Injected bug '{}' ({} file(s), {} new backup(s))",
            bug.name,
            report.replaced.len(),
            report.backups_created.len()
        );
        Ok(report)
    }

    /// Copy backups back over the targets of `name`.
    ///
    /// A target without a backup is reported and left untouched.
    pub fn restore(&self, name: &str) -> Result<RestoreReport> {
        let bug = self.catalog.require(name)?;
        let mut report = RestoreReport::default();
        self.restore_bug(bug, &mut report)?;

        for missing in &report.missing {
            warn!("{}", missing);
        }
        info!(
            "Restored bug '{}' ({} file(s), {} without backup)",
            bug.name,
            report.restored.len(),
            report.missing.len()
        );
        Ok(report)
    }

    /// Restore every bug in the catalog, skipping targets without a backup.
    ///
    /// A filesystem error stops only the bug it occurred in. It is recorded
    /// in `failed` and the remaining bugs are still restored.
    pub fn restore_all(&self) -> Result<RestoreReport> {
        let mut report = RestoreReport::default();
        for bug in self.catalog.iter() {
            if let Err(e) = self.restore_bug(bug, &mut report) {
                warn!("Could not restore bug '{}': {}", bug.name, e);
                report.failed.push(RestoreFailure {
                    bug: bug.name.clone(),
                    error: e.to_string(),
                });
            }
        }

        for missing in &report.missing {
            debug!("Skipped {}: no backup", missing.target.display());
        }
        info!(
            "Restored {} file(s) across {} bug(s)",
            report.restored.len(),
            self.catalog.len()
        );
        Ok(report)
    }

    /// Current state of every bug, compared by content digest
    pub fn status(&self) -> Result<Vec<BugStatus>> {
        self.catalog.iter().map(|bug| self.bug_status(bug)).collect()
    }

    fn restore_bug(&self, bug: &BugDefinition, report: &mut RestoreReport) -> Result<()> {
        let suffix = self.catalog.backup_suffix();
        for mapping in &bug.files {
            let (_, target) = self.resolve(mapping);
            if backup::restore_backup(&target, suffix)? {
                report.restored.push(target);
            } else {
                report.missing.push(MissingBackup {
                    bug: bug.name.clone(),
                    target,
                });
            }
        }
        Ok(())
    }

    fn bug_status(&self, bug: &BugDefinition) -> Result<BugStatus> {
        let suffix = self.catalog.backup_suffix();
        let mut files = Vec::with_capacity(bug.files.len());

        for mapping in &bug.files {
            let (source, target) = self.resolve(mapping);
            let has_backup = backup::has_backup(&target, suffix);

            let (state, target_sha256) = if target.exists() {
                let digest = backup::sha256_file(&target)?;
                let injected = source.exists() && backup::sha256_file(&source)? == digest;
                let state = if injected {
                    FileState::Injected
                } else {
                    FileState::Clean
                };
                (state, Some(digest))
            } else {
                (FileState::Missing, None)
            };

            files.push(FileStatus {
                target,
                state,
                has_backup,
                target_sha256,
            });
        }

        let states: Vec<FileState> = files.iter().map(|f| f.state).collect();
        Ok(BugStatus {
            name: bug.name.clone(),
            state: BugState::from_files(&states),
            files,
        })
    }

    fn resolve(&self, mapping: &FileMapping) -> (PathBuf, PathBuf) {
        (self.root.join(&mapping.source), self.root.join(&mapping.target))
    }
}
