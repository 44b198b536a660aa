// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Change reporting.
//!
//! An update never prints anything itself. Everything it did, or would have
//! done in dry-run mode, is collected into an [`UpdateReport`] for the caller
//! to display.

use crate::profile::{merge::Change, ManagedFile, ProfileError};

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    path::PathBuf,
};

/// Changes made to one managed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSync {
    /// Managed file that was synchronized.
    pub file: ManagedFile,

    /// File did not exist and was created from defaults.
    pub created: bool,

    /// Section changes applied to existing content.
    pub changes: Vec<Change>,
}

impl FileSync {
    /// File content differs from what was on disk.
    pub fn is_changed(&self) -> bool {
        self.created || !self.changes.is_empty()
    }
}

/// Managed file whose update failed.
#[derive(Debug)]
pub struct FileFailure {
    /// Managed file that failed.
    pub file: ManagedFile,

    /// Reason of failure.
    pub error: ProfileError,
}

/// Everything an update did to a profile.
#[derive(Debug, Default)]
pub struct UpdateReport {
    /// Name of updated profile.
    pub profile: String,

    /// Nothing was written to disk.
    pub dry_run: bool,

    /// Backup directory, if a backup was made.
    pub backup: Option<PathBuf>,

    /// Directories created relative to profile.
    pub created_dirs: Vec<PathBuf>,

    /// Per-file synchronization results.
    pub files: Vec<FileSync>,

    /// Per-file failures.
    pub failures: Vec<FileFailure>,

    /// Non-fatal problems.
    pub warnings: Vec<String>,
}

impl UpdateReport {
    /// Human readable change descriptions in order.
    pub fn changes(&self) -> Vec<String> {
        let mut changes = Vec::new();
        if !self.created_dirs.is_empty() {
            let dirs = self
                .created_dirs
                .iter()
                .map(|dir| dir.display().to_string())
                .collect::<Vec<_>>();
            changes.push(format!("created directories: {}", dirs.join(", ")));
        }

        for sync in &self.files {
            if sync.created {
                changes.push(format!("created {} with default content", sync.file));
            }

            for change in &sync.changes {
                changes.push(format!("{}: {change}", sync.file));
            }
        }

        changes
    }

    /// Profile needed no changes at all.
    pub fn is_up_to_date(&self) -> bool {
        self.created_dirs.is_empty() && self.files.iter().all(|sync| !sync.is_changed())
    }

    /// No managed file failed.
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }
}

impl Display for UpdateReport {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        if let Some(backup) = &self.backup {
            writeln!(fmt, "backup created: {}", backup.display())?;
        }

        for warning in &self.warnings {
            writeln!(fmt, "warning: {warning}")?;
        }

        for failure in &self.failures {
            writeln!(fmt, "failed to update {}: {}", failure.file, failure.error)?;
        }

        if self.is_up_to_date() {
            if self.is_ok() {
                writeln!(fmt, "profile {:?} is already up to date", self.profile)?;
            }
            return Ok(());
        }

        if self.dry_run {
            writeln!(fmt, "dry run, no changes were made to {:?}", self.profile)?;
            writeln!(fmt, "would update:")?;
        } else {
            writeln!(fmt, "updated profile {:?}:", self.profile)?;
        }

        for change in self.changes() {
            writeln!(fmt, "  - {change}")?;
        }

        Ok(())
    }
}
