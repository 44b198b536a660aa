// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Workspace profile representation.
//!
//! A __profile__ is a named directory holding the generated configuration of
//! one workspace. Entering the directory switches tool configuration through
//! an external directory hook that sources the profile's activation script.
//!
//! # Profile Layout
//!
//! ```text
//! <profile>/
//!   .envrc       activation script, exports tool configuration paths
//!   .gitconfig   git identity of the workspace
//!   .gitignore   keeps credentials out of version control
//!   .env         secrets, loaded by the activation script
//!   .backups/    snapshots taken before each update
//! ```
//!
//! A directory without an activation script is not a profile.
//!
//! # Updating Profiles
//!
//! Profiles are created once from a template, but the set of tools they need
//! to configure keeps growing. Updating brings an existing profile up to date
//! in one stateless pass:
//!
//! 1. Back up mutable files, see [`backup`].
//! 2. Create missing tool directories, see [`scaffold`].
//! 3. Merge each managed file against its catalog, see [`merge`].
//! 4. Hand an [`UpdateReport`] back to the caller.
//!
//! Each file's new content is computed in full before it replaces the old
//! content in one write. A failing file is reported, and does not stop its
//! siblings from being updated. Dry-run mode computes everything and writes
//! nothing.

pub mod anchor;
pub mod backup;
pub mod catalog;
pub mod matcher;
pub mod merge;
pub mod report;
pub mod scaffold;

use crate::profile::{
    backup::{create_backup, BackupError, PROTECTED_FILES},
    catalog::{envrc_catalog, gitignore_catalog, Catalog, DEFAULT_GITIGNORE},
    matcher::{Detection, LineMatcher, SectionMatcher, SubstringMatcher},
    merge::MergeEngine,
    report::{FileFailure, FileSync, UpdateReport},
    scaffold::{scaffold_dirs, REQUIRED_DIRS, SENSITIVE_DIR},
};

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    fs::{read_to_string, write},
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tracing::{debug, error, info, instrument, warn};

/// Name of the activation script every profile must have.
pub const ACTIVATION_SCRIPT: &str = ".envrc";

/// Files that updates synchronize against a catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManagedFile {
    /// Environment activation script.
    ActivationScript,

    /// Version control ignore-list.
    IgnoreList,
}

impl ManagedFile {
    /// All managed files in update order.
    pub const ALL: [ManagedFile; 2] = [Self::ActivationScript, Self::IgnoreList];

    /// File name relative to profile root.
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::ActivationScript => ACTIVATION_SCRIPT,
            Self::IgnoreList => ".gitignore",
        }
    }

    /// Catalog the file is synchronized against.
    pub fn catalog(&self) -> &'static Catalog {
        match self {
            Self::ActivationScript => envrc_catalog(),
            Self::IgnoreList => gitignore_catalog(),
        }
    }

    /// Content to create file with when it is missing.
    ///
    /// Activation script has none, because its absence means the directory
    /// is not a profile at all.
    pub fn default_content(&self) -> Option<&'static str> {
        match self {
            Self::ActivationScript => None,
            Self::IgnoreList => Some(DEFAULT_GITIGNORE),
        }
    }
}

impl Display for ManagedFile {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        fmt.write_str(self.file_name())
    }
}

/// Options of a profile update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOptions {
    /// Continue without asking if backup fails.
    pub force: bool,

    /// Compute changes, but write nothing.
    pub dry_run: bool,

    /// Skip backup entirely.
    pub no_backup: bool,

    /// Strategy to detect existing configuration with.
    pub detection: Detection,
}

/// A workspace profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    name: String,
    root: PathBuf,
}

impl Profile {
    /// Open existing profile at target directory.
    ///
    /// # Errors
    ///
    /// - Return [`ProfileError::NotAProfile`] if directory has no activation
    ///   script.
    pub fn open(name: impl Into<String>, root: impl Into<PathBuf>) -> Result<Self> {
        let name = name.into();
        let root = root.into();
        if !root.join(ACTIVATION_SCRIPT).is_file() {
            return Err(ProfileError::NotAProfile { name, path: root });
        }

        Ok(Self { name, root })
    }

    /// Name of profile.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Root directory of profile.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path of managed file.
    pub fn path_of(&self, file: ManagedFile) -> PathBuf {
        self.root.join(file.file_name())
    }

    /// Update profile to match current catalogs.
    ///
    /// If the backup fails, `continue_without_backup` decides whether to go
    /// on anyway. It is never asked when [`UpdateOptions::force`] is set.
    /// Failures of individual managed files end up in the report instead of
    /// aborting the update.
    ///
    /// # Errors
    ///
    /// - Return [`ProfileError::Cancelled`] if caller declines to continue
    ///   without backup. Nothing has been modified at that point.
    /// - Return [`ProfileError::Scaffold`] if required directories cannot be
    ///   created.
    #[instrument(skip(self, opts, continue_without_backup), fields(profile = %self.name), level = "debug")]
    pub fn update<F>(&self, opts: &UpdateOptions, continue_without_backup: F) -> Result<UpdateReport>
    where
        F: FnOnce(&BackupError) -> bool,
    {
        info!("updating profile {:?} at {:?}", self.name, self.root.display());
        let mut report = UpdateReport {
            profile: self.name.clone(),
            dry_run: opts.dry_run,
            ..Default::default()
        };

        if !opts.no_backup && !opts.dry_run {
            match create_backup(&self.root, PROTECTED_FILES) {
                Ok(backup) => {
                    report.warnings.extend(backup.skipped.iter().map(|file| {
                        format!("{} was not backed up", file.display())
                    }));
                    report.backup = Some(backup.path);
                }
                Err(err) => {
                    warn!("failed to create backup: {err}");
                    if !opts.force && !continue_without_backup(&err) {
                        return Err(ProfileError::Cancelled);
                    }
                    report.warnings.push(format!("continued without backup: {err}"));
                }
            }
        }

        let scaffold = scaffold_dirs(
            &self.root,
            REQUIRED_DIRS,
            Some(Path::new(SENSITIVE_DIR)),
            opts.dry_run,
        )?;
        report.created_dirs = scaffold.created;
        report.warnings.extend(scaffold.warnings);

        match opts.detection {
            Detection::Substring => {
                self.sync_all(&MergeEngine::new(SubstringMatcher), opts.dry_run, &mut report)
            }
            Detection::Line => {
                self.sync_all(&MergeEngine::new(LineMatcher), opts.dry_run, &mut report)
            }
        }

        Ok(report)
    }

    fn sync_all<M>(&self, engine: &MergeEngine<M>, dry_run: bool, report: &mut UpdateReport)
    where
        M: SectionMatcher,
    {
        for file in ManagedFile::ALL {
            match self.sync_file(file, engine, dry_run) {
                Ok(sync) => report.files.push(sync),
                Err(err) => {
                    error!("failed to update {file}: {err}");
                    report.failures.push(FileFailure { file, error: err });
                }
            }
        }
    }

    /// Synchronize one managed file with its catalog.
    ///
    /// Missing files with default content are created from it. The merged
    /// content replaces the file in a single write, and only if something
    /// changed. Dry-run mode never writes.
    ///
    /// # Errors
    ///
    /// - Return [`ProfileError::ReadFile`] if file cannot be read.
    /// - Return [`ProfileError::WriteFile`] if file cannot be written.
    #[instrument(skip(self, engine), level = "debug")]
    pub fn sync_file<M>(&self, file: ManagedFile, engine: &MergeEngine<M>, dry_run: bool) -> Result<FileSync>
    where
        M: SectionMatcher,
    {
        let path = self.path_of(file);
        let (content, sync) = match read_to_string(&path) {
            Ok(current) => {
                let outcome = engine.merge(&current, file.catalog());
                let sync = FileSync {
                    file,
                    created: false,
                    changes: outcome.changes,
                };
                (outcome.text, sync)
            }
            Err(err) if err.kind() == ErrorKind::NotFound && file.default_content().is_some() => {
                debug!("{file} is missing, creating it from defaults");
                let sync = FileSync {
                    file,
                    created: true,
                    changes: Vec::new(),
                };
                (file.default_content().unwrap_or_default().to_string(), sync)
            }
            Err(err) => return Err(ProfileError::ReadFile { source: err, path }),
        };

        if !sync.is_changed() {
            debug!("{file} is up to date");
            return Ok(sync);
        }

        if dry_run {
            info!("would update {:?}", path.display());
        } else {
            write(&path, content.as_bytes())
                .map_err(|err| ProfileError::WriteFile { source: err, path: path.clone() })?;
            info!("updated {:?}", path.display());
        }

        Ok(sync)
    }
}

/// Profile error types.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    /// Directory exists, but lacks an activation script.
    #[error("profile {name:?} does not appear to be a valid profile (missing .envrc) at {:?}", path.display())]
    NotAProfile { name: String, path: PathBuf },

    /// Managed file cannot be read.
    #[error("failed to read {:?}", path.display())]
    ReadFile {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Managed file cannot be written.
    #[error("failed to write {:?}", path.display())]
    WriteFile {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Caller declined to continue without backup.
    #[error("update cancelled")]
    Cancelled,

    /// Required directories cannot be created.
    #[error("failed to update directories")]
    Scaffold(#[from] crate::profile::scaffold::ScaffoldError),
}

/// Friendly result alias :3
type Result<T, E = ProfileError> = std::result::Result<T, E>;
