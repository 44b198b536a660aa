// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Profile backups.
//!
//! Before a profile gets touched, its mutable files are copied into a fresh
//! backup directory at `<profile>/.backups/update_<timestamp>`. Backups are
//! write-once. Nothing in here ever reads them back, restoration is left to
//! the user.
//!
//! # Pitfalls
//!
//! Timestamps only have a granularity of seconds. Two updates to the same
//! profile within the same second collide, and the second one fails to back
//! up instead of overwriting the first.

use std::{
    fs::{copy, create_dir},
    io::{self, ErrorKind},
    path::{Path, PathBuf},
};
use tracing::{info, instrument, warn};

/// Name of directory holding all backups of a profile.
pub const BACKUP_DIR: &str = ".backups";

/// Files of a profile that get backed up before an update.
pub const PROTECTED_FILES: &[&str] = &[".envrc", ".gitconfig", ".gitignore"];

/// Completed backup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Backup {
    /// Path to backup directory.
    pub path: PathBuf,

    /// Files copied into backup, relative to profile.
    pub copied: Vec<PathBuf>,

    /// Files that existed but could not be copied, relative to profile.
    pub skipped: Vec<PathBuf>,
}

/// Back up protected files of profile.
///
/// Files that do not exist are ignored. Files that cannot be copied are
/// logged and skipped.
///
/// # Errors
///
/// - Return [`BackupError::CreateRoot`] if backup directory cannot be created.
/// - Return [`BackupError::Exists`] if a backup with the same timestamp
///   already exists.
pub fn create_backup(profile_dir: &Path, files: &[impl AsRef<Path>]) -> Result<Backup> {
    let stamp = chrono::Local::now().format("%Y-%m-%d_%H-%M-%S").to_string();
    create_backup_named(profile_dir, files, &stamp, copy_file)
}

#[instrument(skip(profile_dir, files, copy_with), level = "debug")]
pub(crate) fn create_backup_named(
    profile_dir: &Path,
    files: &[impl AsRef<Path>],
    stamp: &str,
    copy_with: impl Fn(&Path, &Path) -> io::Result<()>,
) -> Result<Backup> {
    let root = profile_dir.join(BACKUP_DIR);

    // INVARIANT: mkdirp treats any existing path as success, files included.
    if root.exists() && !root.is_dir() {
        return Err(BackupError::CreateRoot {
            source: io::Error::new(ErrorKind::AlreadyExists, "path is not a directory"),
            path: root,
        });
    }

    mkdirp::mkdirp(&root).map_err(|err| BackupError::CreateRoot {
        source: err,
        path: root.clone(),
    })?;

    // INVARIANT: Never reuse a backup directory.
    let path = root.join(format!("update_{stamp}"));
    create_dir(&path).map_err(|err| match err.kind() {
        ErrorKind::AlreadyExists => BackupError::Exists { path: path.clone() },
        _ => BackupError::CreateRoot {
            source: err,
            path: path.clone(),
        },
    })?;

    let mut backup = Backup {
        path,
        ..Default::default()
    };

    for file in files.iter().map(AsRef::<Path>::as_ref) {
        let src = profile_dir.join(file);
        if !src.is_file() {
            continue;
        }

        match copy_with(&src, &backup.path.join(file)) {
            Ok(()) => backup.copied.push(file.to_path_buf()),
            Err(err) => {
                warn!("failed to back up {:?}: {err}", src.display());
                backup.skipped.push(file.to_path_buf());
            }
        }
    }

    info!("backup created: {:?}", backup.path.display());
    Ok(backup)
}

/// Copy `src` to `dest`, creating parent directories of `dest` as needed.
fn copy_file(src: &Path, dest: &Path) -> io::Result<()> {
    if let Some(parent) = dest.parent() {
        mkdirp::mkdirp(parent)?;
    }
    copy(src, dest)?;
    Ok(())
}

/// Backup error types.
#[derive(Debug, thiserror::Error)]
pub enum BackupError {
    /// Backup directory cannot be created.
    #[error("failed to create backup directory at {:?}", path.display())]
    CreateRoot {
        #[source]
        source: io::Error,
        path: PathBuf,
    },

    /// Backup directory for the same timestamp already exists.
    #[error("backup directory {:?} already exists", path.display())]
    Exists { path: PathBuf },
}

/// Friendly result alias :3
type Result<T, E = BackupError> = std::result::Result<T, E>;
