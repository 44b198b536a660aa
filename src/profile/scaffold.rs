// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Required directory scaffolding.
//!
//! Profiles point tool configuration homes into themselves, so those homes
//! must exist. Scaffolding does not care about file content at all.

use std::{
    io::{self, ErrorKind},
    path::{Path, PathBuf},
};
use tracing::{debug, info, instrument, warn};

/// Directories every profile must have, relative to profile root.
pub const REQUIRED_DIRS: &[&str] = &[
    ".config/1Password",
    ".config/claude",
    ".config/gemini",
    ".ssh",
    ".aws",
    ".azure",
    ".gcloud",
    ".kube",
    "bin",
    "code",
];

/// Directory restricted to owner access only.
pub const SENSITIVE_DIR: &str = ".ssh";

/// Outcome of scaffolding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scaffold {
    /// Directories created, or that would be created in dry-run mode.
    pub created: Vec<PathBuf>,

    /// Non-fatal problems, e.g., permission hardening failures.
    pub warnings: Vec<String>,
}

/// Create missing required directories of profile.
///
/// After creation, the sensitive directory gets its permissions restricted
/// to `0700` if it exists. Failing to do so is only a warning. Dry-run mode
/// reports what is missing, but touches nothing.
///
/// # Errors
///
/// - Return [`ScaffoldError::CreateDir`] if a directory cannot be created,
///   including when a non-directory already occupies its path.
pub fn scaffold_dirs(
    profile_dir: &Path,
    required: &[impl AsRef<Path>],
    sensitive: Option<&Path>,
    dry_run: bool,
) -> Result<Scaffold> {
    scaffold_dirs_with(profile_dir, required, sensitive, dry_run, restrict_to_owner)
}

#[instrument(skip(profile_dir, required, sensitive, restrict), level = "debug")]
pub(crate) fn scaffold_dirs_with(
    profile_dir: &Path,
    required: &[impl AsRef<Path>],
    sensitive: Option<&Path>,
    dry_run: bool,
    restrict: impl Fn(&Path) -> io::Result<()>,
) -> Result<Scaffold> {
    let mut scaffold = Scaffold::default();

    for dir in required.iter().map(AsRef::<Path>::as_ref) {
        let path = profile_dir.join(dir);
        if path.is_dir() {
            continue;
        }

        // INVARIANT: mkdirp treats any existing path as success, files included.
        if path.exists() {
            return Err(ScaffoldError::CreateDir {
                source: io::Error::new(ErrorKind::AlreadyExists, "path is not a directory"),
                path,
            });
        }

        if !dry_run {
            mkdirp::mkdirp(&path).map_err(|err| ScaffoldError::CreateDir {
                source: err,
                path: path.clone(),
            })?;
            info!("created directory {:?}", path.display());
        }
        scaffold.created.push(dir.to_path_buf());
    }

    if let Some(sensitive) = sensitive {
        let path = profile_dir.join(sensitive);
        if !dry_run && path.is_dir() {
            if let Err(err) = restrict(&path) {
                let warning = format!(
                    "failed to set permissions of {:?}: {err}",
                    path.display()
                );
                warn!("{warning}");
                scaffold.warnings.push(warning);
            } else {
                debug!("restricted {:?} to owner", path.display());
            }
        }
    }

    Ok(scaffold)
}

#[cfg(unix)]
fn restrict_to_owner(path: &Path) -> io::Result<()> {
    use std::{fs::{set_permissions, Permissions}, os::unix::fs::PermissionsExt};
    set_permissions(path, Permissions::from_mode(0o700))
}

#[cfg(not(unix))]
fn restrict_to_owner(_path: &Path) -> io::Result<()> {
    Ok(())
}

/// Scaffolding error types.
#[derive(Debug, thiserror::Error)]
pub enum ScaffoldError {
    /// Required directory cannot be created.
    #[error("failed to create directory {:?}", path.display())]
    CreateDir {
        #[source]
        source: io::Error,
        path: PathBuf,
    },
}

/// Friendly result alias :3
type Result<T, E = ScaffoldError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sealed_test::prelude::*;

    #[sealed_test]
    fn scaffold_creates_only_missing_dirs() -> anyhow::Result<()> {
        let profile = Path::new("work");
        mkdirp::mkdirp(profile.join(".aws"))?;

        let result = scaffold_dirs(profile, &[".aws", ".kube", "bin/tools"], None, false)?;

        assert_eq!(
            result.created,
            vec![PathBuf::from(".kube"), PathBuf::from("bin/tools")]
        );
        assert!(profile.join("bin/tools").is_dir());

        let result = scaffold_dirs(profile, &[".aws", ".kube", "bin/tools"], None, false)?;
        assert_eq!(result, Scaffold::default());

        Ok(())
    }

    #[sealed_test]
    fn scaffold_dry_run_touches_nothing() -> anyhow::Result<()> {
        let profile = Path::new("work");
        mkdirp::mkdirp(profile)?;

        let result = scaffold_dirs(profile, REQUIRED_DIRS, Some(Path::new(SENSITIVE_DIR)), true)?;

        assert_eq!(result.created.len(), REQUIRED_DIRS.len());
        assert!(!profile.join(".ssh").exists());

        Ok(())
    }

    #[cfg(unix)]
    #[sealed_test]
    fn scaffold_restricts_sensitive_dir() -> anyhow::Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let profile = Path::new("work");
        mkdirp::mkdirp(profile)?;

        let result = scaffold_dirs(profile, REQUIRED_DIRS, Some(Path::new(SENSITIVE_DIR)), false)?;

        assert!(result.warnings.is_empty());
        let mode = std::fs::metadata(profile.join(".ssh"))?.permissions().mode();
        assert_eq!(mode & 0o777, 0o700);

        Ok(())
    }

    #[sealed_test]
    fn scaffold_fails_when_path_is_a_file() -> anyhow::Result<()> {
        let profile = Path::new("work");
        mkdirp::mkdirp(profile)?;
        std::fs::write(profile.join("bin"), "oops")?;

        let result = scaffold_dirs(profile, &["bin"], None, false);
        assert!(matches!(result, Err(ScaffoldError::CreateDir { .. })));
        assert!(profile.join("bin").is_file());

        let result = scaffold_dirs(profile, &["bin"], None, true);
        assert!(matches!(result, Err(ScaffoldError::CreateDir { .. })));

        Ok(())
    }

    #[sealed_test]
    fn scaffold_permission_failure_is_only_a_warning() -> anyhow::Result<()> {
        let profile = Path::new("work");
        mkdirp::mkdirp(profile)?;

        let result = scaffold_dirs_with(
            profile,
            &[".ssh", "bin"],
            Some(Path::new(SENSITIVE_DIR)),
            false,
            |_| Err(io::Error::new(ErrorKind::PermissionDenied, "chmod refused")),
        )?;

        assert_eq!(
            result.created,
            vec![PathBuf::from(".ssh"), PathBuf::from("bin")]
        );
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("chmod refused"));
        assert!(profile.join(".ssh").is_dir());

        Ok(())
    }
}
