// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Profile store management.
//!
//! All profiles live together in one place called the __profile store__. The
//! store can be placed anywhere on the user's file system, but the default
//! location is `$XDG_DATA_HOME/wsprofile`.
//!
//! # Profile Store Layout
//!
//! Each profile is a top-level directory of the store, and the name of that
//! directory is the name of the profile. So, `$XDG_DATA_HOME/wsprofile/work`
//! means that the store contains a profile named "work". Only directories
//! holding an activation script count as profiles. A ".git" directory is
//! never a profile, because people like to keep their store under version
//! control.
//!
//! Only the top-level of the store is evaluated. Profiles cannot be nested.

use crate::profile::{Profile, ProfileError, ACTIVATION_SCRIPT};

use std::{
    fs::read_dir,
    path::{Path, PathBuf},
};
use tracing::{debug, instrument};

/// Directory of profiles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileStore {
    store_path: PathBuf,
}

impl ProfileStore {
    /// Open existing profile store.
    ///
    /// # Errors
    ///
    /// - Return [`StoreError::MissingStore`] if path is not a directory.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let store_path = path.into();
        if !store_path.is_dir() {
            return Err(StoreError::MissingStore { path: store_path });
        }

        Ok(Self { store_path })
    }

    /// Path to profile store.
    pub fn path(&self) -> &Path {
        &self.store_path
    }

    /// List names of all valid profiles in sorted order.
    ///
    /// # Errors
    ///
    /// - Return [`StoreError::ReadStore`] if store cannot be read.
    #[instrument(skip(self), level = "debug")]
    pub fn profiles(&self) -> Result<Vec<String>> {
        let entries = read_dir(&self.store_path).map_err(|err| StoreError::ReadStore {
            source: err,
            path: self.store_path.clone(),
        })?;

        let mut names = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().into_owned();
            if name == ".git" || !path.is_dir() {
                continue;
            }

            if !path.join(ACTIVATION_SCRIPT).is_file() {
                debug!("skip {:?}, no {ACTIVATION_SCRIPT}", path.display());
                continue;
            }

            names.push(name);
        }
        names.sort();

        Ok(names)
    }

    /// Get profile by name.
    ///
    /// # Errors
    ///
    /// - Return [`StoreError::InvalidName`] if name is not a plain directory
    ///   name.
    /// - Return [`StoreError::ProfileNotFound`] if profile does not exist.
    /// - Return [`StoreError::Profile`] if directory is not a valid profile.
    pub fn get(&self, name: impl AsRef<str>) -> Result<Profile> {
        let name = name.as_ref();
        if !is_valid_name(name) {
            return Err(StoreError::InvalidName { name: name.into() });
        }

        let path = self.store_path.join(name);
        if !path.is_dir() {
            return Err(StoreError::ProfileNotFound {
                name: name.into(),
                path,
            });
        }

        Ok(Profile::open(name, path)?)
    }
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && name != ".git"
        && !name.contains(['/', '\\', '\0'])
}

/// Profile store error types.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Profile store directory does not exist.
    #[error("profile store {:?} does not exist", path.display())]
    MissingStore { path: PathBuf },

    /// Profile store directory cannot be read.
    #[error("failed to read profile store {:?}", path.display())]
    ReadStore {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Profile name cannot be used as directory name.
    #[error("invalid profile name {name:?}")]
    InvalidName { name: String },

    /// Profile does not exist.
    #[error("profile {name:?} does not exist at {:?}", path.display())]
    ProfileNotFound { name: String, path: PathBuf },

    /// Profile exists, but cannot be opened.
    #[error(transparent)]
    Profile(#[from] ProfileError),
}

/// Friendly result alias :3
type Result<T, E = StoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sealed_test::prelude::*;
    use simple_test_case::test_case;
    use std::fs::write;

    fn make_profile(path: &str) -> anyhow::Result<()> {
        mkdirp::mkdirp(path)?;
        write(Path::new(path).join(ACTIVATION_SCRIPT), "")?;
        Ok(())
    }

    #[sealed_test]
    fn profiles_lists_only_valid_profiles() -> anyhow::Result<()> {
        make_profile("store/work")?;
        make_profile("store/home")?;
        make_profile("store/.git")?;
        mkdirp::mkdirp("store/notes")?;
        write("store/README.md", "")?;

        let store = ProfileStore::open("store")?;
        assert_eq!(store.profiles()?, vec!["home".to_string(), "work".to_string()]);

        Ok(())
    }

    #[sealed_test]
    fn get_reports_missing_and_invalid_profiles() -> anyhow::Result<()> {
        make_profile("store/work")?;
        mkdirp::mkdirp("store/notes")?;
        let store = ProfileStore::open("store")?;

        assert_eq!(store.get("work")?.name(), "work");
        assert!(matches!(store.get("gone"), Err(StoreError::ProfileNotFound { .. })));
        assert!(matches!(
            store.get("notes"),
            Err(StoreError::Profile(ProfileError::NotAProfile { .. }))
        ));

        Ok(())
    }

    #[sealed_test]
    fn open_missing_store_fails() {
        assert!(matches!(
            ProfileStore::open("nowhere"),
            Err(StoreError::MissingStore { .. })
        ));
    }

    #[test_case("work", true; "plain name")]
    #[test_case("client-a_2", true; "punctuation")]
    #[test_case("", false; "empty")]
    #[test_case("..", false; "parent")]
    #[test_case(".git", false; "git dir")]
    #[test_case("a/b", false; "nested")]
    #[test]
    fn profile_name_validation(name: &str, expect: bool) {
        pretty_assertions::assert_eq!(is_valid_name(name), expect);
    }
}
