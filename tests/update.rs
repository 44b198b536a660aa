// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

use wsprofile::{
    profile::{
        catalog::{envrc_catalog, DEFAULT_GITIGNORE},
        merge::Change,
        ManagedFile, UpdateOptions,
    },
    ProfileError, ProfileStore,
};

use anyhow::Result;
use indoc::indoc;
use pretty_assertions::assert_eq;
use sealed_test::prelude::*;
use std::{
    collections::BTreeMap,
    fs::{read, read_dir, read_to_string, write},
    path::{Path, PathBuf},
};

struct StoreFixture {
    store: ProfileStore,
}

impl StoreFixture {
    fn new() -> Result<Self> {
        mkdirp::mkdirp("profiles")?;
        Ok(Self {
            store: ProfileStore::open("profiles")?,
        })
    }

    fn with_profile(self, name: &str, envrc: &str) -> Result<Self> {
        let root = Path::new("profiles").join(name);
        mkdirp::mkdirp(&root)?;
        write(root.join(".envrc"), envrc)?;
        write(root.join(".gitconfig"), "[user]\n    name = John Doe\n")?;
        Ok(self)
    }

    fn with_file(self, path: &str, content: &str) -> Result<Self> {
        write(Path::new("profiles").join(path), content)?;
        Ok(self)
    }
}

/// Every path under root, with file content for files.
fn snapshot(root: &Path) -> Result<BTreeMap<PathBuf, Option<Vec<u8>>>> {
    let mut tree = BTreeMap::new();
    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        for entry in read_dir(&dir)? {
            let path = entry?.path();
            if path.is_dir() {
                tree.insert(path.clone(), None);
                pending.push(path);
            } else {
                tree.insert(path.clone(), Some(read(&path)?));
            }
        }
    }

    Ok(tree)
}

const ENVRC_END_MARKER_ONLY: &str = "# Load .env file if it exists\n";

#[sealed_test]
fn update_fills_empty_activation_script_in_catalog_order() -> Result<()> {
    let fixture = StoreFixture::new()?.with_profile("work", ENVRC_END_MARKER_ONLY)?;
    let profile = fixture.store.get("work")?;
    let opts = UpdateOptions {
        no_backup: true,
        ..Default::default()
    };

    let report = profile.update(&opts, |_| false)?;
    assert!(report.is_ok());

    let envrc = read_to_string("profiles/work/.envrc")?;
    assert!(envrc.ends_with(ENVRC_END_MARKER_ONLY));
    let marker = envrc.find(ENVRC_END_MARKER_ONLY).unwrap_or_default();

    let mut last = 0;
    for section in envrc_catalog().sections() {
        let heading = envrc.find(section.heading());
        assert!(heading.is_some(), "missing {}", section.title());
        let heading = heading.unwrap_or_default();
        assert!(heading >= last && heading < marker, "misplaced {}", section.title());
        for entry in section.entries() {
            assert!(envrc[heading..marker].contains(entry.line()));
        }
        last = heading;
    }

    Ok(())
}

#[sealed_test]
fn update_never_duplicates_manually_defined_variable() -> Result<()> {
    let envrc = indoc! {r#"
        export WORKSPACE_HOME="$PWD"
        export KUBECONFIG="$WORKSPACE_HOME/clusters/kubeconfig"

        # Load .env file if it exists
        dotenv_if_exists .env
    "#};
    let fixture = StoreFixture::new()?.with_profile("work", envrc)?;
    let profile = fixture.store.get("work")?;
    let opts = UpdateOptions {
        no_backup: true,
        ..Default::default()
    };

    let report = profile.update(&opts, |_| false)?;

    let result = read_to_string("profiles/work/.envrc")?;
    assert_eq!(result.matches("KUBECONFIG").count(), 1);
    assert!(!result.contains("# Kubernetes configuration"));
    let envrc_sync = report
        .files
        .iter()
        .find(|sync| sync.file == ManagedFile::ActivationScript);
    assert!(envrc_sync.is_some_and(|sync| sync.changes.iter().all(|change| match change {
        Change::AddedSection { title, .. } | Change::UpdatedSection { title, .. } => {
            !title.contains("Kubernetes")
        }
    })));

    Ok(())
}

#[sealed_test]
fn update_creates_missing_ignore_list() -> Result<()> {
    let fixture = StoreFixture::new()?.with_profile("work", ENVRC_END_MARKER_ONLY)?;
    let profile = fixture.store.get("work")?;
    let opts = UpdateOptions {
        no_backup: true,
        ..Default::default()
    };

    let report = profile.update(&opts, |_| false)?;

    let sync = report
        .files
        .iter()
        .find(|sync| sync.file == ManagedFile::IgnoreList);
    assert!(sync.is_some_and(|sync| sync.created && sync.is_changed()));
    assert_eq!(read_to_string("profiles/work/.gitignore")?, DEFAULT_GITIGNORE);

    Ok(())
}

#[sealed_test]
fn update_cancelled_without_backup_mutates_nothing() -> Result<()> {
    let fixture = StoreFixture::new()?
        .with_profile("work", ENVRC_END_MARKER_ONLY)?
        .with_file("work/.backups", "stand-in for a read-only file system")?;
    let profile = fixture.store.get("work")?;
    let before = snapshot(Path::new("profiles"))?;

    let result = profile.update(&UpdateOptions::default(), |_| false);

    assert!(matches!(result, Err(ProfileError::Cancelled)));
    assert_eq!(snapshot(Path::new("profiles"))?, before);

    Ok(())
}

#[sealed_test]
fn update_dry_run_leaves_disk_untouched() -> Result<()> {
    let fixture = StoreFixture::new()?
        .with_profile("work", ENVRC_END_MARKER_ONLY)?
        .with_file("work/.gitignore", "# Terraform\n.terraform/\n")?;
    let profile = fixture.store.get("work")?;
    let before = snapshot(Path::new("profiles"))?;
    let opts = UpdateOptions {
        dry_run: true,
        ..Default::default()
    };

    let report = profile.update(&opts, |_| false)?;

    assert!(report.dry_run);
    assert!(report.backup.is_none());
    assert!(!report.is_up_to_date());
    assert!(!report.created_dirs.is_empty());
    assert_eq!(snapshot(Path::new("profiles"))?, before);

    Ok(())
}

#[sealed_test]
fn update_backs_up_then_reaches_fixed_point() -> Result<()> {
    let envrc = indoc! {r#"
        export WORKSPACE_HOME="$PWD"

        # Git configuration
        export GIT_CONFIG_GLOBAL="$WORKSPACE_HOME/.gitconfig"

        # Welcome message
        echo "work profile"
    "#};
    let fixture = StoreFixture::new()?.with_profile("work", envrc)?;
    let profile = fixture.store.get("work")?;

    let report = profile.update(&UpdateOptions::default(), |_| false)?;
    let backup = report.backup.clone().unwrap_or_default();
    assert_eq!(read_to_string(backup.join(".envrc"))?, envrc);
    assert!(backup.join(".gitconfig").is_file());
    assert!(Path::new("profiles/work/.ssh").is_dir());

    let updated = read_to_string("profiles/work/.envrc")?;
    assert!(updated.ends_with("# Welcome message\necho \"work profile\"\n"));

    let opts = UpdateOptions {
        no_backup: true,
        ..Default::default()
    };
    let report = profile.update(&opts, |_| false)?;
    assert!(report.is_up_to_date());
    assert_eq!(read_to_string("profiles/work/.envrc")?, updated);
    assert_eq!(report.to_string(), "profile \"work\" is already up to date\n");

    Ok(())
}
