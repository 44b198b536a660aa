// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

use wsprofile::{
    config::ToolConfig,
    path::{default_config_file, default_profile_store_dir},
    profile::UpdateOptions as UpdatePlan,
    store::ProfileStore,
};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use inquire::{Confirm, Select};
use std::{fs::read_to_string, io::ErrorKind, path::PathBuf, process::exit};
use tracing::{debug, error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Clone, Parser)]
#[command(
    about,
    override_usage = "wsprofile [options] <command>",
    subcommand_help_heading = "Commands",
    version
)]
struct Cli {
    /// Path to profile store.
    #[arg(short, long, global = true, value_name = "path")]
    pub profiles_dir: Option<PathBuf>,

    /// Show debug output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    fn run(self) -> Result<()> {
        let config = load_config()?;
        let store_path = match self.profiles_dir {
            Some(path) => path,
            None => match &config.settings.profiles_dir {
                Some(path) => path.as_path().to_path_buf(),
                None => default_profile_store_dir()?,
            },
        };

        match self.command {
            Command::Update(opts) => run_update(opts, store_path, &config),
            Command::List(opts) => run_list(opts, store_path),
        }
    }
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Bring existing profile up to date with current configuration catalog.
    #[command(override_usage = "wsprofile update [options] [<profile_name>]")]
    Update(UpdateOptions),

    /// List profiles in profile store.
    #[command(override_usage = "wsprofile list [options]")]
    List(ListOptions),
}

#[derive(Parser, Clone, Debug)]
#[command(author, about, long_about)]
struct UpdateOptions {
    /// Name of profile to update, prompts for one if omitted.
    #[arg(value_name = "profile_name")]
    pub profile_name: Option<String>,

    /// Continue without asking if backup fails.
    #[arg(short, long)]
    pub force: bool,

    /// Show what would change without writing anything.
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Skip backup of profile files.
    #[arg(long)]
    pub no_backup: bool,
}

#[derive(Parser, Clone, Debug)]
#[command(author, about, long_about)]
struct ListOptions {
    /// Show full path of each profile.
    #[arg(short, long)]
    pub long: bool,
}

fn main() {
    let cli = Cli::parse();

    let layer = fmt::layer()
        .compact()
        .with_target(false)
        .with_timer(false)
        .without_time();
    let fallback = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap();
    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .init();

    if let Err(error) = cli.run() {
        error!("{error:?}");
        exit(1);
    }

    exit(0)
}

fn load_config() -> Result<ToolConfig> {
    load_config_from(default_config_file().ok())
}

/// Load tool configuration, treating an unknown or missing file as defaults.
fn load_config_from(path: Option<PathBuf>) -> Result<ToolConfig> {
    let Some(path) = path else {
        debug!("cannot resolve configuration path, using defaults");
        return Ok(ToolConfig::default());
    };

    match read_to_string(&path) {
        Ok(data) => data
            .parse()
            .with_context(|| format!("failed to parse configuration {:?}", path.display())),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(ToolConfig::default()),
        Err(err) => {
            Err(err).with_context(|| format!("failed to read configuration {:?}", path.display()))
        }
    }
}

fn run_update(opts: UpdateOptions, store_path: PathBuf, config: &ToolConfig) -> Result<()> {
    let store = ProfileStore::open(store_path)?;
    let profile_name = match opts.profile_name {
        Some(name) => name,
        None => {
            let profiles = store.profiles()?;
            if profiles.is_empty() {
                bail!("no profiles found in {:?}", store.path().display());
            }
            Select::new("Select profile to update:", profiles).prompt()?
        }
    };

    let profile = store.get(&profile_name)?;
    let plan = UpdatePlan {
        force: opts.force,
        dry_run: opts.dry_run,
        no_backup: opts.no_backup || !config.settings.backup,
        detection: config.settings.detection,
    };

    let report = profile.update(&plan, |err| {
        let reason = err.to_string();
        Confirm::new("Continue without backup?")
            .with_default(false)
            .with_help_message(&reason)
            .prompt()
            .unwrap_or(false)
    })?;
    print!("{report}");

    if !report.is_ok() {
        bail!(
            "failed to update {} file(s) of profile {:?}",
            report.failures.len(),
            profile.name()
        );
    }

    Ok(())
}

fn run_list(opts: ListOptions, store_path: PathBuf) -> Result<()> {
    let store = ProfileStore::open(store_path)?;
    let profiles = store.profiles()?;
    if profiles.is_empty() {
        info!("no profiles found in {:?}", store.path().display());
        return Ok(());
    }

    for name in profiles {
        if opts.long {
            println!("{name}\t{}", store.path().join(&name).display());
        } else {
            println!("{name}");
        }
    }

    Ok(())
}
