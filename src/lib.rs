// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Workspace profile manager.
//!
//! A workspace profile is a directory whose activation script switches tool
//! configuration (git identity, cloud CLIs, SSH, secrets) whenever the user
//! enters it. This crate keeps existing profiles in line with a catalog of
//! required configuration without ever discarding what the user wrote by
//! hand.
//!
//! # See Also
//!
//! 1. [`profile`] for the update pipeline.
//! 2. [`store`] for the profile store layout.
//! 3. [direnv](https://direnv.net), the directory hook that sources profiles.

pub mod config;
pub mod path;
pub mod profile;
pub mod store;

pub use crate::{
    config::ToolConfig,
    profile::{Profile, ProfileError, UpdateOptions},
    store::{ProfileStore, StoreError},
};
