// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Section matching.
//!
//! Decide which parts of a catalog section a managed file already has. The
//! merge engine only ever asks a [`SectionMatcher`], so the detection strategy
//! can change without touching merge logic.
//!
//! # Presence Is File-Global
//!
//! An entry counts as present if its key shows up _anywhere_ in the file, not
//! just below its own heading. Users move things around, and a variable that
//! was defined by hand elsewhere is still a satisfied variable.

use crate::profile::catalog::{CatalogSection, Entry};

use serde::{Deserialize, Serialize};

/// Result of matching one catalog section against file content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionMatch<'s> {
    /// Heading of section occurs in file.
    pub heading_present: bool,

    /// Entries whose key could not be found, in catalog order.
    pub missing: Vec<&'s Entry>,
}

impl SectionMatch<'_> {
    /// Section is fully configured.
    pub fn is_satisfied(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Detect presence of catalog sections in text.
pub trait SectionMatcher {
    /// Check if heading of section is present in text.
    fn heading_present(&self, text: &str, section: &CatalogSection) -> bool;

    /// Check if entry is present in text.
    fn entry_present(&self, text: &str, entry: &Entry) -> bool;

    /// Match whole section against text.
    fn inspect<'s>(&self, text: &str, section: &'s CatalogSection) -> SectionMatch<'s> {
        SectionMatch {
            heading_present: self.heading_present(text, section),
            missing: section
                .entries()
                .iter()
                .filter(|entry| !self.entry_present(text, entry))
                .collect(),
        }
    }
}

/// Raw substring detection.
///
/// Heading is present if it occurs verbatim. Entry is present if its key
/// occurs verbatim. Commented out lines still count. Crude, but that is what
/// people expect from a tool that edits hand-maintained text files.
#[derive(Debug, Default, Clone, Copy)]
pub struct SubstringMatcher;

impl SectionMatcher for SubstringMatcher {
    fn heading_present(&self, text: &str, section: &CatalogSection) -> bool {
        text.contains(section.heading())
    }

    fn entry_present(&self, text: &str, entry: &Entry) -> bool {
        text.contains(entry.key())
    }
}

/// Line-oriented detection.
///
/// Heading is present if its lines show up as consecutive lines, ignoring
/// surrounding whitespace. Entry is present if some uncommented line either
/// equals the entry, or assigns to a variable named by the entry key.
#[derive(Debug, Default, Clone, Copy)]
pub struct LineMatcher;

impl LineMatcher {
    fn assigned_name(line: &str) -> Option<&str> {
        let line = line.strip_prefix("export ").unwrap_or(line).trim_start();
        line.split_once('=').map(|(name, _)| name.trim())
    }
}

impl SectionMatcher for LineMatcher {
    fn heading_present(&self, text: &str, section: &CatalogSection) -> bool {
        let heading = section.heading().lines().map(str::trim).collect::<Vec<_>>();
        let lines = text.lines().map(str::trim).collect::<Vec<_>>();
        if heading.is_empty() {
            return true;
        }

        lines.windows(heading.len()).any(|window| window == heading.as_slice())
    }

    fn entry_present(&self, text: &str, entry: &Entry) -> bool {
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .any(|line| {
                line == entry.line()
                    || line == entry.key()
                    || Self::assigned_name(line) == Some(entry.key())
            })
    }
}

/// Selectable detection strategy.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Detection {
    /// Use [`SubstringMatcher`].
    #[default]
    Substring,

    /// Use [`LineMatcher`].
    Line,
}
