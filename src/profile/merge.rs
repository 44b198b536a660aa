// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Idempotent catalog merging.
//!
//! The merge engine brings the text of a managed file up to date with a
//! [`Catalog`]. It only ever _adds_ missing pieces. Existing lines are never
//! removed, rewritten, or reordered.
//!
//! # Algorithm
//!
//! The file is split at its anchor (see [`locate_anchor`]) into an editable
//! region before the anchor, and a preserved region from the anchor onward.
//! Then each catalog section is processed in catalog order:
//!
//! 1. Section has no missing entries: nothing to do.
//! 2. Heading is absent: append a block of heading, missing entries, and a
//!    blank separator line to the end of the editable region.
//! 3. Heading is present: splice the missing entries in after the last
//!    non-blank line of the section. A section extends from its heading up to
//!    the next _known catalog heading_, or the end of the editable region.
//!    Arbitrary comment lines inside a section do not end it.
//!
//! Running the engine on its own output with the same catalog is a no-op,
//! because every inserted line carries the key that marks it as present.

use crate::profile::{
    anchor::locate_anchor,
    catalog::{Catalog, CatalogSection},
    matcher::{SectionMatcher, SubstringMatcher},
};

use std::fmt::{Display, Formatter, Result as FmtResult};
use tracing::{debug, instrument};

/// Merge catalogs into file content.
#[derive(Debug, Default, Clone)]
pub struct MergeEngine<M = SubstringMatcher>
where
    M: SectionMatcher,
{
    matcher: M,
}

impl<M> MergeEngine<M>
where
    M: SectionMatcher,
{
    /// Construct new merge engine with target section matcher.
    pub fn new(matcher: M) -> Self {
        Self { matcher }
    }

    /// Merge catalog into text, splitting at the anchor of the catalog.
    pub fn merge(&self, text: &str, catalog: &Catalog) -> MergeOutcome {
        let split = locate_anchor(text, catalog.anchors());
        self.merge_at(text, catalog, split)
    }

    /// Merge catalog into text, splitting at a known anchor offset.
    ///
    /// Everything from `split` onward is copied over untouched.
    ///
    /// # Panics
    ///
    /// - Will panic if `split` is not a char boundary of `text`.
    #[instrument(skip(self, text, catalog), level = "debug")]
    pub fn merge_at(&self, text: &str, catalog: &Catalog, split: usize) -> MergeOutcome {
        let (head, tail) = text.split_at(split.min(text.len()));
        let mut before = head.to_string();
        let mut changes = Vec::new();

        for section in catalog.sections() {
            // INVARIANT: Presence is always judged against the whole current text.
            let current = [before.as_str(), tail].concat();
            let found = self.matcher.inspect(&current, section);
            if found.is_satisfied() {
                debug!("section {:?} already satisfied", section.title());
                continue;
            }

            let lines = found.missing.iter().map(|entry| entry.line()).collect::<Vec<_>>();
            let change = if !found.heading_present {
                append_block(&mut before, section, &lines);
                Change::AddedSection {
                    title: section.title().to_string(),
                    entries: lines.len(),
                }
            } else {
                let at = match find_heading(&before, section.heading(), 0) {
                    Some(offset) => section_end(&before, offset, section, catalog),
                    // INVARIANT: Heading lives in preserved region, or mid-line.
                    //   - Keep entries in editable region without new heading.
                    None => before.len(),
                };
                insert_lines(&mut before, at, &lines);
                Change::UpdatedSection {
                    title: section.title().to_string(),
                    entries: lines.len(),
                }
            };

            debug!("{change}");
            changes.push(change);
        }

        before.push_str(tail);
        MergeOutcome {
            changed: !changes.is_empty(),
            text: before,
            changes,
        }
    }
}

/// Result of merging a catalog into text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Updated text.
    pub text: String,

    /// At least one section was added or updated.
    pub changed: bool,

    /// Applied changes in catalog order.
    pub changes: Vec<Change>,
}

/// Single applied section change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// Whole section was missing and got appended.
    AddedSection { title: String, entries: usize },

    /// Section heading existed and missing entries were spliced in.
    UpdatedSection { title: String, entries: usize },
}

impl Display for Change {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::AddedSection { title, entries } => {
                write!(fmt, "added section `{title}` ({})", plural(*entries, "entry"))
            }
            Self::UpdatedSection { title, entries } => {
                write!(fmt, "updated section `{title}` ({})", plural(*entries, "entry"))
            }
        }
    }
}

fn plural(count: usize, noun: &str) -> String {
    match (count, noun.strip_suffix('y')) {
        (1, _) => format!("1 {noun}"),
        (_, Some(stem)) => format!("{count} {stem}ies"),
        (_, None) => format!("{count} {noun}s"),
    }
}

/// Find heading at the start of a line, searching from `from` onward.
fn find_heading(text: &str, heading: &str, from: usize) -> Option<usize> {
    if heading.is_empty() || from > text.len() {
        return None;
    }

    text[from..]
        .match_indices(heading)
        .map(|(offset, _)| offset + from)
        .find(|&offset| offset == 0 || text.as_bytes()[offset - 1] == b'\n')
}

/// Offset right after the last non-blank line of a section.
fn section_end(text: &str, heading_at: usize, section: &CatalogSection, catalog: &Catalog) -> usize {
    let after_heading = heading_at + section.heading().len();
    let start = text[after_heading..]
        .find('\n')
        .map(|newline| after_heading + newline + 1)
        .unwrap_or(text.len());

    let boundary = catalog
        .headings()
        .filter_map(|heading| find_heading(text, heading, start))
        .min()
        .unwrap_or(text.len());

    let mut end = 0;
    let mut offset = 0;
    for line in text[start..boundary].split_inclusive('\n') {
        offset += line.len();
        if !line.trim().is_empty() {
            end = offset;
        }
    }

    start + end
}

fn append_block(text: &mut String, section: &CatalogSection, lines: &[&str]) {
    if !text.is_empty() && !text.ends_with('\n') {
        text.push('\n');
    }

    text.push_str(section.heading());
    text.push('\n');
    for line in lines {
        text.push_str(line);
        text.push('\n');
    }
    text.push('\n');
}

fn insert_lines(text: &mut String, at: usize, lines: &[&str]) {
    let mut block = String::new();
    if at > 0 && text.as_bytes()[at - 1] != b'\n' {
        block.push('\n');
    }

    for line in lines {
        block.push_str(line);
        block.push('\n');
    }
    text.insert_str(at, &block);
}
