// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Anchor location.
//!
//! Managed files usually end with a hand-authored region, e.g., loading the
//! secrets file or printing a welcome message. Generated sections must always
//! land _before_ that region. The __anchor__ is the byte offset that splits a
//! file into the region we may edit, and the region we must leave alone.

/// Locate insertion anchor of `text`.
///
/// Scans `markers` in priority order. The first marker that occurs anywhere
/// in `text` wins, and the start of the line holding its first occurrence is
/// returned. If no marker matches, then the length of `text` is returned,
/// i.e., append at end of file.
///
/// # Invariants
///
/// - Result always lies in `[0, text.len()]` on a char boundary.
/// - Result is snapped back to the start of the line holding the marker, so
///   a marker sitting mid-line never splits that line. Hence the offset
///   returned can be _earlier_ than the index where the marker itself
///   occurs, and is only equal to it when the marker opens its line.
pub fn locate_anchor(text: &str, markers: &[impl AsRef<str>]) -> usize {
    markers
        .iter()
        .map(AsRef::<str>::as_ref)
        .filter(|marker| !marker.is_empty())
        .find_map(|marker| text.find(marker))
        .map(|offset| line_start(text, offset))
        .unwrap_or(text.len())
}

/// Offset of the start of the line containing `offset`.
fn line_start(text: &str, offset: usize) -> usize {
    text[..offset].rfind('\n').map(|newline| newline + 1).unwrap_or(0)
}
