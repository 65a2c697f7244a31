//! Indexed `key = value` cheat lists (RetroArch `.cht`).
//!
//! ```text
//! cheats = 2
//!
//! cheat0_desc = "Infinite HP"
//! cheat0_code = "1234+5678"
//! cheat0_enable = true
//! ```

use std::sync::LazyLock;

use regex::Regex;

use super::{CheatEntry, CheatInput};
use crate::error::{CxError, Result};

/// Key of the header line holding the entry count.
pub const HEADER_KEY: &str = "cheats";

static DESC_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^cheat(\d+)_desc$").expect("valid cheat key regex"));

/// `(key, value)` pairs of every assignment line, comments skipped.
fn assignments(document: &str) -> impl Iterator<Item = (&str, &str)> {
    document.lines().filter_map(|line| {
        let line = line.trim();
        if line.starts_with('#') || line.starts_with(';') {
            return None;
        }
        line.split_once('=')
            .map(|(key, value)| (key.trim(), value.trim()))
    })
}

fn is_header(line: &str) -> bool {
    line.split_once('=')
        .is_some_and(|(key, _)| key.trim() == HEADER_KEY)
}

/// Highest `cheatN_desc` index in the document.
///
/// An index too large for `u64` is an overflow, not a key to skip.
pub fn scan_max_index(document: &str) -> Result<Option<u64>> {
    let mut max = None;
    for caps in assignments(document).filter_map(|(key, _)| DESC_KEY.captures(key)) {
        let digits = &caps[1];
        let index = digits.parse::<u64>().map_err(|_| CxError::IndexOverflow {
            index: digits.to_string(),
        })?;
        max = max.max(Some(index));
    }
    Ok(max)
}

/// Index the next entry gets: one past the highest, or 0.
///
/// The header count is one past the new index, so that must fit too.
pub fn next_index(document: &str) -> Result<u64> {
    let Some(max) = scan_max_index(document)? else {
        return Ok(0);
    };
    match max.checked_add(1) {
        Some(next) if next < u64::MAX => Ok(next),
        _ => Err(CxError::IndexOverflow {
            index: max.to_string(),
        }),
    }
}

pub fn entry(index: u64, input: &CheatInput) -> CheatEntry {
    CheatEntry {
        index,
        description: input.one_line_description().replace('"', "'"),
        codes: input.code_lines().map(str::to_string).collect(),
        enabled: input.enabled,
    }
}

/// The three lines of one entry, newline terminated.
pub fn render_entry(entry: &CheatEntry) -> String {
    let n = entry.index;
    format!(
        "cheat{n}_desc = \"{}\"\ncheat{n}_code = \"{}\"\ncheat{n}_enable = {}\n",
        entry.description,
        entry.codes.join("+"),
        entry.enabled
    )
}

/// Set the header to `count`.
///
/// The first header line is rewritten in place and any further header lines
/// are dropped; without one, a header and blank line are prepended.
pub fn with_header(document: &str, count: u64) -> String {
    let header = format!("{HEADER_KEY} = {count}");
    if !document.lines().any(|line| !is_comment(line) && is_header(line)) {
        return format!("{header}\n\n{document}");
    }
    let mut seen = false;
    let mut lines: Vec<&str> = Vec::new();
    for line in document.lines() {
        if !is_comment(line) && is_header(line) {
            if !seen {
                seen = true;
                lines.push(&header);
            }
            continue;
        }
        lines.push(line);
    }
    lines.join("\n")
}

fn is_comment(line: &str) -> bool {
    let line = line.trim_start();
    line.starts_with('#') || line.starts_with(';')
}

/// Append `input` as the next entry and update the header.
pub fn insert(document: &str, input: &CheatInput) -> Result<String> {
    let index = next_index(document)?;
    let snippet = render_entry(&entry(index, input));
    let body = with_header(document, index + 1);
    Ok(format!("{}\n\n{snippet}", body.trim_end()))
}
