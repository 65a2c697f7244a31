//! Path-safety helpers shared by the planner and name derivation.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

static RESERVED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[\\/:*?"<>|]+"#).expect("valid reserved-char regex"));
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Replacement for characters that are unsafe in a path component.
pub const SANITIZE_CHAR: &str = "_";

/// Make one path component safe on Windows, macOS and Linux.
///
/// Runs of reserved characters become `_`, whitespace collapses to single
/// spaces, and leading/trailing spaces and dots are removed.
pub fn sanitize_fragment(raw: &str) -> String {
    let replaced = RESERVED.replace_all(raw.trim(), SANITIZE_CHAR);
    let collapsed = WHITESPACE.replace_all(&replaced, " ");
    collapsed.trim_matches(|c| c == ' ' || c == '.').to_string()
}

/// [`sanitize_fragment`], or `fallback` when nothing survives.
pub fn safe_filename(raw: &str, fallback: &str) -> String {
    let name = sanitize_fragment(raw);
    if name.is_empty() {
        fallback.to_string()
    } else {
        name
    }
}

/// Turn a `/`- or `\`-separated template result into a relative path.
///
/// Each segment is sanitized; empty, `.` and `..` segments are dropped so the
/// result can never climb out of the export root.
pub fn sanitize_subdir(raw: &str) -> PathBuf {
    raw.split(['/', '\\'])
        .map(sanitize_fragment)
        .filter(|seg| !seg.is_empty())
        .collect()
}

/// Uppercase hex digits only.
pub fn clean_hex(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_hexdigit)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// True when `raw` holds exactly `len` hex digits once cleaned.
pub fn is_hex_len(raw: &str, len: usize) -> bool {
    clean_hex(raw).len() == len
}

/// Replace any angle brackets left in a user-supplied root.
pub fn sanitize_root(root: &Path) -> PathBuf {
    let text = root.to_string_lossy();
    if text.contains(['<', '>']) {
        PathBuf::from(text.replace(['<', '>'], SANITIZE_CHAR))
    } else {
        root.to_path_buf()
    }
}
