//! Cheat block encoders.
//!
//! Each encoder is a pure text transform: the same document snapshot and
//! input always produce the same output.
//!
//! - [`indexed`]: RetroArch style `cheatN_desc/code/enable` lists with a
//!   `cheats = N` header
//! - [`bracket`]: Atmosphère style `[Name]` blocks
//! - [`generic`]: a commented block for formats that need manual layout

pub mod bracket;
pub mod generic;
pub mod indexed;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

/// Which encoder a profile kind uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncoderKind {
    Indexed,
    Bracket,
    Generic,
}

/// One cheat as entered by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheatInput {
    pub description: String,
    pub codes: Vec<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

const fn default_enabled() -> bool {
    true
}

impl CheatInput {
    pub fn new(description: impl Into<String>, codes: &[&str], enabled: bool) -> Self {
        Self {
            description: description.into(),
            codes: codes.iter().map(|c| (*c).to_string()).collect(),
            enabled,
        }
    }

    /// Trimmed, non-blank code lines.
    pub fn code_lines(&self) -> impl Iterator<Item = &str> {
        self.codes.iter().map(|c| c.trim()).filter(|c| !c.is_empty())
    }

    /// Description on a single line.
    pub fn one_line_description(&self) -> String {
        self.description
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// An entry in an indexed cheat list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheatEntry {
    pub index: u64,
    pub description: String,
    pub codes: Vec<String>,
    pub enabled: bool,
}

/// A named bracket block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheatBlock {
    pub name: String,
    pub codes: Vec<String>,
}

/// Insert one cheat into `document` and return the new document.
///
/// The indexed encoder rewrites the whole document (header and all). The
/// other two append their block after a blank line.
pub fn insert_cheat(
    encoder: EncoderKind,
    extension: &str,
    document: &str,
    input: &CheatInput,
) -> Result<String> {
    debug!(?encoder, codes = input.codes.len(), "Inserting cheat");
    match encoder {
        EncoderKind::Indexed => indexed::insert(document, input),
        EncoderKind::Bracket => Ok(append_block(document, &bracket::render(&bracket::block(input)))),
        EncoderKind::Generic => Ok(append_block(document, &generic::render(extension, input))),
    }
}

/// `document` with trailing newlines trimmed, a blank line, then `block`.
pub fn append_block(document: &str, block: &str) -> String {
    let existing = document.trim_end_matches(['\n', '\r']);
    if existing.trim().is_empty() {
        block.to_string()
    } else {
        format!("{existing}\n\n{block}")
    }
}
