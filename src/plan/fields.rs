//! Caller-supplied field values for one export.

use serde::{Deserialize, Serialize};

use super::sanitize::sanitize_fragment;

/// Longest derived cheat name, in characters.
pub const MAX_CHEAT_NAME_CHARS: usize = 64;

/// Raw field values as typed by the user. Every field is optional; blank
/// strings count as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportFields {
    pub title_id: Option<String>,
    /// One or more build ids separated by newlines, commas, or spaces.
    pub build_ids: Option<String>,
    pub core_name: Option<String>,
    /// Game id, CRC, serial, or file name depending on the profile.
    pub identifier: Option<String>,
    /// Usually derived from the document; see [`derive_cheat_name`].
    pub cheat_name: Option<String>,
    /// Export root for this call only.
    pub root_override: Option<String>,
    /// Output extension override.
    pub extension: Option<String>,
}

fn text(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

impl ExportFields {
    pub fn title_id(&self) -> Option<&str> {
        text(self.title_id.as_ref())
    }

    pub fn core_name(&self) -> Option<&str> {
        text(self.core_name.as_ref())
    }

    pub fn identifier(&self) -> Option<&str> {
        text(self.identifier.as_ref())
    }

    pub fn cheat_name(&self) -> Option<&str> {
        text(self.cheat_name.as_ref())
    }

    pub fn root_override(&self) -> Option<&str> {
        text(self.root_override.as_ref())
    }

    pub fn extension(&self) -> Option<&str> {
        text(self.extension.as_ref())
    }

    /// Build ids split on newlines, commas and spaces, blanks dropped.
    pub fn build_id_list(&self) -> Vec<&str> {
        text(self.build_ids.as_ref())
            .map(|raw| {
                raw.split(|c: char| c == ',' || c.is_whitespace())
                    .filter(|part| !part.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Fill the cheat name from `document` unless one was given.
    #[must_use]
    pub fn with_document(mut self, document: &str) -> Self {
        if self.cheat_name().is_none() {
            self.cheat_name = Some(derive_cheat_name(document));
        }
        self
    }
}

/// Label used for `<Cheat Name>` folders and fallback file names.
///
/// Takes the first non-blank line of the document; a leading `#` heading
/// marker is stripped unless that leaves nothing. Empty documents yield
/// `Cheats`.
pub fn derive_cheat_name(document: &str) -> String {
    let label = document
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(|line| {
            let stripped = line.trim_start_matches('#').trim();
            if stripped.is_empty() { line } else { stripped }
        })
        .unwrap_or("Cheats");
    let clean = sanitize_fragment(label);
    let clean = if clean.is_empty() {
        "Cheats".to_string()
    } else {
        clean
    };
    clean.chars().take(MAX_CHEAT_NAME_CHARS).collect::<String>().trim_end().to_string()
}
