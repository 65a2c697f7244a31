//! Profile catalog data model.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::encode::EncoderKind;

/// Structural category of a profile; selects planner and encoder behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileKind {
    /// Title id / build id addressed targets (one file per build id).
    Switch,
    /// RetroArch style `cheats/<core>/<game>.cht`.
    Retroarch,
    #[default]
    Generic,
    /// A single fixed file name such as `patch.yml`.
    Singlefile,
    /// Homebrew/CFW consoles with user-chosen layouts.
    Modded,
}

impl ProfileKind {
    pub const ALL: [Self; 5] = [
        Self::Switch,
        Self::Retroarch,
        Self::Generic,
        Self::Singlefile,
        Self::Modded,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Switch => "switch",
            Self::Retroarch => "retroarch",
            Self::Generic => "generic",
            Self::Singlefile => "singlefile",
            Self::Modded => "modded",
        }
    }

    /// Encoder used for this kind when inserting cheats.
    pub const fn encoder(self) -> EncoderKind {
        match self {
            Self::Switch => EncoderKind::Bracket,
            Self::Retroarch => EncoderKind::Indexed,
            Self::Generic | Self::Singlefile | Self::Modded => EncoderKind::Generic,
        }
    }
}

impl fmt::Display for ProfileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProfileKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == wanted)
            .ok_or_else(|| {
                format!("unknown profile kind '{s}': expected switch, retroarch, generic, singlefile, or modded")
            })
    }
}

/// Lower-case an extension and make sure it starts with a dot.
pub fn normalize_extension(raw: &str) -> String {
    let ext = raw.trim().to_lowercase();
    if ext.is_empty() || ext.starts_with('.') {
        ext
    } else {
        format!(".{ext}")
    }
}

/// An accepted file extension with its file-dialog label and glob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ExtensionSpec")]
pub struct Extension {
    pub extension: String,
    pub label: String,
    pub pattern: String,
}

impl Extension {
    pub fn new(raw: &str) -> Self {
        Self::from(ExtensionSpec::Bare(raw.to_string()))
    }
}

/// Catalog spelling of an extension: `".txt"` or `{extension, label, pattern}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum ExtensionSpec {
    Bare(String),
    Full {
        extension: String,
        #[serde(default)]
        label: Option<String>,
        #[serde(default)]
        pattern: Option<String>,
    },
}

impl From<ExtensionSpec> for Extension {
    fn from(spec: ExtensionSpec) -> Self {
        let (raw, label, pattern) = match spec {
            ExtensionSpec::Bare(raw) => (raw, None, None),
            ExtensionSpec::Full {
                extension,
                label,
                pattern,
            } => (extension, label, pattern),
        };
        let extension = normalize_extension(&raw);
        let label = label
            .filter(|l| !l.trim().is_empty())
            .unwrap_or_else(|| format!("{} file", extension.trim_start_matches('.').to_uppercase()));
        let pattern = pattern
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| format!("*{extension}"));
        Self {
            extension,
            label,
            pattern,
        }
    }
}

/// A starter document offered for a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub content: String,
}

impl Template {
    /// Display name, falling back to the id.
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}

/// Expected shape of the free-text identifier (game id, CRC, serial).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifierFormat {
    /// Regular expression the normalized identifier should match.
    pub pattern: String,
    /// Example value shown in warnings.
    pub example: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Where a profile came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileOrigin {
    #[default]
    Builtin,
    Catalog,
    Custom,
}

/// Per-emulator export rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub kind: ProfileKind,
    pub extensions: Vec<Extension>,
    pub default_extension: String,
    /// Directory template relative to the export root.
    #[serde(default)]
    pub subdir: String,
    /// File name template without extension.
    #[serde(default)]
    pub filename_hint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub templates: Vec<Template>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_template_id: Option<String>,
    /// Always export to the primary export root, ignoring overrides.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub pin_export_root: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier_format: Option<IdentifierFormat>,
    #[serde(skip_deserializing)]
    pub origin: ProfileOrigin,
}

impl Profile {
    /// Bare profile with one extension; used for user profiles and tests.
    pub fn minimal(id: &str, name: &str, extension: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            kind: ProfileKind::Generic,
            extensions: vec![Extension::new(extension)],
            default_extension: normalize_extension(extension),
            subdir: String::new(),
            filename_hint: String::new(),
            fixed_filename: None,
            notes: None,
            templates: Vec::new(),
            default_template_id: None,
            pin_export_root: false,
            identifier_format: None,
            origin: ProfileOrigin::Builtin,
        }
    }

    /// Resolved output extension: the default extension, else the first
    /// declared one, else `.txt`.
    pub fn output_extension(&self) -> String {
        let ext = normalize_extension(&self.default_extension);
        if !ext.is_empty() {
            return ext;
        }
        self.extensions
            .iter()
            .map(|e| e.extension.clone())
            .find(|e| !e.is_empty())
            .unwrap_or_else(|| ".txt".to_string())
    }

    /// Longest declared extension that `file_name` ends with.
    pub fn matching_extension(&self, file_name: &str) -> Option<&str> {
        let lower = file_name.to_lowercase();
        self.extensions
            .iter()
            .map(|e| e.extension.as_str())
            .filter(|ext| !ext.is_empty() && lower.ends_with(ext))
            .max_by_key(|ext| ext.len())
    }

    pub fn template(&self, id: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.id == id)
    }

    pub fn is_custom(&self) -> bool {
        self.origin == ProfileOrigin::Custom
    }
}
