//! Structured file formats for catalogs, preferences, and field files.
//!
//! The format is picked from the file extension so users can keep their
//! catalog in whichever of JSON, YAML, or TOML they prefer.

use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::trace;

use crate::error::{CxError, Result};

/// Configuration file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// JSON format (.json).
    Json,
    /// YAML format (.yaml, .yml).
    Yaml,
    /// TOML format (.toml).
    Toml,
}

impl ConfigFormat {
    /// Detect format from file extension.
    ///
    /// Returns `None` if the extension is not recognized.
    #[must_use]
    pub fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        trace!(extension = %ext, "Detecting config format from extension");
        match ext.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }

    /// Detect the format or fail with [`CxError::UnknownFormat`].
    pub fn for_path(path: &Path) -> Result<Self> {
        Self::from_extension(path).ok_or_else(|| CxError::UnknownFormat {
            path: path.display().to_string(),
        })
    }

    /// Get the canonical file extension for this format.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Toml => "toml",
        }
    }

    /// Parse `content` into `T`.
    ///
    /// The error is returned as a message so callers can wrap it in the
    /// variant that fits (catalog vs. preferences).
    pub fn parse<T: DeserializeOwned>(self, content: &str) -> std::result::Result<T, String> {
        match self {
            Self::Json => serde_json::from_str(content).map_err(|e| format!("JSON: {e}")),
            Self::Yaml => serde_yaml::from_str(content).map_err(|e| format!("YAML: {e}")),
            Self::Toml => toml::from_str(content).map_err(|e| format!("TOML: {e}")),
        }
    }

    /// Serialize `value` in this format.
    pub fn render<T: Serialize>(self, value: &T) -> Result<String> {
        match self {
            Self::Json => serde_json::to_string_pretty(value)
                .map(|mut s| {
                    s.push('\n');
                    s
                })
                .map_err(|e| CxError::Serialize(format!("JSON: {e}"))),
            Self::Yaml => {
                serde_yaml::to_string(value).map_err(|e| CxError::Serialize(format!("YAML: {e}")))
            }
            Self::Toml => toml::to_string_pretty(value)
                .map_err(|e| CxError::Serialize(format!("TOML: {e}"))),
        }
    }
}
