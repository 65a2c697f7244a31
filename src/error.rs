//! Error types for cheat export operations.

use std::path::PathBuf;

use thiserror::Error;

use crate::validate::Issue;

/// Primary error type for cheatx operations.
#[derive(Error, Debug)]
pub enum CxError {
    // Catalog errors
    #[error("Profile catalog not found: {path}")]
    CatalogNotFound { path: String },

    #[error("Invalid profile catalog: {0}")]
    Catalog(String),

    // Preference errors
    #[error("Invalid preferences: {0}")]
    Prefs(String),

    #[error("Unknown config format for '{path}': expected .json, .yaml, .yml, or .toml")]
    UnknownFormat { path: String },

    #[error("Could not determine home directory")]
    HomeDirUnavailable,

    // Profile errors
    #[error("Profile not found: {query}")]
    ProfileNotFound { query: String },

    #[error("Profile name '{name}' clashes with a built-in or existing custom profile")]
    NameConflict { name: String },

    #[error("Template '{template}' not found for profile '{profile}'")]
    TemplateNotFound { profile: String, template: String },

    #[error("Profile '{profile}' always exports to the main export root; overrides are not allowed")]
    OverridePinned { profile: String },

    // Validation errors
    #[error("Export blocked: {}", summarize(.issues))]
    Blocked { issues: Vec<Issue> },

    #[error("Export cancelled: {count} warning(s) were not confirmed")]
    AdvisoryDeclined { count: usize },

    // Document errors
    #[error("Cheat index {index} leaves no room for another entry")]
    IndexOverflow { index: String },

    // Filesystem errors
    #[error("Failed to write {}: {source} ({} file(s) already written)", .path.display(), .written.len())]
    Materialize {
        path: PathBuf,
        written: Vec<PathBuf>,
        source: std::io::Error,
    },

    #[error("File watch error: {0}")]
    Watch(String),

    // General errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(String),

    #[error("{0}")]
    Other(String),
}

fn summarize(issues: &[Issue]) -> String {
    issues
        .iter()
        .map(|issue| issue.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

impl CxError {
    /// Returns true if the error is recoverable by the user.
    pub const fn is_user_recoverable(&self) -> bool {
        matches!(
            self,
            Self::CatalogNotFound { .. }
                | Self::ProfileNotFound { .. }
                | Self::NameConflict { .. }
                | Self::TemplateNotFound { .. }
                | Self::OverridePinned { .. }
                | Self::Blocked { .. }
                | Self::AdvisoryDeclined { .. }
                | Self::UnknownFormat { .. }
        )
    }

    /// Returns a suggestion for how to fix the error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::CatalogNotFound { .. } => Some("Check --catalog or CHEATX_CATALOG"),
            Self::ProfileNotFound { .. } => Some("Run: cheatx profiles"),
            Self::NameConflict { .. } => Some("Pick a name that no other profile uses"),
            Self::TemplateNotFound { .. } => Some("Run: cheatx template list <PROFILE>"),
            Self::OverridePinned { .. } => Some("Use: cheatx config set-root <PATH>"),
            Self::Blocked { .. } => Some("Fill in the required fields and try again"),
            Self::AdvisoryDeclined { .. } => Some("Fix the warnings or pass --yes"),
            Self::UnknownFormat { .. } => Some("Use a .json, .yaml, or .toml file"),
            Self::IndexOverflow { .. } => Some("Renumber the existing cheats from 0"),
            _ => None,
        }
    }

    /// Short machine-readable name of the error kind.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::CatalogNotFound { .. } | Self::Catalog(_) => "config",
            Self::Prefs(_) | Self::UnknownFormat { .. } | Self::HomeDirUnavailable => "prefs",
            Self::ProfileNotFound { .. }
            | Self::NameConflict { .. }
            | Self::TemplateNotFound { .. }
            | Self::OverridePinned { .. } => "profile",
            Self::Blocked { .. } => "validation",
            Self::AdvisoryDeclined { .. } => "advisory",
            Self::Materialize { .. } | Self::Io(_) => "io",
            Self::IndexOverflow { .. } => "document",
            Self::Watch(_) => "watch",
            Self::Serialize(_) | Self::Other(_) => "other",
        }
    }
}

/// Convenience type alias for Results using CxError.
pub type Result<T> = std::result::Result<T, CxError>;

/// Extension trait for adding context to errors.
pub trait ResultExt<T> {
    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T, E: std::error::Error> ResultExt<T> for std::result::Result<T, E> {
    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| CxError::Other(format!("{}: {e}", f().into())))
    }
}
