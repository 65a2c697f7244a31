//! Output mode abstraction for robot and human output.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::cli::Cli;
use crate::config::Preferences;
use crate::detect::Inference;
use crate::error::CxError;
use crate::export::ExportReport;
use crate::plan::ExportPlan;
use crate::profile::{Profile, Template};
use crate::theme::CxTheme;
use crate::validate::Issue;

pub mod human;
pub mod robot;

pub use human::HumanOutput;
pub use robot::RobotOutput;

/// A resolved plan together with its validation issues and preview line.
#[derive(Debug, Clone, Serialize)]
pub struct PlanView<'a> {
    pub plan: &'a ExportPlan,
    pub issues: &'a [Issue],
    pub preview: &'a str,
}

impl PlanView<'_> {
    /// True when an export with these fields would be refused outright.
    pub fn is_blocked(&self) -> bool {
        self.issues.iter().any(Issue::is_blocking)
    }
}

/// A profile's starter templates and which one is the default.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateListing<'a> {
    pub profile_id: &'a str,
    pub default: Option<&'a str>,
    pub templates: &'a [Template],
}

/// A document produced by `add-cheat` or `template apply`.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentResult<'a> {
    /// File the document was written back to, if any.
    pub written_to: Option<&'a Path>,
    pub content: &'a str,
}

/// Preferences together with the file they were read from.
#[derive(Debug, Clone, Serialize)]
pub struct PrefsView<'a> {
    pub path: &'a Path,
    pub exists: bool,
    #[serde(flatten)]
    pub prefs: &'a Preferences,
}

/// JSON formatting options for robot mode.
#[derive(Debug, Clone, Copy)]
pub enum RobotFormat {
    /// Pretty-printed JSON (default for --robot).
    Json,
    /// Single-line JSON (--format=json-compact).
    JsonCompact,
}

/// Determines how command output is rendered.
#[derive(Debug)]
pub enum OutputMode {
    /// JSON output for AI agents and scripting.
    Robot(RobotFormat),
    /// Styled terminal output for human users.
    Human(CxTheme),
}

impl OutputMode {
    /// Create OutputMode from CLI arguments.
    #[must_use]
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.use_json() {
            let format = if cli.use_compact_json() {
                RobotFormat::JsonCompact
            } else {
                RobotFormat::Json
            };
            Self::Robot(format)
        } else if cli.no_color {
            console::set_colors_enabled(false);
            console::set_colors_enabled_stderr(false);
            Self::Human(CxTheme::plain())
        } else {
            Self::Human(CxTheme::default())
        }
    }

    /// Returns true if output should be JSON.
    #[must_use]
    pub const fn is_robot(&self) -> bool {
        matches!(self, Self::Robot(_))
    }

    /// Convert into the appropriate Output implementation.
    #[must_use]
    pub fn into_output(self, quiet: bool) -> Box<dyn Output> {
        match self {
            Self::Robot(format) => Box::new(RobotOutput::new(format)),
            Self::Human(theme) => Box::new(HumanOutput::new(theme, quiet)),
        }
    }
}

/// Trait for all output operations.
///
/// Commands call these methods without knowing the output mode.
pub trait Output {
    // Basic messages
    fn success(&self, message: &str);
    fn error(&self, error: &CxError);
    fn warning(&self, message: &str);
    fn info(&self, message: &str);

    // Profiles
    fn profile_list(&self, profiles: &[&Profile]);
    fn profile_detail(&self, profile: &Profile, override_root: Option<&Path>);
    fn templates(&self, listing: &TemplateListing<'_>);
    fn template(&self, profile: &Profile, template: &Template);

    // Planning and export
    fn plan_result(&self, view: &PlanView<'_>);
    fn export_report(&self, report: &ExportReport);
    fn inference(&self, path: &Path, inference: &Inference);
    fn document(&self, result: &DocumentResult<'_>);
    fn preview(&self, generation: u64, text: &str);

    // Preferences
    fn preferences(&self, view: &PrefsView<'_>);
    fn prefs_path(&self, path: &Path);
    /// A preference change was saved.
    fn prefs_updated(&self, message: &str, path: &Path);

    // Metadata
    fn version_info(&self, version: &str, git_sha: Option<&str>, build_time: Option<&str>);
}

/// Display helper for a list of written files.
pub(crate) fn display_paths(paths: &[PathBuf]) -> Vec<String> {
    paths.iter().map(|p| p.display().to_string()).collect()
}
