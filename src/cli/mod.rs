//! CLI argument definitions and command dispatch.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::ProfileSort;
use crate::plan::ExportFields;
use crate::profile::{ApplyMode, ProfileKind};

/// cheatx - Export cheat documents to the folder layout each emulator expects.
///
/// Robot Mode: Use --robot or --format=json for machine-parseable output optimized for AI agents.
#[derive(Parser, Debug)]
#[command(name = "cheatx", version, about, long_about = None)]
#[command(propagate_version = true)]
#[allow(clippy::struct_excessive_bools)] // CLI flags naturally use multiple bools
pub struct Cli {
    /// Output format (human for people, json for agents/scripts)
    #[arg(
        long,
        short = 'f',
        default_value = "human",
        global = true,
        env = "CHEATX_FORMAT"
    )]
    pub format: OutputFormat,

    /// Robot mode: equivalent to --format=json (optimized for AI agents)
    #[arg(long, global = true)]
    pub robot: bool,

    /// Verbose logging (-v debug, -vv trace)
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(
        long,
        global = true,
        env = "NO_COLOR",
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    pub no_color: bool,

    /// Extra profile catalog merged over the built-in profiles
    #[arg(long, global = true, env = "CHEATX_CATALOG", value_name = "FILE")]
    pub catalog: Option<PathBuf>,

    /// Preferences file (default: ~/CheatCreator/prefs.json)
    #[arg(long, global = true, env = "CHEATX_PREFS", value_name = "FILE")]
    pub prefs: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Output format selection.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text with optional color
    #[default]
    #[value(alias = "text")]
    Human,
    /// JSON output for scripts and agents
    Json,
    /// Compact JSON (single line)
    JsonCompact,
}

impl Cli {
    /// Returns true if output should be JSON (robot mode or explicit --format=json).
    pub const fn use_json(&self) -> bool {
        self.robot || matches!(self.format, OutputFormat::Json | OutputFormat::JsonCompact)
    }

    /// Returns true if output should be compact JSON.
    pub const fn use_compact_json(&self) -> bool {
        matches!(self.format, OutputFormat::JsonCompact)
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    // === Profiles ===
    /// List export profiles
    #[command(visible_alias = "ls")]
    Profiles(ProfilesArgs),

    /// Show one profile (by id or name)
    Show(ShowArgs),

    // === Export ===
    /// Guess the profile and fields from an existing cheat file
    Detect(DetectArgs),

    /// Resolve the output paths without writing anything
    Plan(PlanArgs),

    /// Validate and write the document to every planned path
    Export(ExportArgs),

    /// Insert a cheat into a document in the profile's format
    AddCheat(AddCheatArgs),

    /// List, show, or apply starter templates
    #[command(subcommand)]
    Template(TemplateCommand),

    /// Re-render the export preview whenever a fields file changes
    Watch(WatchArgs),

    // === Configuration ===
    /// Show or change preferences
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Add or remove user-defined profiles
    #[command(subcommand)]
    CustomProfile(CustomProfileCommand),

    // === Utilities ===
    /// Show version and build information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// === Argument Structs ===

/// Field values shared by planning and export commands.
#[derive(Args, Debug, Clone, Default)]
pub struct FieldArgs {
    /// Title id (Switch profiles)
    #[arg(long, visible_alias = "tid")]
    pub title_id: Option<String>,

    /// Build ids, separated by commas or spaces
    #[arg(long, visible_alias = "bid")]
    pub build_ids: Option<String>,

    /// RetroArch core folder
    #[arg(long)]
    pub core: Option<String>,

    /// Game id, CRC, serial, or name used in the file name
    #[arg(long, short = 'i')]
    pub identifier: Option<String>,

    /// Export root for this run only
    #[arg(long, value_name = "DIR")]
    pub root: Option<String>,

    /// Output extension (e.g. .ini)
    #[arg(long)]
    pub ext: Option<String>,
}

impl FieldArgs {
    /// Command-line values as export fields.
    pub fn to_fields(&self) -> ExportFields {
        ExportFields {
            title_id: self.title_id.clone(),
            build_ids: self.build_ids.clone(),
            core_name: self.core.clone(),
            identifier: self.identifier.clone(),
            cheat_name: None,
            root_override: self.root.clone(),
            extension: self.ext.clone(),
        }
    }
}

#[derive(Parser, Debug)]
pub struct ProfilesArgs {
    /// Sort order (default: the saved preference)
    #[arg(long)]
    pub sort: Option<SortArg>,
}

/// Profile list ordering.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortArg {
    /// Built-ins first, then user profiles
    Default,
    /// Alphabetical by name
    #[value(alias = "a-z")]
    Az,
}

impl From<SortArg> for ProfileSort {
    fn from(value: SortArg) -> Self {
        match value {
            SortArg::Default => Self::Default,
            SortArg::Az => Self::Az,
        }
    }
}

#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Profile id or name
    pub profile: String,
}

#[derive(Parser, Debug)]
pub struct DetectArgs {
    /// Existing cheat file
    pub file: PathBuf,
}

#[derive(Parser, Debug)]
pub struct PlanArgs {
    /// Profile id or name
    pub profile: String,

    #[command(flatten)]
    pub fields: FieldArgs,

    /// Document used to derive the cheat name
    #[arg(long, short = 'd', value_name = "FILE")]
    pub document: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct ExportArgs {
    /// Profile id or name
    pub profile: String,

    #[command(flatten)]
    pub fields: FieldArgs,

    /// Document to export
    #[arg(long, short = 'd', value_name = "FILE")]
    pub document: PathBuf,

    /// Continue past warnings without asking
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(Parser, Debug)]
pub struct AddCheatArgs {
    /// Profile id or name (selects the cheat format)
    pub profile: String,

    /// Document to insert into (missing file = empty document)
    #[arg(long, short = 'd', value_name = "FILE")]
    pub document: PathBuf,

    /// Cheat description
    #[arg(long)]
    pub desc: String,

    /// Code line (repeat for several lines)
    #[arg(long = "code", short = 'c', required = true)]
    pub codes: Vec<String>,

    /// Insert the cheat disabled
    #[arg(long)]
    pub disabled: bool,

    /// Write the result back to the document instead of printing it
    #[arg(long)]
    pub in_place: bool,
}

#[derive(Subcommand, Debug)]
pub enum TemplateCommand {
    /// List a profile's templates (* marks the default)
    List {
        /// Profile id or name
        profile: String,
    },
    /// Print a template
    Show(TemplateShowArgs),
    /// Apply a template to a document
    Apply(TemplateApplyArgs),
}

#[derive(Parser, Debug)]
pub struct TemplateShowArgs {
    /// Profile id or name
    pub profile: String,

    /// Template id (default: the profile's default template)
    #[arg(long)]
    pub id: Option<String>,
}

#[derive(Parser, Debug)]
pub struct TemplateApplyArgs {
    /// Profile id or name
    pub profile: String,

    /// Template id (default: the profile's default template)
    #[arg(long)]
    pub id: Option<String>,

    /// Replace the document or append to it
    #[arg(long, default_value = "replace")]
    pub mode: ModeArg,

    /// Document to apply to (missing file = empty document)
    #[arg(long, short = 'd', value_name = "FILE")]
    pub document: Option<PathBuf>,

    /// Write the result back to the document instead of printing it
    #[arg(long, requires = "document")]
    pub in_place: bool,
}

/// How a template combines with the document.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ModeArg {
    Replace,
    Append,
}

impl From<ModeArg> for ApplyMode {
    fn from(value: ModeArg) -> Self {
        match value {
            ModeArg::Replace => Self::Replace,
            ModeArg::Append => Self::Append,
        }
    }
}

#[derive(Parser, Debug)]
pub struct WatchArgs {
    /// Profile id or name
    pub profile: String,

    /// JSON, YAML, or TOML file holding the export fields
    pub fields_file: PathBuf,

    /// Document used to derive the cheat name
    #[arg(long, short = 'd', value_name = "FILE")]
    pub document: Option<PathBuf>,

    /// Render the preview once and exit
    #[arg(long)]
    pub once: bool,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show current preferences
    Show,
    /// Print the preferences file path
    Path,
    /// Set the main export root
    SetRoot {
        /// New export root (~ is expanded)
        path: String,
    },
    /// Restore the platform default export root
    ResetRoot,
    /// Export a profile somewhere other than the main root
    SetOverride {
        /// Profile id or name
        profile: String,
        /// Export root for this profile
        path: String,
    },
    /// Remove a profile's export root override
    ClearOverride {
        /// Profile id or name
        profile: String,
    },
    /// Remember a profile's default starter template
    SetDefaultTemplate {
        /// Profile id or name
        profile: String,
        /// Template id
        template: String,
    },
    /// Forget saved default templates
    ResetDefaultTemplate {
        /// Profile id or name
        #[arg(required_unless_present = "all")]
        profile: Option<String>,
        /// Forget every saved default
        #[arg(long, conflicts_with = "profile")]
        all: bool,
    },
    /// Select the default RetroArch core
    SetCore {
        /// Core name (added to the list if new)
        core: String,
    },
    /// Add a RetroArch core to the list
    AddCore {
        /// Core name
        core: String,
    },
    /// Remove a RetroArch core from the list
    RemoveCore {
        /// Core name
        core: String,
    },
    /// Set the profile list order
    SetSort {
        /// Sort order
        sort: SortArg,
    },
}

#[derive(Subcommand, Debug)]
pub enum CustomProfileCommand {
    /// Add or replace a user-defined profile
    Add(CustomProfileAddArgs),
    /// Remove a user-defined profile
    Remove {
        /// Profile name
        name: String,
    },
}

#[derive(Parser, Debug)]
pub struct CustomProfileAddArgs {
    /// Display name (must not match a built-in or another custom profile)
    pub name: String,

    /// Folder template under the export root
    #[arg(long, default_value = "")]
    pub subdir: String,

    /// File name template without extension
    #[arg(long, default_value = "")]
    pub filename_hint: String,

    /// Comma separated extensions (default: .txt)
    #[arg(long, default_value = "")]
    pub extensions: String,

    /// Profile kind
    #[arg(long, default_value = "generic", value_parser = parse_kind)]
    pub kind: ProfileKind,

    /// Fixed output file name (singlefile kind)
    #[arg(long)]
    pub fixed_filename: Option<String>,

    /// Free-form notes
    #[arg(long, default_value = "")]
    pub notes: String,
}

fn parse_kind(raw: &str) -> Result<ProfileKind, String> {
    raw.parse()
}

#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
