//! cheatx - Export cheat documents to the folder layout each emulator expects.
//!
//! Provides both human-friendly and agent-friendly (robot mode) interfaces.
#![forbid(unsafe_code)]

use std::io;
use std::path::{Path, PathBuf};

use clap::Parser;
use console::Term;
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use cheatx::cli::{
    AddCheatArgs, Cli, Commands, ConfigCommand, CustomProfileAddArgs, CustomProfileCommand,
    DetectArgs, ExportArgs, PlanArgs, ProfilesArgs, TemplateCommand, WatchArgs,
};
use cheatx::config::{
    ConfigFormat, CustomProfile, Preferences, default_export_root, default_prefs_path,
    expand_tilde,
};
use cheatx::detect::infer_fields;
use cheatx::encode::{CheatInput, insert_cheat};
use cheatx::error::{CxError, Result, ResultExt};
use cheatx::export::{AcceptAll, ConfirmAdvisory, ExportExecutor, ExportRequest, preflight};
use cheatx::logging::init_logging;
use cheatx::output::{DocumentResult, Output, OutputMode, PlanView, PrefsView, TemplateListing};
use cheatx::plan::{ExportFields, PathPlanner};
use cheatx::preview::{DEFAULT_PREVIEW_DELAY, PreviewDebouncer, preview_for, render};
use cheatx::profile::{Profile, ProfileRegistry, Template, apply_template, default_template};
use cheatx::validate::{Issue, validate};

/// Build information embedded at compile time.
mod build_info {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");

    pub fn git_sha() -> Option<&'static str> {
        option_env!("VERGEN_GIT_SHA")
    }

    pub fn build_timestamp() -> Option<&'static str> {
        option_env!("VERGEN_BUILD_TIMESTAMP")
    }
}

fn main() {
    let cli = Cli::parse();
    let mode = OutputMode::from_cli(&cli);
    init_logging(mode.is_robot(), cli.verbose, cli.quiet);
    let robot = mode.is_robot();
    let out = mode.into_output(cli.quiet);

    if let Err(e) = run(&cli, out.as_ref(), robot) {
        out.error(&e);
        std::process::exit(1);
    }
}

/// Preferences and profiles for one invocation.
struct Session {
    prefs_path: PathBuf,
    prefs_exist: bool,
    prefs: Preferences,
    registry: ProfileRegistry,
}

impl Session {
    fn load(cli: &Cli) -> Result<Self> {
        let prefs_path = match &cli.prefs {
            Some(path) => path.clone(),
            None => default_prefs_path()?,
        };
        let prefs_exist = prefs_path.exists();
        let prefs = Preferences::load(&prefs_path)?;
        // An explicit catalog must load; the default one is best-effort.
        let registry = match &cli.catalog {
            Some(path) => ProfileRegistry::try_load_session(Some(path), &prefs)?,
            None => ProfileRegistry::load_session(None, &prefs),
        };
        debug!(
            prefs = %prefs_path.display(),
            profiles = registry.len(),
            "Session loaded"
        );
        Ok(Self {
            prefs_path,
            prefs_exist,
            prefs,
            registry,
        })
    }

    fn profile(&self, query: &str) -> Result<&Profile> {
        self.registry.find(query)
    }

    fn save(&self) -> Result<()> {
        self.prefs.save(&self.prefs_path)
    }
}

fn run(cli: &Cli, out: &dyn Output, robot: bool) -> Result<()> {
    let Some(command) = &cli.command else {
        return print_quick_start(cli);
    };
    match command {
        Commands::Version => {
            out.version_info(
                build_info::VERSION,
                build_info::git_sha(),
                build_info::build_timestamp(),
            );
            return Ok(());
        }
        Commands::Completions(args) => {
            use clap::CommandFactory;
            clap_complete::generate(args.shell, &mut Cli::command(), "cheatx", &mut io::stdout());
            return Ok(());
        }
        _ => {}
    }

    let mut session = Session::load(cli)?;
    match command {
        Commands::Profiles(args) => cmd_profiles(&session, out, args),
        Commands::Show(args) => cmd_show(&session, out, &args.profile),
        Commands::Detect(args) => cmd_detect(&session, out, args),
        Commands::Plan(args) => cmd_plan(&session, out, args),
        Commands::Export(args) => cmd_export(&session, out, args, robot),
        Commands::AddCheat(args) => cmd_add_cheat(&session, out, args),
        Commands::Template(command) => cmd_template(&session, out, command),
        Commands::Watch(args) => cmd_watch(&session, out, args),
        Commands::Config(command) => cmd_config(&mut session, out, command),
        Commands::CustomProfile(command) => cmd_custom_profile(&mut session, out, command),
        Commands::Version | Commands::Completions(_) => Ok(()),
    }
}

// === Quick Start (Robot Mode Optimized) ===

/// Prints quick-start help optimized for both humans and AI agents.
#[allow(clippy::unnecessary_wraps)] // Consistent return type with other commands
fn print_quick_start(cli: &Cli) -> Result<()> {
    if cli.use_json() {
        print_robot_quick_start();
    } else {
        print_human_quick_start();
    }
    Ok(())
}

fn print_robot_quick_start() {
    let help = RobotQuickStart {
        tool: "cheatx",
        version: build_info::VERSION,
        description: "Profile-driven cheat file export for emulators and modded consoles",
        discovery: RobotDiscovery {
            list_profiles: "cheatx profiles --robot",
            show_profile: "cheatx show <PROFILE> --robot",
            detect_file: "cheatx detect <FILE> --robot",
        },
        export: RobotExport {
            plan: "cheatx plan <PROFILE> --tid <TID> --bid <BID> --robot",
            export: "cheatx export <PROFILE> -d <DOCUMENT> [FIELDS] --yes --robot",
            add_cheat: "cheatx add-cheat <PROFILE> -d <DOCUMENT> --desc <TEXT> -c <CODE> --in-place",
            template: "cheatx template apply <PROFILE> -d <DOCUMENT> --in-place",
        },
        fields: RobotFields {
            switch: "--title-id <16 hex> --build-ids <16|32 hex, comma separated>",
            retroarch: "--core <CORE> --identifier <GAME>",
            other: "--identifier <GAME ID / CRC / SERIAL>",
            root: "--root <DIR> overrides the export root for one run",
        },
        output_modes: OutputModes {
            human: "--format=human (default)",
            robot: "--robot or --format=json",
            compact: "--format=json-compact",
        },
        advisories: "Warnings need --yes in robot mode; otherwise the export is cancelled",
    };

    println!(
        "{}",
        serde_json::to_string_pretty(&help).unwrap_or_else(|_| "{}".to_string())
    );
}

fn print_human_quick_start() {
    let bold = console::Style::new().bold().underlined();
    let cmd = console::Style::new().green();
    let robot = console::Style::new().cyan();

    println!(
        "{} {} - cheat file exporter\n",
        console::style("cheatx").bold().cyan(),
        build_info::VERSION
    );

    println!("{}", bold.apply_to("QUICK START"));
    println!();
    println!("  {}  List profiles", cmd.apply_to("cheatx profiles"));
    println!("  {}  Profile details", cmd.apply_to("cheatx show dolphin"));
    println!(
        "  {}  Preview paths",
        cmd.apply_to("cheatx plan atmosphere --tid 0100ABCDEF123456 --bid 1122334455667788")
    );
    println!(
        "  {}  Write files",
        cmd.apply_to("cheatx export dolphin -d cheats.ini -i GMSE01")
    );
    println!(
        "  {}  Add a cheat",
        cmd.apply_to("cheatx add-cheat retroarch -d game.cht --desc HP -c 1234 --in-place")
    );
    println!("  {}  Guess fields", cmd.apply_to("cheatx detect path/to/file.txt"));
    println!("  {}  Set export root", cmd.apply_to("cheatx config set-root ~/SD"));
    println!();

    println!("{}", bold.apply_to("ROBOT MODE (for AI agents)"));
    println!();
    println!("  {}  JSON output", robot.apply_to("cheatx --robot <command>"));
    println!("  {}  Quick-start JSON", robot.apply_to("cheatx --robot"));
    println!();

    println!(
        "Run {} for full help",
        console::style("cheatx --help").yellow()
    );
}

// === Robot Mode JSON Structures ===

#[derive(Serialize)]
struct RobotQuickStart {
    tool: &'static str,
    version: &'static str,
    description: &'static str,
    discovery: RobotDiscovery,
    export: RobotExport,
    fields: RobotFields,
    output_modes: OutputModes,
    advisories: &'static str,
}

#[derive(Serialize)]
struct RobotDiscovery {
    list_profiles: &'static str,
    show_profile: &'static str,
    detect_file: &'static str,
}

#[derive(Serialize)]
struct RobotExport {
    plan: &'static str,
    export: &'static str,
    add_cheat: &'static str,
    template: &'static str,
}

#[derive(Serialize)]
struct RobotFields {
    switch: &'static str,
    retroarch: &'static str,
    other: &'static str,
    root: &'static str,
}

#[derive(Serialize)]
struct OutputModes {
    human: &'static str,
    robot: &'static str,
    compact: &'static str,
}

// === Command Implementations ===

#[allow(clippy::unnecessary_wraps)] // Consistent return type with other commands
fn cmd_profiles(session: &Session, out: &dyn Output, args: &ProfilesArgs) -> Result<()> {
    let sort = args.sort.map_or(session.prefs.profile_sort, Into::into);
    out.profile_list(&session.registry.sorted(sort));
    Ok(())
}

fn cmd_show(session: &Session, out: &dyn Output, query: &str) -> Result<()> {
    let profile = session.profile(query)?;
    let override_root = session.prefs.override_for(&profile.id);
    out.profile_detail(profile, override_root.as_deref());
    Ok(())
}

fn cmd_detect(session: &Session, out: &dyn Output, args: &DetectArgs) -> Result<()> {
    let text = std::fs::read_to_string(&args.file)
        .with_context(|| format!("Reading {}", args.file.display()))?;
    let inference = infer_fields(
        &args.file,
        &text,
        &session.registry,
        &session.prefs.retroarch_cores,
    );
    out.inference(&args.file, &inference);
    Ok(())
}

fn cmd_plan(session: &Session, out: &dyn Output, args: &PlanArgs) -> Result<()> {
    let profile = session.profile(&args.profile)?;
    let document = match &args.document {
        Some(path) => Some(read_document(path)?),
        None => None,
    };
    let mut fields = args.fields.to_fields();
    if let Some(doc) = &document {
        fields = fields.with_document(doc);
    }
    let validation = match &document {
        Some(doc) => preflight(profile, &fields, doc, &session.prefs),
        None => validate(profile, &fields, &session.prefs),
    };
    let plan = PathPlanner::new(&session.prefs).resolve(profile, &fields);
    let preview = render(&plan, &fields);
    out.plan_result(&PlanView {
        plan: &plan,
        issues: &validation.issues,
        preview: &preview,
    });
    Ok(())
}

fn cmd_export(session: &Session, out: &dyn Output, args: &ExportArgs, robot: bool) -> Result<()> {
    let profile = session.profile(&args.profile)?;
    let document = read_document(&args.document)?;

    let mut accept = AcceptAll;
    let mut ask = |issues: &[Issue]| !robot && prompt_advisories(out, issues);
    let confirm: &mut dyn ConfirmAdvisory = if args.yes { &mut accept } else { &mut ask };

    let report = ExportExecutor::new(&session.prefs).run(
        ExportRequest {
            profile,
            fields: args.fields.to_fields(),
            document: &document,
        },
        confirm,
    )?;
    out.export_report(&report);
    Ok(())
}

/// Ask on the terminal whether to continue past `issues`.
///
/// Declines when stdin/stderr is not interactive.
fn prompt_advisories(out: &dyn Output, issues: &[Issue]) -> bool {
    let term = Term::stderr();
    if !term.is_term() {
        info!(count = issues.len(), "Not a terminal; declining advisories");
        return false;
    }
    for issue in issues {
        out.warning(&format!("{}: {}", issue.field.label(), issue.message));
    }
    if term.write_str("Export anyway? [y/N] ").is_err() {
        return false;
    }
    term.read_line()
        .map(|answer| matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
        .unwrap_or(false)
}

fn cmd_add_cheat(session: &Session, out: &dyn Output, args: &AddCheatArgs) -> Result<()> {
    let profile = session.profile(&args.profile)?;
    let document = read_document_or_empty(&args.document)?;
    let input = CheatInput {
        description: args.desc.clone(),
        codes: args.codes.clone(),
        enabled: !args.disabled,
    };
    let updated = insert_cheat(
        profile.kind.encoder(),
        &profile.output_extension(),
        &document,
        &input,
    )?;
    emit_document(out, &updated, args.in_place.then_some(args.document.as_path()))
}

fn cmd_template(session: &Session, out: &dyn Output, command: &TemplateCommand) -> Result<()> {
    match command {
        TemplateCommand::List { profile } => {
            let profile = session.profile(profile)?;
            let default = default_template(profile, &session.prefs).map(|t| t.id.as_str());
            out.templates(&TemplateListing {
                profile_id: &profile.id,
                default,
                templates: &profile.templates,
            });
            Ok(())
        }
        TemplateCommand::Show(args) => {
            let profile = session.profile(&args.profile)?;
            let template = pick_template(session, profile, args.id.as_deref())?;
            out.template(profile, template);
            Ok(())
        }
        TemplateCommand::Apply(args) => {
            let profile = session.profile(&args.profile)?;
            let template = pick_template(session, profile, args.id.as_deref())?;
            let document = match &args.document {
                Some(path) => read_document_or_empty(path)?,
                None => String::new(),
            };
            let updated = apply_template(&document, &template.content, args.mode.into());
            let target = args.document.as_deref().filter(|_| args.in_place);
            emit_document(out, &updated, target)
        }
    }
}

fn pick_template<'a>(session: &Session, profile: &'a Profile, id: Option<&str>) -> Result<&'a Template> {
    let found = match id {
        Some(id) => profile.template(id),
        None => default_template(profile, &session.prefs),
    };
    found.ok_or_else(|| CxError::TemplateNotFound {
        profile: profile.name.clone(),
        template: id.unwrap_or("default").to_string(),
    })
}

// === Watch ===

fn cmd_watch(session: &Session, out: &dyn Output, args: &WatchArgs) -> Result<()> {
    let profile = session.profile(&args.profile)?.clone();
    let document = match &args.document {
        Some(path) => read_document(path)?,
        None => String::new(),
    };

    if args.once {
        let fields = load_fields_file(&args.fields_file, &document)?;
        out.preview(0, &preview_for(&profile, &fields, &session.prefs));
        return Ok(());
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(watch_fields(
        profile,
        session.prefs.clone(),
        &args.fields_file,
        &document,
        out,
    ))
}

async fn watch_fields(
    profile: Profile,
    prefs: Preferences,
    fields_file: &Path,
    document: &str,
    out: &dyn Output,
) -> Result<()> {
    let target = fields_file
        .file_name()
        .map(ToOwned::to_owned)
        .ok_or_else(|| CxError::Watch(format!("Not a file: {}", fields_file.display())))?;
    let watch_dir = fields_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let (event_tx, mut events) = mpsc::unbounded_channel();
    let mut watcher: RecommendedWatcher =
        notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
            let _ = event_tx.send(res);
        })
        .map_err(|e| CxError::Watch(e.to_string()))?;
    // Editors often replace the file, so watch its directory.
    watcher
        .watch(watch_dir, RecursiveMode::NonRecursive)
        .map_err(|e| CxError::Watch(e.to_string()))?;
    info!(path = %fields_file.display(), "Watching fields file");

    let (mut debouncer, mut previews) =
        PreviewDebouncer::new(DEFAULT_PREVIEW_DELAY, move |fields: &ExportFields| {
            preview_for(&profile, fields, &prefs)
        });
    match load_fields_file(fields_file, document) {
        Ok(fields) => {
            debouncer.schedule(fields);
        }
        Err(e) => out.warning(&e.to_string()),
    }

    loop {
        tokio::select! {
            Some(event) = events.recv() => match event {
                Ok(event) if event.paths.iter().any(|p| p.file_name() == Some(target.as_os_str())) => {
                    match load_fields_file(fields_file, document) {
                        Ok(fields) => {
                            debouncer.schedule(fields);
                        }
                        Err(e) => out.warning(&e.to_string()),
                    }
                }
                Ok(_) => {}
                Err(e) => warn!(error = %e, "Watch event error"),
            },
            Some(update) = previews.recv() => out.preview(update.generation, &update.text),
            _ = tokio::signal::ctrl_c() => {
                debouncer.cancel();
                debug!("Watch interrupted");
                break;
            }
        }
    }
    Ok(())
}

/// Read export fields from a JSON, YAML, or TOML file.
fn load_fields_file(path: &Path, document: &str) -> Result<ExportFields> {
    let format = ConfigFormat::for_path(path)?;
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Reading {}", path.display()))?;
    let fields: ExportFields = if content.trim().is_empty() {
        ExportFields::default()
    } else {
        format
            .parse(&content)
            .map_err(|e| CxError::Other(format!("Invalid fields file {}: {e}", path.display())))?
    };
    Ok(fields.with_document(document))
}

// === Configuration ===

fn cmd_config(session: &mut Session, out: &dyn Output, command: &ConfigCommand) -> Result<()> {
    let message = match command {
        ConfigCommand::Show => {
            out.preferences(&PrefsView {
                path: &session.prefs_path,
                exists: session.prefs_exist,
                prefs: &session.prefs,
            });
            return Ok(());
        }
        ConfigCommand::Path => {
            out.prefs_path(&session.prefs_path);
            return Ok(());
        }
        ConfigCommand::SetRoot { path } => {
            session.prefs.export_root = expand_tilde(path);
            format!("Export root set to {}", session.prefs.export_root.display())
        }
        ConfigCommand::ResetRoot => {
            session.prefs.export_root = default_export_root();
            format!("Export root reset to {}", session.prefs.export_root.display())
        }
        ConfigCommand::SetOverride { profile, path } => {
            let profile = session.registry.find(profile)?;
            session.prefs.set_override(profile, path)?;
            format!("{} now exports to {}", profile.name, path.trim())
        }
        ConfigCommand::ClearOverride { profile } => {
            let id = session
                .registry
                .find(profile)
                .map_or_else(|_| profile.clone(), |p| p.id.clone());
            if session.prefs.clear_override(&id) {
                format!("Override cleared for {id}")
            } else {
                out.info(&format!("No override set for {id}"));
                return Ok(());
            }
        }
        ConfigCommand::SetDefaultTemplate { profile, template } => {
            let profile = session.registry.find(profile)?;
            session.prefs.set_default_template(profile, template)?;
            format!("Default template for {} set to {template}", profile.name)
        }
        ConfigCommand::ResetDefaultTemplate { profile, all } => {
            if *all {
                let count = session.prefs.reset_all_default_templates();
                format!("Reset {count} default template(s)")
            } else {
                let query = profile.as_deref().unwrap_or_default();
                let id = session.registry.find(query)?.id.clone();
                if !session.prefs.reset_default_template(&id) {
                    out.info(&format!("No saved default template for {id}"));
                    return Ok(());
                }
                format!("Default template reset for {id}")
            }
        }
        ConfigCommand::SetCore { core } => {
            session.prefs.set_core(core);
            format!("Default core set to {}", session.prefs.retroarch_core)
        }
        ConfigCommand::AddCore { core } => {
            if !session.prefs.add_core(core) {
                out.info(&format!("Core already listed: {}", core.trim()));
                return Ok(());
            }
            format!("Added core {}", core.trim())
        }
        ConfigCommand::RemoveCore { core } => {
            if !session.prefs.remove_core(core) {
                out.info(&format!("Core not removed: {}", core.trim()));
                return Ok(());
            }
            format!("Removed core {}", core.trim())
        }
        ConfigCommand::SetSort { sort } => {
            session.prefs.profile_sort = (*sort).into();
            format!("Profile sort set to {}", format!("{sort:?}").to_lowercase())
        }
    };
    session.save()?;
    out.prefs_updated(&message, &session.prefs_path);
    Ok(())
}

fn cmd_custom_profile(
    session: &mut Session,
    out: &dyn Output,
    command: &CustomProfileCommand,
) -> Result<()> {
    let message = match command {
        CustomProfileCommand::Add(args) => add_custom_profile(session, args)?,
        CustomProfileCommand::Remove { name } => {
            if !session.prefs.remove_custom_profile(name) {
                return Err(CxError::ProfileNotFound {
                    query: name.clone(),
                });
            }
            format!("Removed custom profile {}", name.trim())
        }
    };
    session.save()?;
    out.prefs_updated(&message, &session.prefs_path);
    Ok(())
}

fn add_custom_profile(session: &mut Session, args: &CustomProfileAddArgs) -> Result<String> {
    let custom = CustomProfile {
        subdir: args.subdir.trim().to_string(),
        filename_hint: args.filename_hint.trim().to_string(),
        extensions: CustomProfile::parse_extensions(&args.extensions),
        notes: args.notes.trim().to_string(),
        kind: args.kind,
        fixed_filename: args
            .fixed_filename
            .as_deref()
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(str::to_string),
    };
    let reserved = session.registry.builtin_names();
    session
        .prefs
        .upsert_custom_profile(&args.name, custom, &reserved)?;
    Ok(format!("Saved custom profile {}", args.name.trim()))
}

// === Utility Functions ===

fn read_document(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Reading {}", path.display()))
}

/// A missing document counts as empty.
fn read_document_or_empty(path: &Path) -> Result<String> {
    if path.exists() {
        read_document(path)
    } else {
        Ok(String::new())
    }
}

fn emit_document(out: &dyn Output, content: &str, target: Option<&Path>) -> Result<()> {
    if let Some(path) = target {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        info!(path = %path.display(), "Document updated");
    }
    out.document(&DocumentResult {
        written_to: target,
        content,
    });
    Ok(())
}
