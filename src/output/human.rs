//! Human-friendly output implementation using console.

use std::path::Path;

use console::{Style, Term};
use tracing::{debug, instrument, trace};

use crate::detect::Inference;
use crate::error::CxError;
use crate::export::ExportReport;
use crate::profile::{Profile, Template};
use crate::theme::CxTheme;
use crate::validate::{Issue, Severity};

use super::{DocumentResult, Output, PlanView, PrefsView, TemplateListing};

/// Styled terminal output implementation for human users.
pub struct HumanOutput {
    out: Term,
    err: Term,
    theme: CxTheme,
    quiet: bool,
}

impl HumanOutput {
    #[instrument(skip(theme))]
    pub fn new(theme: CxTheme, quiet: bool) -> Self {
        debug!("Creating HumanOutput");
        Self {
            out: Term::stdout(),
            err: Term::stderr(),
            theme,
            quiet,
        }
    }

    fn line(&self, text: &str) {
        let _ = self.out.write_line(text);
    }

    fn status(&self, tag: &str, style: &Style, message: &str) {
        self.line(&format!("{} {message}", style.clone().bold().apply_to(tag)));
    }

    fn field(&self, name: &str, value: &str) {
        self.line(&format!(
            "  {}{}",
            self.theme.label.apply_to(format!("{name:<12}")),
            self.theme.value.apply_to(value)
        ));
    }

    fn issue_line(&self, issue: &Issue) {
        let (tag, style) = match issue.severity {
            Severity::Blocking => ("[BLOCK]", &self.theme.blocking),
            Severity::Advisory => ("[WARN] ", &self.theme.advisory),
        };
        self.line(&format!(
            "  {} {}: {}",
            style.apply_to(tag),
            issue.field.label(),
            issue.message
        ));
        if let Some(suggestion) = &issue.suggestion {
            self.line(&format!("          {}", self.theme.muted.apply_to(suggestion)));
        }
    }

    fn header(&self, text: &str) {
        self.line(&self.theme.header.apply_to(text).to_string());
    }
}

impl Output for HumanOutput {
    #[instrument(skip(self))]
    fn success(&self, message: &str) {
        debug!(message, "Outputting success");
        if !self.quiet {
            self.status("[OK]", &self.theme.success, message);
        }
    }

    #[instrument(skip(self))]
    fn error(&self, error: &CxError) {
        debug!(
            error = %error,
            recoverable = error.is_user_recoverable(),
            "Outputting error"
        );
        let mut lines = vec![format!(
            "{} {}",
            self.theme.error.clone().bold().apply_to("[ERR]"),
            console::style(error.to_string()).bold().for_stderr()
        )];

        if let CxError::Blocked { issues } = error {
            for issue in issues {
                lines.push(format!("    - {}: {}", issue.field.label(), issue.message));
            }
        }
        if let CxError::Materialize { written, .. } = error {
            if !written.is_empty() {
                lines.push(String::new());
                lines.push(self.theme.label.apply_to("  Already written:").to_string());
                for path in written {
                    lines.push(format!("    {}", self.theme.path.apply_to(path.display())));
                }
            }
        }

        if let Some(suggestion) = error.suggestion() {
            trace!(suggestion, "Adding suggestion");
            lines.push(String::new());
            lines.push(self.theme.label.apply_to("  Suggestion:").to_string());
            lines.push(format!("  {}", self.theme.muted.apply_to(suggestion)));
        }

        for line in lines {
            let _ = self.err.write_line(&line);
        }
    }

    #[instrument(skip(self))]
    fn warning(&self, message: &str) {
        debug!(message, "Outputting warning");
        let _ = self.err.write_line(&format!(
            "{} {message}",
            self.theme.warning.clone().bold().apply_to("[WARN]")
        ));
    }

    #[instrument(skip(self))]
    fn info(&self, message: &str) {
        debug!(message, "Outputting info");
        if !self.quiet {
            self.status("[INFO]", &self.theme.accent, message);
        }
    }

    #[instrument(skip(self, profiles), fields(count = profiles.len()))]
    fn profile_list(&self, profiles: &[&Profile]) {
        debug!("Outputting profile list");
        if profiles.is_empty() {
            self.warning("No profiles available");
            return;
        }
        let width = profiles.iter().map(|p| p.id.len()).max().unwrap_or(0);
        for profile in profiles {
            let mut line = format!(
                "  {}  {}",
                self.theme.profile_id.apply_to(format!("{:<width$}", profile.id)),
                profile.name
            );
            if profile.is_custom() {
                line.push_str(&format!(" {}", self.theme.muted.apply_to("(custom)")));
            }
            self.line(&line);
        }
    }

    #[instrument(skip(self, profile), fields(id = %profile.id))]
    fn profile_detail(&self, profile: &Profile, override_root: Option<&Path>) {
        debug!("Outputting profile detail");
        self.header(&profile.name);
        self.field("Id", &profile.id);
        self.field("Kind", profile.kind.as_str());
        let exts: Vec<&str> = profile
            .extensions
            .iter()
            .map(|e| e.extension.as_str())
            .collect();
        self.field("Extensions", &exts.join(", "));
        self.field("Output ext", &profile.output_extension());
        if !profile.subdir.is_empty() {
            self.field("Folder", &profile.subdir);
        }
        if let Some(fixed) = &profile.fixed_filename {
            self.field("File", fixed);
        } else if !profile.filename_hint.is_empty() {
            self.field("File name", &profile.filename_hint);
        }
        if let Some(format) = &profile.identifier_format {
            self.field(
                format.label.as_deref().unwrap_or("Identifier"),
                &format!("e.g. {}", format.example),
            );
        }
        if profile.pin_export_root {
            self.field("Root", "always the main export root");
        } else if let Some(root) = override_root {
            self.field("Root", &root.display().to_string());
        }
        if !profile.templates.is_empty() {
            let ids: Vec<&str> = profile.templates.iter().map(|t| t.id.as_str()).collect();
            self.field("Templates", &ids.join(", "));
        }
        if let Some(notes) = &profile.notes {
            self.line("");
            self.line(&format!("  {}", self.theme.muted.apply_to(notes)));
        }
    }

    fn templates(&self, listing: &TemplateListing<'_>) {
        debug!(profile = listing.profile_id, "Outputting templates");
        if listing.templates.is_empty() {
            self.info(&format!("No templates for {}", listing.profile_id));
            return;
        }
        for template in listing.templates {
            let marker = if listing.default == Some(template.id.as_str()) {
                self.theme.success.apply_to("*").to_string()
            } else {
                " ".to_string()
            };
            self.line(&format!(
                " {marker} {}  {}",
                self.theme.profile_id.apply_to(&template.id),
                template.display_name()
            ));
        }
    }

    fn template(&self, profile: &Profile, template: &Template) {
        debug!(profile = %profile.id, template = %template.id, "Outputting template");
        let _ = self.out.write_str(&template.content);
        if !template.content.ends_with('\n') {
            self.line("");
        }
    }

    #[instrument(skip(self, view), fields(files = view.plan.files.len()))]
    fn plan_result(&self, view: &PlanView<'_>) {
        debug!("Outputting plan");
        self.header(&format!("Plan for {}", view.plan.profile_id));
        self.field("Root", &view.plan.root.display().to_string());
        self.field("Folder", &view.plan.out_dir.display().to_string());
        for file in &view.plan.files {
            self.line(&format!("    {}", self.theme.path.apply_to(file.display())));
        }
        if !view.issues.is_empty() {
            self.line("");
            for issue in view.issues {
                self.issue_line(issue);
            }
        }
        self.line("");
        self.line(view.preview);
    }

    #[instrument(skip(self, report), fields(files = report.written.len()))]
    fn export_report(&self, report: &ExportReport) {
        debug!("Outputting export report");
        for issue in &report.accepted_advisories {
            self.issue_line(issue);
        }
        self.success(&format!(
            "Exported {} file(s) to {}",
            report.written.len(),
            report.plan.out_dir.display()
        ));
        for path in &report.written {
            self.line(&format!("    {}", self.theme.path.apply_to(path.display())));
        }
    }

    fn inference(&self, path: &Path, inference: &Inference) {
        debug!(path = %path.display(), "Outputting inference");
        self.header(&path.display().to_string());
        let rows = [
            ("Profile", &inference.profile_id),
            ("Title ID", &inference.title_id),
            ("Build ID", &inference.build_id),
            ("Core", &inference.core_name),
            ("Core folder", &inference.core_folder),
            ("Identifier", &inference.identifier),
        ];
        let mut any = false;
        for (name, value) in rows {
            if let Some(value) = value {
                any = true;
                self.field(name, value);
            }
        }
        if !any {
            self.info("Nothing detected");
        }
        for hint in &inference.hints {
            self.line(&format!("  {}", self.theme.muted.apply_to(hint)));
        }
    }

    fn document(&self, result: &DocumentResult<'_>) {
        match result.written_to {
            Some(path) => self.success(&format!("Updated {}", path.display())),
            None => {
                let _ = self.out.write_str(result.content);
            }
        }
    }

    fn preview(&self, generation: u64, text: &str) {
        trace!(generation, "Outputting preview");
        self.line(text);
    }

    fn preferences(&self, view: &PrefsView<'_>) {
        debug!("Outputting preferences");
        let prefs = view.prefs;
        let source = if view.exists {
            view.path.display().to_string()
        } else {
            format!("{} (not created yet)", view.path.display())
        };
        self.header("Preferences");
        self.field("File", &source);
        self.field("Export root", &prefs.export_root.display().to_string());
        self.field("Core", &prefs.retroarch_core);
        self.field("Sort", &format!("{:?}", prefs.profile_sort).to_lowercase());
        if !prefs.emulator_paths.is_empty() {
            self.line("");
            self.line(&self.theme.label.apply_to("  Overrides").to_string());
            for (id, path) in &prefs.emulator_paths {
                self.line(&format!("    {id} -> {}", self.theme.path.apply_to(path)));
            }
        }
        if !prefs.templates_default.is_empty() {
            self.line("");
            self.line(&self.theme.label.apply_to("  Default templates").to_string());
            for (id, template) in &prefs.templates_default {
                self.line(&format!("    {id}: {template}"));
            }
        }
        if !prefs.custom_profiles.is_empty() {
            self.line("");
            self.line(&self.theme.label.apply_to("  Custom profiles").to_string());
            for name in prefs.custom_profiles.keys() {
                self.line(&format!("    {name}"));
            }
        }
    }

    fn prefs_path(&self, path: &Path) {
        self.line(&path.display().to_string());
    }

    fn prefs_updated(&self, message: &str, path: &Path) {
        debug!(message, path = %path.display(), "Outputting prefs update");
        self.success(message);
    }

    #[instrument(skip(self))]
    fn version_info(&self, version: &str, git_sha: Option<&str>, build_time: Option<&str>) {
        debug!(version, ?git_sha, ?build_time, "Outputting version info");
        self.header(&format!("cheatx {version}"));

        if let Some(sha) = git_sha {
            let dirty =
                sha.contains("dirty") || matches!(option_env!("VERGEN_GIT_DIRTY"), Some("true"));
            let clean_sha = sha.replace("(dirty)", "").trim().to_string();
            let mut value = clean_sha;
            if dirty {
                value.push_str(&format!(" {}", self.theme.warning.apply_to("(dirty)")));
            }
            self.field("Git SHA", &value);
        }
        if let Some(time) = build_time {
            self.field("Built", time);
        }
        if let Some(rustc) = option_env!("VERGEN_RUSTC_SEMVER") {
            self.field("Rust", rustc);
        }
        if let Some(target) = option_env!("VERGEN_CARGO_TARGET_TRIPLE") {
            self.field("Target", target);
        }
    }
}
