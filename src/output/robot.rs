//! Robot mode JSON output implementation.

use std::path::Path;

use serde::Serialize;
use tracing::{debug, instrument, trace};

use crate::detect::Inference;
use crate::error::CxError;
use crate::export::ExportReport;
use crate::profile::{Profile, Template};

use super::{
    DocumentResult, Output, PlanView, PrefsView, RobotFormat, TemplateListing, display_paths,
};

/// JSON output implementation for AI agents and scripting.
///
/// Results go to stdout as one JSON document; errors go to stderr.
pub struct RobotOutput {
    format: RobotFormat,
}

/// The error document written to stderr.
pub fn error_json(error: &CxError) -> serde_json::Value {
    let mut json = serde_json::json!({
        "error": true,
        "kind": error.kind(),
        "message": error.to_string(),
        "suggestion": error.suggestion(),
        "recoverable": error.is_user_recoverable(),
    });
    if let CxError::Blocked { issues } = error {
        json["issues"] = serde_json::to_value(issues).unwrap_or_default();
    }
    if let CxError::Materialize { written, .. } = error {
        json["written"] = serde_json::json!(display_paths(written));
    }
    json
}

impl RobotOutput {
    #[instrument]
    pub fn new(format: RobotFormat) -> Self {
        debug!(?format, "Creating RobotOutput");
        Self { format }
    }

    fn serialize<T: Serialize + ?Sized>(&self, data: &T) -> String {
        let result = match self.format {
            RobotFormat::Json => serde_json::to_string_pretty(data),
            RobotFormat::JsonCompact => serde_json::to_string(data),
        };
        result.unwrap_or_else(|e| {
            let err = CxError::Serialize(e.to_string());
            error_json(&err).to_string()
        })
    }

    /// Output any serializable data as JSON to stdout.
    #[instrument(skip(self, data), fields(format = ?self.format))]
    fn output_json<T: Serialize + ?Sized>(&self, data: &T) {
        let json = self.serialize(data);
        trace!(json_len = json.len(), "JSON serialized");
        println!("{json}");
    }

    /// Output single-line JSON (for streaming events).
    fn output_json_line<T: Serialize>(&self, data: &T) {
        let json = serde_json::to_string(data)
            .unwrap_or_else(|e| error_json(&CxError::Serialize(e.to_string())).to_string());
        trace!(json_len = json.len(), "JSON line serialized");
        println!("{json}");
    }
}

impl Output for RobotOutput {
    #[instrument(skip(self))]
    fn success(&self, message: &str) {
        debug!(message, "Robot: success");
        self.output_json(&serde_json::json!({
            "success": true,
            "message": message
        }));
    }

    #[instrument(skip(self))]
    fn error(&self, error: &CxError) {
        debug!(error = %error, "Robot: error");
        let json = serde_json::to_string_pretty(&error_json(error))
            .unwrap_or_else(|_| error_json(error).to_string());
        eprintln!("{json}");
    }

    #[instrument(skip(self))]
    fn warning(&self, message: &str) {
        debug!(message, "Robot: warning");
        self.output_json(&serde_json::json!({
            "warning": true,
            "message": message
        }));
    }

    #[instrument(skip(self))]
    fn info(&self, message: &str) {
        debug!(message, "Robot: info");
        self.output_json(&serde_json::json!({
            "info": true,
            "message": message
        }));
    }

    #[instrument(skip(self, profiles), fields(count = profiles.len()))]
    fn profile_list(&self, profiles: &[&Profile]) {
        debug!("Robot: profile_list");
        self.output_json(profiles);
    }

    #[instrument(skip(self, profile), fields(id = %profile.id))]
    fn profile_detail(&self, profile: &Profile, override_root: Option<&Path>) {
        debug!("Robot: profile_detail");
        let mut json = serde_json::to_value(profile).unwrap_or_default();
        json["override_root"] = serde_json::json!(override_root.map(|p| p.display().to_string()));
        self.output_json(&json);
    }

    fn templates(&self, listing: &TemplateListing<'_>) {
        debug!(profile = listing.profile_id, "Robot: templates");
        self.output_json(listing);
    }

    fn template(&self, profile: &Profile, template: &Template) {
        debug!(profile = %profile.id, template = %template.id, "Robot: template");
        self.output_json(&serde_json::json!({
            "profile_id": profile.id,
            "template": template,
        }));
    }

    #[instrument(skip(self, view), fields(files = view.plan.files.len()))]
    fn plan_result(&self, view: &PlanView<'_>) {
        debug!("Robot: plan_result");
        self.output_json(&serde_json::json!({
            "plan": view.plan,
            "issues": view.issues,
            "blocked": view.is_blocked(),
            "preview": view.preview,
        }));
    }

    #[instrument(skip(self, report), fields(files = report.written.len()))]
    fn export_report(&self, report: &ExportReport) {
        debug!("Robot: export_report");
        self.output_json(&serde_json::json!({
            "ok": true,
            "profile_id": report.plan.profile_id,
            "out_dir": report.plan.out_dir.display().to_string(),
            "written": display_paths(&report.written),
            "accepted_advisories": report.accepted_advisories,
            "exported_at": report.exported_at,
        }));
    }

    fn inference(&self, path: &Path, inference: &Inference) {
        debug!(path = %path.display(), "Robot: inference");
        self.output_json(&serde_json::json!({
            "path": path.display().to_string(),
            "inference": inference,
        }));
    }

    fn document(&self, result: &DocumentResult<'_>) {
        debug!(written = result.written_to.is_some(), "Robot: document");
        self.output_json(result);
    }

    fn preview(&self, generation: u64, text: &str) {
        trace!(generation, "Robot: preview");
        self.output_json_line(&serde_json::json!({
            "generation": generation,
            "preview": text,
        }));
    }

    fn preferences(&self, view: &PrefsView<'_>) {
        debug!(path = %view.path.display(), "Robot: preferences");
        self.output_json(view);
    }

    fn prefs_path(&self, path: &Path) {
        self.output_json(&serde_json::json!({ "path": path.display().to_string() }));
    }

    fn prefs_updated(&self, message: &str, path: &Path) {
        debug!(message, "Robot: prefs_updated");
        self.output_json(&serde_json::json!({
            "ok": true,
            "message": message,
            "path": path.display().to_string(),
        }));
    }

    #[instrument(skip(self))]
    fn version_info(&self, version: &str, git_sha: Option<&str>, build_time: Option<&str>) {
        debug!(version, ?git_sha, ?build_time, "Robot: version_info");
        self.output_json(&serde_json::json!({
            "version": version,
            "git_sha": git_sha,
            "build_time": build_time
        }));
    }
}
