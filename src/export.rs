//! Validate, plan and write in one call.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::config::Preferences;
use crate::error::{CxError, Result};
use crate::plan::{ExportFields, ExportPlan, PathPlanner, materialize};
use crate::profile::Profile;
use crate::validate::{FieldId, Issue, Validation, validate};

/// Decides whether an export continues past advisory issues.
pub trait ConfirmAdvisory {
    fn confirm(&mut self, advisories: &[Issue]) -> bool;
}

impl<F> ConfirmAdvisory for F
where
    F: FnMut(&[Issue]) -> bool,
{
    fn confirm(&mut self, advisories: &[Issue]) -> bool {
        self(advisories)
    }
}

/// Accepts every advisory (`--yes`).
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl ConfirmAdvisory for AcceptAll {
    fn confirm(&mut self, _advisories: &[Issue]) -> bool {
        true
    }
}

/// One export action.
#[derive(Debug, Clone)]
pub struct ExportRequest<'a> {
    pub profile: &'a Profile,
    pub fields: ExportFields,
    pub document: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportReport {
    pub plan: ExportPlan,
    pub written: Vec<PathBuf>,
    pub accepted_advisories: Vec<Issue>,
    pub exported_at: DateTime<Utc>,
}

/// Validation including the empty-document check.
pub fn preflight(profile: &Profile, fields: &ExportFields, document: &str, prefs: &Preferences) -> Validation {
    let mut validation = Validation::default();
    if document.trim().is_empty() {
        validation.push(
            Issue::blocking(FieldId::Document, "Nothing to export: the document is empty")
                .with_suggestion("Add cheat codes or apply a template first"),
        );
    }
    validation
        .issues
        .extend(validate(profile, fields, prefs).issues);
    validation
}

/// The document with exactly one trailing newline.
pub fn normalize_content(document: &str) -> String {
    let mut content = document.trim_end_matches(['\n', '\r']).to_string();
    content.push('\n');
    content
}

/// Runs exports against one set of preferences.
#[derive(Debug, Clone, Copy)]
pub struct ExportExecutor<'a> {
    prefs: &'a Preferences,
}

impl<'a> ExportExecutor<'a> {
    pub const fn new(prefs: &'a Preferences) -> Self {
        Self { prefs }
    }

    /// Validate, confirm advisories, plan, then write.
    ///
    /// Blocking issues and declined advisories return before anything is
    /// planned or written.
    #[instrument(skip_all, fields(profile = %request.profile.id))]
    pub fn run(&self, request: ExportRequest<'_>, confirm: &mut dyn ConfirmAdvisory) -> Result<ExportReport> {
        let fields = request.fields.with_document(request.document);
        let validation = preflight(request.profile, &fields, request.document, self.prefs);

        if validation.has_blocking() {
            let issues = validation.blocking();
            warn!(count = issues.len(), "Export blocked");
            return Err(CxError::Blocked { issues });
        }

        let advisories = validation.advisories();
        if !advisories.is_empty() && !confirm.confirm(&advisories) {
            info!(count = advisories.len(), "Advisories declined");
            return Err(CxError::AdvisoryDeclined {
                count: advisories.len(),
            });
        }

        let plan = PathPlanner::new(self.prefs).resolve(request.profile, &fields);
        let written = materialize(&plan, &normalize_content(request.document))?;
        info!(files = written.len(), out_dir = %plan.out_dir.display(), "Export complete");
        Ok(ExportReport {
            plan,
            written,
            accepted_advisories: advisories,
            exported_at: Utc::now(),
        })
    }
}
