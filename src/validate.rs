//! Field validation: blocking issues stop an export, advisories ask first.

use regex::Regex;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::{DEFAULT_CORE_LABEL, Preferences};
use crate::plan::placeholder::{Placeholder, placeholders_in};
use crate::plan::sanitize::clean_hex;
use crate::plan::ExportFields;
use crate::profile::{Profile, ProfileKind};

/// How serious an issue is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The export must not proceed.
    Blocking,
    /// Looks wrong but may be intentional; the caller decides.
    Advisory,
}

/// The input an issue is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldId {
    TitleId,
    BuildIds,
    CoreName,
    Identifier,
    Document,
}

impl FieldId {
    pub const fn label(self) -> &'static str {
        match self {
            Self::TitleId => "Title ID",
            Self::BuildIds => "Build ID",
            Self::CoreName => "Core",
            Self::Identifier => "Identifier",
            Self::Document => "Document",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub field: FieldId,
    pub severity: Severity,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl Issue {
    pub fn blocking(field: FieldId, message: impl Into<String>) -> Self {
        Self {
            field,
            severity: Severity::Blocking,
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn advisory(field: FieldId, message: impl Into<String>) -> Self {
        Self {
            field,
            severity: Severity::Advisory,
            message: message.into(),
            suggestion: None,
        }
    }

    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn is_blocking(&self) -> bool {
        self.severity == Severity::Blocking
    }
}

/// Every issue found for one set of fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Validation {
    pub issues: Vec<Issue>,
}

impl Validation {
    pub fn push(&mut self, issue: Issue) {
        self.issues.push(issue);
    }

    /// No issues of either kind.
    pub fn is_clear(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn has_blocking(&self) -> bool {
        self.issues.iter().any(Issue::is_blocking)
    }

    pub fn blocking(&self) -> Vec<Issue> {
        self.issues.iter().filter(|i| i.is_blocking()).cloned().collect()
    }

    pub fn advisories(&self) -> Vec<Issue> {
        self.issues.iter().filter(|i| !i.is_blocking()).cloned().collect()
    }
}

const TITLE_ID_LEN: usize = 16;
const BUILD_ID_LENS: [usize; 2] = [16, 32];

/// Classify `fields` for `profile`. Never fails and never touches disk.
pub fn validate(profile: &Profile, fields: &ExportFields, prefs: &Preferences) -> Validation {
    let mut v = Validation::default();
    match profile.kind {
        ProfileKind::Switch => check_switch(fields, &mut v),
        ProfileKind::Retroarch => check_retroarch(fields, prefs, &mut v),
        ProfileKind::Generic | ProfileKind::Singlefile | ProfileKind::Modded => {
            check_declared(profile, fields, &mut v);
        }
    }
    check_identifier_format(profile, fields, &mut v);
    debug!(
        profile = %profile.id,
        blocking = v.blocking().len(),
        advisories = v.advisories().len(),
        "Validated fields"
    );
    v
}

fn check_switch(fields: &ExportFields, v: &mut Validation) {
    match fields.title_id() {
        None => v.push(
            Issue::blocking(FieldId::TitleId, "Title ID is required")
                .with_suggestion("Enter the 16-character Title ID (e.g. 0100ABCDEF123456)"),
        ),
        Some(tid) => {
            let cleaned: String = tid.chars().filter(|c| !c.is_whitespace()).collect();
            let hex = clean_hex(&cleaned);
            if hex.is_empty() {
                v.push(
                    Issue::blocking(
                        FieldId::TitleId,
                        format!("Title ID '{tid}' has no hex digits"),
                    )
                    .with_suggestion("Enter the 16-character Title ID (e.g. 0100ABCDEF123456)"),
                );
            } else if hex.len() != TITLE_ID_LEN || hex.len() != cleaned.len() {
                v.push(Issue::advisory(
                    FieldId::TitleId,
                    format!("Title ID '{tid}' is not {TITLE_ID_LEN} hex characters"),
                ));
            }
        }
    }

    let bids = fields.build_id_list();
    if bids.is_empty() {
        v.push(
            Issue::blocking(FieldId::BuildIds, "At least one Build ID is required")
                .with_suggestion("Enter one or more Build IDs separated by commas or new lines"),
        );
        return;
    }
    if bids.iter().all(|bid| clean_hex(bid).is_empty()) {
        v.push(
            Issue::blocking(
                FieldId::BuildIds,
                format!("No usable Build ID among: {}", bids.join(", ")),
            )
            .with_suggestion("Build IDs are hex strings, usually 16 or 32 characters long"),
        );
        return;
    }
    let odd: Vec<&str> = bids
        .iter()
        .copied()
        .filter(|bid| {
            let hex = clean_hex(bid);
            hex.len() != bid.len() || !BUILD_ID_LENS.contains(&hex.len())
        })
        .collect();
    if !odd.is_empty() {
        v.push(Issue::advisory(
            FieldId::BuildIds,
            format!(
                "Build ID(s) not 16 or 32 hex characters: {}",
                odd.join(", ")
            ),
        ));
    }
}

fn check_retroarch(fields: &ExportFields, prefs: &Preferences, v: &mut Validation) {
    let core = fields
        .core_name()
        .or_else(|| Some(prefs.retroarch_core.trim()).filter(|c| !c.is_empty()));
    if core.is_none() {
        v.push(
            Issue::blocking(FieldId::CoreName, "A RetroArch core is required")
                .with_suggestion(format!("Pick a core or use \"{DEFAULT_CORE_LABEL}\"")),
        );
    }
    if fields.identifier().is_none() && fields.cheat_name().is_none() {
        v.push(
            Issue::blocking(FieldId::Identifier, "A game name is required for the .cht file")
                .with_suggestion("Enter the game name or start the document with a heading"),
        );
    }
}

/// Fields named by placeholders in the profile's templates must be set.
fn check_declared(profile: &Profile, fields: &ExportFields, v: &mut Validation) {
    let fixed = profile.kind == ProfileKind::Singlefile
        && profile
            .fixed_filename
            .as_deref()
            .is_some_and(|f| !f.trim().is_empty());
    let mut templates = vec![profile.subdir.as_str()];
    if !fixed {
        templates.push(profile.filename_hint.as_str());
    }
    let mut required: Vec<Placeholder> = templates
        .iter()
        .flat_map(|t| placeholders_in(t))
        .collect();
    if !fixed && profile.filename_hint.trim().is_empty() {
        required.push(Placeholder::Identifier);
    }
    required.dedup();

    let mut reported: Vec<FieldId> = Vec::new();
    for placeholder in required {
        let (field, present) = match placeholder {
            Placeholder::TitleId => (FieldId::TitleId, fields.title_id().is_some()),
            Placeholder::BuildId => (FieldId::BuildIds, !fields.build_id_list().is_empty()),
            Placeholder::CoreName => (FieldId::CoreName, fields.core_name().is_some()),
            Placeholder::CheatName | Placeholder::Identifier => (
                FieldId::Identifier,
                fields.identifier().is_some() || fields.cheat_name().is_some(),
            ),
        };
        if present || reported.contains(&field) {
            continue;
        }
        reported.push(field);
        v.push(Issue::blocking(
            field,
            format!("{} is required for {}", field.label(), profile.name),
        ));
    }
}

fn check_identifier_format(profile: &Profile, fields: &ExportFields, v: &mut Validation) {
    let Some(format) = &profile.identifier_format else {
        return;
    };
    let label = format.label.as_deref().unwrap_or("Identifier");
    let Some(raw) = fields.identifier() else {
        if !v.issues.iter().any(|i| i.field == FieldId::Identifier) {
            v.push(Issue::advisory(
                FieldId::Identifier,
                format!("No {label} entered (e.g. {})", format.example),
            ));
        }
        return;
    };
    let normalized: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase();
    match Regex::new(&format.pattern) {
        Ok(re) if !re.is_match(&normalized) => v.push(Issue::advisory(
            FieldId::Identifier,
            format!("{label} '{raw}' does not look like {}", format.example),
        )),
        Ok(_) => {}
        Err(e) => warn!(profile = %profile.id, error = %e, "Invalid identifier pattern"),
    }
}
