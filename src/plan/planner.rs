//! Export path planning and materialization.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, instrument};

use super::fields::ExportFields;
use super::placeholder::{Placeholder, substitute};
use super::sanitize::{clean_hex, safe_filename, sanitize_fragment, sanitize_root, sanitize_subdir};
use crate::config::path::expand_tilde;
use crate::config::{DEFAULT_CORE_LABEL, Preferences};
use crate::error::{CxError, Result};
use crate::profile::{Profile, ProfileKind, normalize_extension};

/// File stem used when nothing else is available.
pub const FALLBACK_STEM: &str = "cheats";

/// Where an export will be written. Computing one has no side effects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportPlan {
    pub profile_id: String,
    pub kind: ProfileKind,
    pub root: PathBuf,
    pub out_dir: PathBuf,
    pub files: Vec<PathBuf>,
    pub extension: String,
}

/// Resolves profiles and field values into [`ExportPlan`]s.
#[derive(Debug, Clone, Copy)]
pub struct PathPlanner<'a> {
    prefs: &'a Preferences,
}

impl<'a> PathPlanner<'a> {
    pub const fn new(prefs: &'a Preferences) -> Self {
        Self { prefs }
    }

    /// Export root for `profile`: the pinned profile ignores every override.
    pub fn root_for(&self, profile: &Profile, fields: &ExportFields) -> PathBuf {
        let root = if profile.pin_export_root {
            self.prefs.export_root.clone()
        } else {
            fields
                .root_override()
                .map(expand_tilde)
                .or_else(|| self.prefs.override_for(&profile.id))
                .unwrap_or_else(|| self.prefs.export_root.clone())
        };
        sanitize_root(&root)
    }

    /// Build the plan. Pure: no directories are created.
    #[instrument(level = "debug", skip_all, fields(profile = %profile.id, kind = %profile.kind))]
    pub fn resolve(&self, profile: &Profile, fields: &ExportFields) -> ExportPlan {
        let root = self.root_for(profile, fields);
        let extension = fields
            .extension()
            .map(normalize_extension)
            .unwrap_or_else(|| profile.output_extension());
        let values = Values::new(profile, fields, self.prefs);

        let subdir = if profile.subdir.trim().is_empty() {
            sanitize_fragment(&profile.name)
        } else {
            values.apply(&profile.subdir, None)
        };
        let out_dir = root.join(sanitize_subdir(&subdir));

        let files = match profile.kind {
            ProfileKind::Switch => switch_files(profile, &values, &out_dir, &extension),
            ProfileKind::Retroarch => {
                let hint = non_blank(&profile.filename_hint).unwrap_or("<Game>");
                vec![out_dir.join(stem_file(&values.apply(hint, None), &extension))]
            }
            ProfileKind::Singlefile => match profile.fixed_filename.as_deref().and_then(non_blank) {
                Some(fixed) => vec![out_dir.join(safe_filename(fixed, FALLBACK_STEM))],
                None => vec![out_dir.join(generic_file(profile, &values, &extension))],
            },
            ProfileKind::Generic | ProfileKind::Modded => {
                vec![out_dir.join(generic_file(profile, &values, &extension))]
            }
        };

        debug!(out_dir = %out_dir.display(), files = files.len(), "Resolved export plan");
        ExportPlan {
            profile_id: profile.id.clone(),
            kind: profile.kind,
            root,
            out_dir,
            files,
            extension,
        }
    }
}

fn non_blank(s: &str) -> Option<&str> {
    Some(s.trim()).filter(|s| !s.is_empty())
}

fn stem_file(stem: &str, extension: &str) -> String {
    format!("{}{extension}", safe_filename(stem, FALLBACK_STEM))
}

fn switch_files(profile: &Profile, values: &Values, out_dir: &Path, extension: &str) -> Vec<PathBuf> {
    let hint = non_blank(&profile.filename_hint).unwrap_or("<BID>");
    if values.build_ids.is_empty() {
        return vec![out_dir.join(stem_file(&values.apply(hint, None), extension))];
    }
    values
        .build_ids
        .iter()
        .map(|bid| out_dir.join(stem_file(&values.apply(hint, Some(bid)), extension)))
        .collect()
}

fn generic_file(profile: &Profile, values: &Values, extension: &str) -> String {
    let stem = match non_blank(&profile.filename_hint) {
        Some(hint) => values.apply(hint, None),
        None => values
            .identifier
            .clone()
            .unwrap_or_else(|| FALLBACK_STEM.to_string()),
    };
    stem_file(&stem, extension)
}

/// Sanitized placeholder values for one resolution.
struct Values {
    title_id: Option<String>,
    build_ids: Vec<String>,
    core: Option<String>,
    cheat_name: Option<String>,
    identifier: Option<String>,
}

impl Values {
    fn new(profile: &Profile, fields: &ExportFields, prefs: &Preferences) -> Self {
        let safe = |v: &str| Some(sanitize_fragment(v)).filter(|s| !s.is_empty());

        let title_id = fields.title_id().map(clean_hex).filter(|s| !s.is_empty());

        let mut build_ids: Vec<String> = Vec::new();
        for bid in fields.build_id_list().into_iter().map(clean_hex) {
            if !bid.is_empty() && !build_ids.contains(&bid) {
                build_ids.push(bid);
            }
        }

        let core = match profile.kind {
            ProfileKind::Retroarch => {
                let label = fields.core_name().unwrap_or(prefs.retroarch_core.trim());
                if label.is_empty() || label.eq_ignore_ascii_case(DEFAULT_CORE_LABEL) {
                    Some(String::new())
                } else {
                    safe(label)
                }
            }
            _ => fields.core_name().and_then(safe),
        };

        let cheat_name = fields.cheat_name().and_then(safe);
        let identifier = fields.identifier().and_then(safe);
        Self {
            title_id,
            build_ids,
            core,
            cheat_name: cheat_name.clone().or_else(|| identifier.clone()),
            identifier: identifier.or(cheat_name),
        }
    }

    fn apply(&self, template: &str, build_id: Option<&str>) -> String {
        substitute(template, |p| match p {
            Placeholder::TitleId => self.title_id.clone(),
            Placeholder::BuildId => build_id
                .map(str::to_string)
                .or_else(|| self.build_ids.first().cloned()),
            Placeholder::CoreName => self.core.clone(),
            Placeholder::CheatName => self.cheat_name.clone(),
            Placeholder::Identifier => self.identifier.clone(),
        })
    }
}

/// Create directories and write `content` to every planned file.
///
/// Stops at the first failure. Files written before it stay on disk and are
/// listed in the error.
#[instrument(skip_all, fields(profile = %plan.profile_id, files = plan.files.len()))]
pub fn materialize(plan: &ExportPlan, content: &str) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(plan.files.len());
    for path in &plan.files {
        let result = match path.parent() {
            Some(parent) => std::fs::create_dir_all(parent),
            None => Ok(()),
        }
        .and_then(|()| std::fs::write(path, content));
        if let Err(source) = result {
            return Err(CxError::Materialize {
                path: path.clone(),
                written,
                source,
            });
        }
        debug!(path = %path.display(), "Wrote file");
        written.push(path.clone());
    }
    info!(count = written.len(), "Export written");
    Ok(written)
}
