//! Starter template selection and insertion.

use serde::{Deserialize, Serialize};

use super::schema::{Profile, Template};
use crate::config::Preferences;

/// How a template is combined with the current document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplyMode {
    #[default]
    Replace,
    Append,
}

/// Pick the starter template for `profile`.
///
/// The user's saved choice wins if it still exists, then the profile's
/// declared default, then the first template.
pub fn default_template<'a>(profile: &'a Profile, prefs: &Preferences) -> Option<&'a Template> {
    prefs
        .templates_default
        .get(&profile.id)
        .and_then(|id| profile.template(id))
        .or_else(|| {
            profile
                .default_template_id
                .as_deref()
                .and_then(|id| profile.template(id))
        })
        .or_else(|| profile.templates.first())
}

/// Combine `content` with `document`.
pub fn apply_template(document: &str, content: &str, mode: ApplyMode) -> String {
    if document.is_empty() {
        return content.to_string();
    }
    let mut out = match mode {
        ApplyMode::Replace => String::new(),
        ApplyMode::Append => {
            let mut doc = document.to_string();
            if !doc.ends_with('\n') {
                doc.push('\n');
            }
            doc
        }
    };
    out.push_str(content);
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}
