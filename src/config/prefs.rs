//! User preferences: export root, per-profile overrides, template defaults,
//! RetroArch core list, and user-defined profiles.
//!
//! Preferences are read once and passed by reference into the core. Nothing
//! here writes to disk except [`Preferences::save`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::config::format::ConfigFormat;
use crate::config::path::default_export_root;
use crate::error::{CxError, Result};
use crate::profile::{Profile, ProfileKind, custom_id};

/// Core label meaning "no core subfolder".
pub const DEFAULT_CORE_LABEL: &str = "Default (no subfolder)";

/// Stock RetroArch cores offered to the user.
pub const DEFAULT_RETROARCH_CORES: &[&str] = &[
    DEFAULT_CORE_LABEL,
    "mGBA",
    "VBA-M",
    "Gambatte",
    "SameBoy",
    "DeSmuME",
    "Mesen",
    "Nestopia UE",
    "FCEUmm",
    "Snes9x",
    "Snes9x 2010",
    "Mupen64Plus-Next",
    "ParaLLEl N64",
    "Genesis Plus GX",
    "PicoDrive",
    "PCSX ReARMed",
    "Beetle PSX",
    "Beetle PSX HW",
    "FinalBurn Neo",
    "MAME 2003-Plus",
    "Flycast",
];

/// Ordering used when listing profiles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileSort {
    /// Catalog order: built-ins first, then user profiles.
    #[default]
    Default,
    /// Case-insensitive alphabetical by name.
    #[serde(alias = "a-z", alias = "alphabetical", alias = "alpha")]
    Az,
}

/// A user-defined profile as stored in preferences, keyed by its name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomProfile {
    #[serde(default)]
    pub subdir: String,
    #[serde(default)]
    pub filename_hint: String,
    #[serde(default)]
    pub extensions: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,
    #[serde(default)]
    pub kind: ProfileKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_filename: Option<String>,
}

impl CustomProfile {
    /// Parse a comma separated extension list the way users type it.
    ///
    /// Blank entries are dropped, a leading dot is added, and an empty list
    /// becomes `[".txt"]`.
    pub fn parse_extensions(raw: &str) -> Vec<String> {
        let exts: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(|e| {
                if e.starts_with('.') {
                    e.to_string()
                } else {
                    format!(".{e}")
                }
            })
            .collect();
        if exts.is_empty() {
            vec![".txt".to_string()]
        } else {
            exts
        }
    }
}

/// Persisted user preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    /// Primary export root.
    #[serde(default = "default_export_root")]
    pub export_root: PathBuf,

    /// Profile id -> preferred starter template id.
    #[serde(default)]
    pub templates_default: BTreeMap<String, String>,

    /// Ordered list of known RetroArch cores.
    #[serde(default = "default_cores")]
    pub retroarch_cores: Vec<String>,

    /// Core used when a plan does not name one.
    #[serde(default = "default_core")]
    pub retroarch_core: String,

    /// Profile id -> export root override.
    #[serde(default)]
    pub emulator_paths: BTreeMap<String, String>,

    /// Profile name -> user-defined profile.
    #[serde(default)]
    pub custom_profiles: BTreeMap<String, CustomProfile>,

    #[serde(default)]
    pub profile_sort: ProfileSort,

    /// Keys written by other front ends, kept as-is on save.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

fn default_cores() -> Vec<String> {
    DEFAULT_RETROARCH_CORES
        .iter()
        .map(|c| (*c).to_string())
        .collect()
}

fn default_core() -> String {
    DEFAULT_CORE_LABEL.to_string()
}

impl Default for Preferences {
    fn default() -> Self {
        Self::with_export_root(default_export_root())
    }
}

impl Preferences {
    /// Default preferences with a specific export root.
    pub fn with_export_root(root: impl Into<PathBuf>) -> Self {
        Self {
            export_root: root.into(),
            templates_default: BTreeMap::new(),
            retroarch_cores: default_cores(),
            retroarch_core: default_core(),
            emulator_paths: BTreeMap::new(),
            custom_profiles: BTreeMap::new(),
            profile_sort: ProfileSort::Default,
            extra: BTreeMap::new(),
        }
    }

    /// Load preferences from `path`.
    ///
    /// A missing file yields defaults; the file is not created.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("Preferences file missing, using defaults");
            return Ok(Self::default());
        }
        let format = ConfigFormat::for_path(path)?;
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content, format)
    }

    /// Parse preferences from a string and normalize them.
    pub fn from_str(content: &str, format: ConfigFormat) -> Result<Self> {
        let mut prefs: Self = if content.trim().is_empty() {
            Self::default()
        } else {
            format.parse(content).map_err(CxError::Prefs)?
        };
        prefs.normalize_cores();
        debug!(
            custom_profiles = prefs.custom_profiles.len(),
            overrides = prefs.emulator_paths.len(),
            "Preferences loaded"
        );
        Ok(prefs)
    }

    /// Save preferences to `path`, creating parent directories.
    #[instrument(skip(self), fields(path = %path.display()))]
    pub fn save(&self, path: &Path) -> Result<()> {
        let format = ConfigFormat::for_path(path)?;
        let content = format.render(self)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        info!("Preferences saved");
        Ok(())
    }

    /// Merge the stock core list into the saved one.
    ///
    /// The default label comes first, then the user's order, then any stock
    /// cores not yet present. Blanks and case-insensitive duplicates are
    /// dropped. An unknown selected core falls back to the default label.
    pub fn normalize_cores(&mut self) {
        let mut merged: Vec<String> = vec![DEFAULT_CORE_LABEL.to_string()];
        let mut seen: Vec<String> = vec![DEFAULT_CORE_LABEL.to_lowercase()];
        let candidates = self
            .retroarch_cores
            .iter()
            .map(String::as_str)
            .chain(DEFAULT_RETROARCH_CORES.iter().copied());
        for core in candidates {
            let core = core.trim();
            if core.is_empty() {
                continue;
            }
            let key = core.to_lowercase();
            if seen.contains(&key) {
                continue;
            }
            seen.push(key);
            merged.push(core.to_string());
        }
        self.retroarch_cores = merged;

        let current = self.retroarch_core.trim().to_lowercase();
        if current.is_empty() || !seen.contains(&current) {
            self.retroarch_core = DEFAULT_CORE_LABEL.to_string();
        }
    }

    /// Export root override configured for a profile id, if any.
    pub fn override_for(&self, profile_id: &str) -> Option<PathBuf> {
        self.emulator_paths
            .get(profile_id)
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .map(crate::config::path::expand_tilde)
    }

    /// Store an export root override for `profile`.
    pub fn set_override(&mut self, profile: &Profile, path: &str) -> Result<()> {
        if profile.pin_export_root {
            return Err(CxError::OverridePinned {
                profile: profile.name.clone(),
            });
        }
        self.emulator_paths
            .insert(profile.id.clone(), path.trim().to_string());
        Ok(())
    }

    /// Remove an override; returns whether one existed.
    pub fn clear_override(&mut self, profile_id: &str) -> bool {
        self.emulator_paths.remove(profile_id).is_some()
    }

    /// Remember `template_id` as the default starter template for `profile`.
    pub fn set_default_template(&mut self, profile: &Profile, template_id: &str) -> Result<()> {
        if profile.template(template_id).is_none() {
            return Err(CxError::TemplateNotFound {
                profile: profile.name.clone(),
                template: template_id.to_string(),
            });
        }
        self.templates_default
            .insert(profile.id.clone(), template_id.to_string());
        Ok(())
    }

    /// Forget the saved default template for one profile.
    pub fn reset_default_template(&mut self, profile_id: &str) -> bool {
        self.templates_default.remove(profile_id).is_some()
    }

    /// Forget every saved default template; returns how many were removed.
    pub fn reset_all_default_templates(&mut self) -> usize {
        let count = self.templates_default.len();
        self.templates_default.clear();
        count
    }

    /// Select the default core. Unknown cores are added to the list first.
    pub fn set_core(&mut self, core: &str) {
        let core = core.trim();
        if core.is_empty() {
            return;
        }
        if !self.has_core(core) {
            self.retroarch_cores.push(core.to_string());
        }
        self.retroarch_core = self
            .retroarch_cores
            .iter()
            .find(|c| c.eq_ignore_ascii_case(core))
            .cloned()
            .unwrap_or_else(|| core.to_string());
    }

    /// Add a core to the list; returns false if it was already present.
    pub fn add_core(&mut self, core: &str) -> bool {
        let core = core.trim();
        if core.is_empty() || self.has_core(core) {
            return false;
        }
        self.retroarch_cores.push(core.to_string());
        true
    }

    /// Remove a core; the default label is never removed.
    pub fn remove_core(&mut self, core: &str) -> bool {
        let core = core.trim();
        if core.eq_ignore_ascii_case(DEFAULT_CORE_LABEL) {
            return false;
        }
        let before = self.retroarch_cores.len();
        self.retroarch_cores.retain(|c| !c.eq_ignore_ascii_case(core));
        let removed = self.retroarch_cores.len() != before;
        if removed && self.retroarch_core.eq_ignore_ascii_case(core) {
            self.retroarch_core = DEFAULT_CORE_LABEL.to_string();
        }
        removed
    }

    fn has_core(&self, core: &str) -> bool {
        self.retroarch_cores
            .iter()
            .any(|c| c.eq_ignore_ascii_case(core))
    }

    /// Insert or replace a custom profile after checking the reserved names.
    pub fn upsert_custom_profile(
        &mut self,
        name: &str,
        profile: CustomProfile,
        reserved_names: &[&str],
    ) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CxError::Other("Profile name is required".to_string()));
        }
        if reserved_names.contains(&name) {
            return Err(CxError::NameConflict {
                name: name.to_string(),
            });
        }
        let id = custom_id(name);
        if self
            .custom_profiles
            .keys()
            .any(|existing| existing != name && custom_id(existing) == id)
        {
            return Err(CxError::NameConflict {
                name: name.to_string(),
            });
        }
        if self.custom_profiles.contains_key(name) {
            warn!(name, "Replacing existing custom profile");
        }
        self.custom_profiles.insert(name.to_string(), profile);
        Ok(())
    }

    /// Remove a custom profile by name.
    pub fn remove_custom_profile(&mut self, name: &str) -> bool {
        self.custom_profiles.remove(name.trim()).is_some()
    }
}
