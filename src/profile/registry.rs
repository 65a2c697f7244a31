//! Session profile registry: built-in catalog, user catalog, and custom
//! profiles from preferences.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};

use super::schema::{Extension, Profile, ProfileOrigin, normalize_extension};
use crate::config::prefs::{CustomProfile, ProfileSort};
use crate::config::{ConfigFormat, Preferences, default_catalog_path};
use crate::error::{CxError, Result};

/// Catalog compiled into the binary.
pub const BUILTIN_CATALOG: &str = include_str!("builtin.json");

/// The profile that always exports to the primary export root.
pub const PINNED_PROFILE_ID: &str = "atmosphere";

/// Extensions listed first by [`ProfileRegistry::known_extensions`].
const COMMON_EXTENSIONS: &[&str] = &[
    ".txt",
    ".cht",
    ".ini",
    ".pnach",
    ".yml",
    ".yaml",
    ".json",
    ".xml",
    ".dat",
    ".patch.toml",
];

static SLUG_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("valid slug regex"));

/// Ordered set of profiles for one session.
#[derive(Debug, Clone, Default)]
pub struct ProfileRegistry {
    profiles: Vec<Profile>,
}

impl ProfileRegistry {
    /// Registry with no profiles.
    pub const fn empty() -> Self {
        Self {
            profiles: Vec::new(),
        }
    }

    /// The catalog shipped with the binary.
    pub fn builtin() -> Self {
        match Self::from_str(BUILTIN_CATALOG, ConfigFormat::Json) {
            Ok(registry) => registry,
            Err(e) => {
                error!(error = %e, "Built-in catalog rejected");
                Self::empty()
            }
        }
    }

    /// Parse and validate a catalog document.
    ///
    /// Accepts either `{"profiles": [...]}` or a bare list. Any structural
    /// problem rejects the whole catalog.
    pub fn from_str(content: &str, format: ConfigFormat) -> Result<Self> {
        let raw: Value = format.parse(content).map_err(CxError::Catalog)?;
        let entries = match raw {
            Value::Array(items) => items,
            Value::Object(mut map) => match map.remove("profiles") {
                Some(Value::Array(items)) => items,
                Some(_) => return Err(catalog_err("'profiles' must be a list")),
                None => Vec::new(),
            },
            _ => return Err(catalog_err("expected a list of profiles")),
        };
        if entries.is_empty() {
            return Err(catalog_err("catalog has no profiles"));
        }

        let mut seen = HashSet::new();
        let mut profiles = Vec::with_capacity(entries.len());
        for (index, entry) in entries.into_iter().enumerate() {
            let label = check_shape(index, &entry)?;
            let mut profile: Profile = serde_json::from_value(entry)
                .map_err(|e| catalog_err(&format!("{label}: {e}")))?;
            if let Some(fmt) = &profile.identifier_format {
                Regex::new(&fmt.pattern).map_err(|e| {
                    catalog_err(&format!("{label}: invalid identifier_format pattern: {e}"))
                })?;
            }
            if !seen.insert(profile.id.clone()) {
                return Err(catalog_err(&format!("duplicate profile id '{}'", profile.id)));
            }
            profile.default_extension = normalize_extension(&profile.default_extension);
            profiles.push(profile);
        }
        debug!(count = profiles.len(), "Catalog parsed");
        Ok(Self { profiles })
    }

    /// Load a catalog file; format follows the extension.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CxError::CatalogNotFound {
                path: path.display().to_string(),
            });
        }
        let format = ConfigFormat::for_path(path)?;
        let content = std::fs::read_to_string(path)?;
        let mut registry = Self::from_str(&content, format)?;
        for profile in &mut registry.profiles {
            profile.origin = ProfileOrigin::Catalog;
        }
        info!(count = registry.len(), "Loaded user catalog");
        Ok(registry)
    }

    /// Build the registry for a session.
    ///
    /// Built-ins first, then the user catalog (explicit path, or the default
    /// location when it exists), then custom profiles from `prefs`. A broken
    /// catalog is reported once and leaves the registry empty.
    pub fn load_session(catalog: Option<&Path>, prefs: &Preferences) -> Self {
        match Self::try_load_session(catalog, prefs) {
            Ok(registry) => registry,
            Err(e) => {
                error!(error = %e, "Profile catalog rejected; no profiles loaded");
                Self::empty()
            }
        }
    }

    /// Like [`Self::load_session`] but returns the catalog error.
    pub fn try_load_session(catalog: Option<&Path>, prefs: &Preferences) -> Result<Self> {
        let mut registry = Self::builtin();
        let user_path = match catalog {
            Some(path) => Some(path.to_path_buf()),
            None => default_catalog_path().ok().filter(|p| p.exists()),
        };
        if let Some(path) = user_path {
            registry.merge(Self::load(&path)?);
        }
        registry.add_custom_profiles(&prefs.custom_profiles);
        Ok(registry)
    }

    /// Append `other`, replacing profiles that share an id.
    pub fn merge(&mut self, other: Self) {
        for profile in other.profiles {
            match self.profiles.iter_mut().find(|p| p.id == profile.id) {
                Some(existing) => {
                    debug!(id = %profile.id, "Catalog profile replaces built-in");
                    *existing = profile;
                }
                None => self.profiles.push(profile),
            }
        }
    }

    /// Add every custom profile, skipping ones that clash with catalog names.
    pub fn add_custom_profiles(&mut self, custom: &BTreeMap<String, CustomProfile>) {
        for (name, cp) in custom {
            if let Err(e) = self.add_custom(name, cp) {
                warn!(name = %name, error = %e, "Skipping custom profile");
            }
        }
    }

    /// Add one custom profile.
    pub fn add_custom(&mut self, name: &str, custom: &CustomProfile) -> Result<()> {
        let name = name.trim();
        if self.builtin_names().contains(&name) {
            return Err(CxError::NameConflict {
                name: name.to_string(),
            });
        }
        let profile = custom_profile(name, custom);
        if let Some(existing) = self.profiles.iter().find(|p| p.id == profile.id) {
            warn!(
                id = %profile.id,
                replaced = %existing.name,
                name,
                "Custom profile id collides with an existing one; replacing"
            );
        }
        self.profiles.retain(|p| p.id != profile.id);
        self.profiles.push(profile);
        Ok(())
    }

    /// Names that custom profiles may not reuse.
    pub fn builtin_names(&self) -> Vec<&str> {
        self.profiles
            .iter()
            .filter(|p| !p.is_custom())
            .map(|p| p.name.as_str())
            .collect()
    }

    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.id == id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.name == name)
    }

    /// Lookup used by the CLI: id, then name, then either case-insensitively.
    pub fn find(&self, query: &str) -> Result<&Profile> {
        let query = query.trim();
        self.find_by_id(query)
            .or_else(|| self.find_by_name(query))
            .or_else(|| {
                self.profiles.iter().find(|p| {
                    p.id.eq_ignore_ascii_case(query) || p.name.eq_ignore_ascii_case(query)
                })
            })
            .ok_or_else(|| CxError::ProfileNotFound {
                query: query.to_string(),
            })
    }

    /// Profile whose declared extension is the longest suffix of the file
    /// name. Ties go to the earlier profile.
    pub fn detect_by_filename(&self, path: &Path) -> Option<&Profile> {
        let file_name = path.file_name()?.to_string_lossy();
        let mut best: Option<(&Profile, usize)> = None;
        for profile in &self.profiles {
            if let Some(ext) = profile.matching_extension(&file_name) {
                if best.is_none_or(|(_, len)| ext.len() > len) {
                    best = Some((profile, ext.len()));
                }
            }
        }
        best.map(|(profile, _)| profile)
    }

    /// Profiles in display order.
    pub fn sorted(&self, sort: ProfileSort) -> Vec<&Profile> {
        let mut list: Vec<&Profile> = self.profiles.iter().collect();
        if sort == ProfileSort::Az {
            list.sort_by_key(|p| p.name.to_lowercase());
        }
        list
    }

    /// Every declared extension, common ones first.
    pub fn known_extensions(&self) -> Vec<String> {
        let all: HashSet<&str> = self
            .profiles
            .iter()
            .flat_map(|p| p.extensions.iter().map(|e| e.extension.as_str()))
            .filter(|e| !e.is_empty())
            .collect();
        let mut out: Vec<String> = COMMON_EXTENSIONS
            .iter()
            .filter(|e| all.contains(*e))
            .map(|e| (*e).to_string())
            .collect();
        let mut rest: Vec<&str> = all
            .into_iter()
            .filter(|e| !COMMON_EXTENSIONS.contains(e))
            .collect();
        rest.sort_unstable();
        out.extend(rest.into_iter().map(str::to_string));
        out
    }
}

fn catalog_err(message: &str) -> CxError {
    CxError::Catalog(message.to_string())
}

/// Check the fields serde defaults would otherwise paper over. Returns a
/// label for the entry used in later messages.
fn check_shape(index: usize, entry: &Value) -> Result<String> {
    let Some(obj) = entry.as_object() else {
        return Err(catalog_err(&format!("profile #{index} is not an object")));
    };
    let text = |key: &str| {
        obj.get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    };
    let Some(id) = text("id") else {
        return Err(catalog_err(&format!("profile #{index} is missing 'id'")));
    };
    let label = format!("profile '{id}'");
    if text("name").is_none() {
        return Err(catalog_err(&format!("{label} is missing 'name'")));
    }
    match obj.get("extensions").and_then(Value::as_array) {
        Some(list) if !list.is_empty() => {
            for ext in list {
                let raw = ext
                    .as_str()
                    .or_else(|| ext.get("extension").and_then(Value::as_str))
                    .map(str::trim)
                    .unwrap_or_default();
                if raw.is_empty() || raw == "." {
                    return Err(catalog_err(&format!("{label} has a blank extension")));
                }
            }
        }
        _ => {
            return Err(catalog_err(&format!(
                "{label} needs a non-empty 'extensions' list"
            )));
        }
    }
    if text("default_extension").is_none() {
        return Err(catalog_err(&format!("{label} is missing 'default_extension'")));
    }
    if let Some(templates) = obj.get("templates") {
        if !templates.is_array() {
            return Err(catalog_err(&format!("{label}: 'templates' must be a list")));
        }
    }
    Ok(label)
}

/// `custom-<slug>` id for a user profile name.
pub fn custom_id(name: &str) -> String {
    let lower = name.trim().to_lowercase();
    let slug = SLUG_SEPARATORS.replace_all(&lower, "-");
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        "custom-profile".to_string()
    } else {
        format!("custom-{slug}")
    }
}

fn custom_profile(name: &str, custom: &CustomProfile) -> Profile {
    let mut extensions: Vec<Extension> = custom
        .extensions
        .iter()
        .map(|e| Extension::new(e))
        .filter(|e| !e.extension.is_empty() && e.extension != ".")
        .collect();
    if extensions.is_empty() {
        extensions.push(Extension::new(".txt"));
    }
    let mut profile = Profile::minimal(&custom_id(name), name, &extensions[0].extension);
    profile.kind = custom.kind;
    profile.extensions = extensions;
    profile.subdir = custom.subdir.trim().to_string();
    profile.filename_hint = custom.filename_hint.trim().to_string();
    profile.fixed_filename = custom
        .fixed_filename
        .as_deref()
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(str::to_string);
    profile.notes = Some(custom.notes.trim())
        .filter(|n| !n.is_empty())
        .map(str::to_string);
    profile.origin = ProfileOrigin::Custom;
    profile
}
