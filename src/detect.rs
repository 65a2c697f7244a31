//! Best-effort field inference from an existing cheat file's path and text.
//!
//! Nothing here fails: unknown layouts simply yield fewer fields.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::plan::ExportFields;
use crate::plan::sanitize::clean_hex;
use crate::profile::{PINNED_PROFILE_ID, ProfileRegistry};

/// Lines of the document searched for `TID=`/`BID=` headers.
const HEADER_SCAN_LINES: usize = 50;

static HEADER_TID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:\bTID\b|\bTITLEID\b)\s*[:=]\s*([0-9A-F]{16})\b").expect("valid TID regex")
});
static HEADER_BID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:\bBID\b|\bBUILDID\b)\s*[:=]\s*([0-9A-F]{32}|[0-9A-F]{16})\b")
        .expect("valid BID regex")
});
static CORE_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-_\s]+").expect("valid core separator regex"));

/// What could be recovered from a file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Inference {
    pub profile_id: Option<String>,
    pub title_id: Option<String>,
    pub build_id: Option<String>,
    /// A configured core matching the folder under `cheats/`.
    pub core_name: Option<String>,
    /// The raw folder under `cheats/`, reported when no core matched.
    pub core_folder: Option<String>,
    pub identifier: Option<String>,
    /// Human-readable notes about what was detected.
    pub hints: Vec<String>,
}

impl Inference {
    /// Recovered values as export fields.
    pub fn to_fields(&self) -> ExportFields {
        ExportFields {
            title_id: self.title_id.clone(),
            build_ids: self.build_id.clone(),
            core_name: self.core_name.clone(),
            identifier: self.identifier.clone(),
            ..ExportFields::default()
        }
    }

    fn suggest(&mut self, registry: &ProfileRegistry, id: &str, why: &str) {
        if registry.find_by_id(id).is_some() {
            self.profile_id = Some(id.to_string());
            self.hints.push(format!("{why}: {id}"));
        }
    }
}

fn norm_core(raw: &str) -> String {
    CORE_SEPARATORS
        .replace_all(raw.trim(), " ")
        .trim()
        .to_lowercase()
}

fn valid_bid(hex: &str) -> bool {
    hex.len() == 16 || hex.len() == 32
}

/// Segment right after `marker` in the lowercased path.
fn segment_after<'a>(lower: &'a str, marker: &str) -> Option<&'a str> {
    let (_, rest) = lower.rsplit_once(marker)?;
    rest.split('/').next()
}

/// Infer profile and field values for `path` with contents `text`.
pub fn infer_fields(path: &Path, text: &str, registry: &ProfileRegistry, cores: &[String]) -> Inference {
    let mut inf = Inference::default();
    let raw = path.to_string_lossy().replace('\\', "/");
    let lower = raw.to_lowercase();
    let name = raw.rsplit('/').next().unwrap_or_default();
    let file_name = name.to_lowercase();
    let stem = name.rsplit_once('.').map_or(name, |(stem, _)| stem);
    let stem_hex = clean_hex(stem);

    if let Some(profile) = registry.detect_by_filename(Path::new(name)) {
        inf.profile_id = Some(profile.id.clone());
        inf.hints.push(format!("Extension matches {}", profile.name));
    }

    detect_core(&raw, &lower, cores, &mut inf);

    let switch_layouts: [(&str, Option<&str>); 3] = [
        ("/atmosphere/contents/", Some(PINNED_PROFILE_ID)),
        ("/load/", None),
        ("/mods/contents/", Some("ryujinx")),
    ];
    for (marker, profile) in switch_layouts {
        if !(lower.contains(marker) && lower.contains("/cheats/")) {
            continue;
        }
        if let Some(tid) = segment_after(&lower, marker).map(clean_hex) {
            if tid.len() == 16 {
                inf.title_id = Some(tid);
            }
        }
        if valid_bid(&stem_hex) {
            inf.build_id = Some(stem_hex.clone());
        }
        let profile = profile.or_else(|| {
            ["yuzu", "sudachi", "suyu"]
                .into_iter()
                .find(|emu| lower.contains(&format!("/{emu}/")))
        });
        if let Some(id) = profile {
            inf.suggest(registry, id, "Switch cheat layout");
        }
    }

    let have_ids = inf.title_id.is_some() && inf.build_id.as_deref().is_some_and(valid_bid);
    if !have_ids {
        scan_header(text, registry, &mut inf);
    }

    let hints: [(bool, &str); 6] = [
        (file_name.ends_with(".pnach"), "pcsx2"),
        (lower.contains("/gamesettings/") && file_name.ends_with(".ini"), "dolphin"),
        (lower.contains("/psp/cheats/") && file_name.ends_with(".ini"), "ppsspp"),
        (
            lower.contains("/duckstation/") && lower.contains("/cheats/") && file_name.ends_with(".cht"),
            "duckstation",
        ),
        (lower.contains("/patches/") && file_name.ends_with(".patch.toml"), "xenia"),
        (file_name == "patch.yml" || file_name == "patch.yaml", "rpcs3"),
    ];
    for (matched, id) in hints {
        if matched {
            inf.suggest(registry, id, "Folder layout suggests");
        }
    }

    inf.identifier = Some(suggest_identifier(name, stem, registry, inf.profile_id.as_deref()));
    debug!(path = %path.display(), profile = ?inf.profile_id, "Inferred fields");
    inf
}

/// RetroArch `.../cheats/<core>/<game>` layout.
fn detect_core(raw: &str, lower: &str, cores: &[String], inf: &mut Inference) {
    let raw_parts: Vec<&str> = raw.split('/').collect();
    let lower_parts: Vec<&str> = lower.split('/').collect();
    let Some(i) = lower_parts.iter().rposition(|p| *p == "cheats") else {
        return;
    };
    // The segment after `cheats` must be a folder, not the file itself.
    if i + 2 >= raw_parts.len() {
        return;
    }
    let folder = raw_parts[i + 1].trim();
    if folder.is_empty() {
        return;
    }
    let want = norm_core(folder);
    match cores.iter().find(|c| norm_core(c) == want) {
        Some(core) => {
            inf.core_name = Some(core.clone());
            inf.hints.push(format!("Detected RetroArch core: {core}"));
        }
        None => {
            inf.core_folder = Some(folder.to_string());
            inf.hints.push(format!(
                "Detected RetroArch core folder '{folder}', but it isn't in your core list"
            ));
        }
    }
}

/// `TID=`/`BID=` lines near the top of downloaded cheat text.
fn scan_header(text: &str, registry: &ProfileRegistry, inf: &mut Inference) {
    let head = text
        .lines()
        .take(HEADER_SCAN_LINES)
        .collect::<Vec<_>>()
        .join("\n");
    if inf.title_id.is_none() {
        if let Some(caps) = HEADER_TID.captures(&head) {
            inf.title_id = Some(clean_hex(&caps[1]));
        }
    }
    if !inf.build_id.as_deref().is_some_and(valid_bid) {
        if let Some(caps) = HEADER_BID.captures(&head) {
            inf.build_id = Some(clean_hex(&caps[1]));
        }
    }
    if inf.title_id.is_some() {
        inf.suggest(registry, PINNED_PROFILE_ID, "Title ID found in text");
    }
}

/// File name without the profile's extension, else without its last
/// extension, else `cheats`.
fn suggest_identifier(name: &str, stem: &str, registry: &ProfileRegistry, profile_id: Option<&str>) -> String {
    let base = profile_id
        .and_then(|id| registry.find_by_id(id))
        .and_then(|p| p.matching_extension(name).map(str::len))
        .and_then(|len| name.get(..name.len() - len))
        .unwrap_or(stem)
        .trim();
    if base.is_empty() {
        "cheats".to_string()
    } else {
        base.to_string()
    }
}
