//! Integration tests for profile catalogs and the session registry.

use std::path::Path;

use cheatx::config::{CustomProfile, Preferences, ProfileSort};
use cheatx::profile::{ProfileKind, ProfileOrigin, ProfileRegistry};
use tempfile::TempDir;

const YAML_CATALOG: &str = r#"
profiles:
  - id: dolphin
    name: Dolphin (portable)
    kind: generic
    extensions: [".ini"]
    default_extension: ".ini"
    subdir: User/GameSettings
    filename_hint: "<GameID>"
  - id: mame
    name: MAME
    extensions:
      - extension: ".dat"
        label: MAME cheat
    default_extension: ".dat"
    subdir: MAME/cheat
"#;

const TOML_CATALOG: &str = r#"
[[profiles]]
id = "flycast"
name = "Flycast"
kind = "singlefile"
extensions = [".cht"]
default_extension = ".cht"
subdir = "Flycast"
fixed_filename = "cheats.cht"
"#;

fn write(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn yaml_catalog_replaces_and_extends_builtins() {
    let dir = TempDir::new().unwrap();
    let path = write(dir.path(), "profiles.yaml", YAML_CATALOG);
    let registry = ProfileRegistry::try_load_session(Some(&path), &Preferences::default()).unwrap();

    assert_eq!(registry.len(), ProfileRegistry::builtin().len() + 1);
    let dolphin = registry.find("dolphin").unwrap();
    assert_eq!(dolphin.name, "Dolphin (portable)");
    assert_eq!(dolphin.origin, ProfileOrigin::Catalog);
    assert_eq!(registry.profiles().last().map(|p| p.id.as_str()), Some("mame"));
}

#[test]
fn toml_catalog_is_accepted() {
    let dir = TempDir::new().unwrap();
    let path = write(dir.path(), "profiles.toml", TOML_CATALOG);
    let registry = ProfileRegistry::load(&path).unwrap();

    let flycast = registry.find("Flycast").unwrap();
    assert_eq!(flycast.kind, ProfileKind::Singlefile);
    assert_eq!(flycast.fixed_filename.as_deref(), Some("cheats.cht"));
}

#[test]
fn broken_catalog_empties_the_session() {
    let dir = TempDir::new().unwrap();
    let path = write(
        dir.path(),
        "profiles.json",
        r#"{"profiles": [{"id": "x", "name": "X", "extensions": [".txt"]}]}"#,
    );
    let prefs = Preferences::default();

    let err = ProfileRegistry::try_load_session(Some(&path), &prefs).unwrap_err();
    assert_eq!(err.kind(), "config");
    assert!(err.to_string().contains("default_extension"), "{err}");
    assert!(ProfileRegistry::load_session(Some(&path), &prefs).is_empty());
}

#[test]
fn missing_explicit_catalog_is_reported() {
    let dir = TempDir::new().unwrap();
    let err = ProfileRegistry::try_load_session(Some(&dir.path().join("none.json")), &Preferences::default())
        .unwrap_err();
    assert_eq!(err.kind(), "config");
}

#[test]
fn custom_profiles_join_the_session() {
    let mut prefs = Preferences::default();
    let registry = ProfileRegistry::builtin();
    prefs
        .upsert_custom_profile(
            "My Handheld",
            CustomProfile {
                subdir: "handheld/<GameID>".to_string(),
                extensions: CustomProfile::parse_extensions("cht, txt"),
                ..CustomProfile::default()
            },
            &registry.builtin_names(),
        )
        .unwrap();

    let session = ProfileRegistry::load_session(None, &prefs);
    let custom = session.find("My Handheld").unwrap();
    assert_eq!(custom.id, "custom-my-handheld");
    assert!(custom.is_custom());
    assert_eq!(custom.default_extension, ".cht");
    assert_eq!(session.find("custom-my-handheld").unwrap().name, "My Handheld");
}

#[test]
fn custom_profile_cannot_take_a_builtin_name() {
    let mut prefs = Preferences::default();
    let registry = ProfileRegistry::builtin();
    let err = prefs
        .upsert_custom_profile(
            "RetroArch (Multi-platform)",
            CustomProfile::default(),
            &registry.builtin_names(),
        )
        .unwrap_err();
    assert_eq!(err.kind(), "profile");
    assert!(prefs.custom_profiles.is_empty());
}

#[test]
fn sorting_by_name_is_case_insensitive() {
    let registry = ProfileRegistry::builtin();
    let names: Vec<String> = registry
        .sorted(ProfileSort::Az)
        .iter()
        .map(|p| p.name.to_lowercase())
        .collect();
    let mut expected = names.clone();
    expected.sort();
    assert_eq!(names, expected);
    assert_eq!(registry.sorted(ProfileSort::Default)[0].id, "atmosphere");
}

#[test]
fn file_names_map_to_profiles() {
    let registry = ProfileRegistry::builtin();
    let detect = |name: &str| {
        registry
            .detect_by_filename(Path::new(name))
            .map(|p| p.id.clone())
    };
    assert_eq!(detect("Super Metroid.cht").as_deref(), Some("retroarch"));
    assert_eq!(detect("GMSE01.ini").as_deref(), Some("dolphin"));
    assert_eq!(detect("SLUS-00001.pnach").as_deref(), Some("pcsx2"));
    assert_eq!(detect("readme.md"), None);
}
