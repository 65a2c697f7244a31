//! Integration tests for preference persistence.

use cheatx::config::{
    DEFAULT_CORE_LABEL, Preferences, ProfileSort, default_export_root, default_prefs_path,
};
use cheatx::profile::ProfileRegistry;
use tempfile::TempDir;

#[test]
fn json_round_trip_keeps_foreign_keys() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested/prefs.json");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(
        &path,
        r#"{"export_root": "/sd", "window": {"w": 800}, "profile_sort": "az"}"#,
    )
    .unwrap();

    let mut prefs = Preferences::load(&path).unwrap();
    assert_eq!(prefs.profile_sort, ProfileSort::Az);
    let registry = ProfileRegistry::builtin();
    prefs
        .set_override(registry.find("dolphin").unwrap(), "/mnt/dolphin")
        .unwrap();
    prefs.save(&path).unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["window"]["w"], 800);
    assert_eq!(raw["emulator_paths"]["dolphin"], "/mnt/dolphin");

    let reloaded = Preferences::load(&path).unwrap();
    assert_eq!(reloaded, prefs);
}

#[test]
fn yaml_preferences_save_as_yaml() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("prefs.yaml");
    let mut prefs = Preferences::with_export_root(dir.path().join("sd"));
    prefs.set_core("Snes9x");
    prefs.save(&path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("retroarch_core: Snes9x"), "{text}");
    assert_eq!(Preferences::load(&path).unwrap().retroarch_core, "Snes9x");
}

#[test]
fn unknown_extension_is_rejected() {
    let dir = TempDir::new().unwrap();
    let err = Preferences::default()
        .save(&dir.path().join("prefs.ini"))
        .unwrap_err();
    assert_eq!(err.kind(), "prefs");
}

#[test]
fn saved_core_lists_are_normalized() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("prefs.json");
    std::fs::write(
        &path,
        r#"{"retroarch_cores": ["MyCore", "snes9x", "Snes9x", " "], "retroarch_core": "Gone"}"#,
    )
    .unwrap();

    let prefs = Preferences::load(&path).unwrap();
    assert_eq!(prefs.retroarch_cores[0], DEFAULT_CORE_LABEL);
    assert_eq!(prefs.retroarch_cores[1], "MyCore");
    let snes = prefs
        .retroarch_cores
        .iter()
        .filter(|c| c.eq_ignore_ascii_case("snes9x"))
        .count();
    assert_eq!(snes, 1);
    assert!(prefs.retroarch_cores.iter().all(|c| !c.trim().is_empty()));
    assert_eq!(prefs.retroarch_core, DEFAULT_CORE_LABEL);
}

#[test]
fn default_locations_follow_home() {
    let home = TempDir::new().unwrap();
    std::fs::create_dir_all(home.path().join("Documents")).unwrap();
    let home_str = home.path().to_string_lossy().into_owned();
    let _guard = env_lock::lock_env([("HOME", Some(home_str.as_str()))]);

    assert_eq!(
        default_prefs_path().unwrap(),
        home.path().join("CheatCreator/prefs.json")
    );
    if !std::path::Path::new("/storage/emulated/0").is_dir() {
        assert_eq!(
            default_export_root(),
            home.path().join("Documents/CheatCreator")
        );
    }
}

#[test]
fn missing_file_loads_defaults_without_creating_it() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("prefs.json");
    let prefs = Preferences::load(&path).unwrap();
    assert!(prefs.emulator_paths.is_empty());
    assert!(!path.exists());
}
