//! Environment variable behavior end-to-end tests.

use crate::common::assertions::assert_no_ansi;
use crate::common::fixtures::TestEnv;
use crate::common::init_test_logging;

#[test]
fn cheatx_format_env_sets_json_output() {
    init_test_logging();
    let env = TestEnv::new();
    let result = env.runner().with_env("CHEATX_FORMAT", "json").run(&["version"]);
    result.assert_success();

    let json: serde_json::Value = serde_json::from_str(result.stdout.trim())
        .expect("Expected JSON output with CHEATX_FORMAT=json");
    assert!(json.get("version").is_some());
}

#[test]
fn cheatx_format_env_sets_compact_json() {
    init_test_logging();
    let env = TestEnv::new();
    let result = env
        .runner()
        .with_env("CHEATX_FORMAT", "json-compact")
        .run(&["profiles"]);
    result.assert_success();

    let stdout = result.stdout.trim_end();
    assert_eq!(stdout.lines().count(), 1, "Expected compact JSON single line");
    let json: serde_json::Value =
        serde_json::from_str(stdout).expect("Expected JSON with CHEATX_FORMAT=json-compact");
    assert!(json.is_array());
}

#[test]
fn cli_format_flag_overrides_env() {
    init_test_logging();
    let env = TestEnv::new();
    let result = env
        .runner()
        .with_env("CHEATX_FORMAT", "json")
        .run(&["version", "--format=human"]);
    result.assert_success();

    assert!(
        serde_json::from_str::<serde_json::Value>(result.stdout.trim()).is_err(),
        "--format=human should override CHEATX_FORMAT=json"
    );
}

#[test]
fn text_is_accepted_as_human_format() {
    init_test_logging();
    let env = TestEnv::new();
    env.runner()
        .run(&["version", "--format", "text"])
        .assert_success()
        .assert_stdout_contains("cheatx");
}

#[test]
fn no_color_env_strips_ansi() {
    init_test_logging();
    let env = TestEnv::new();
    let result = env.runner().with_env("NO_COLOR", "1").run(&["profiles"]);
    result.assert_success();
    assert_no_ansi(&result.stdout);
}

#[test]
fn prefs_env_points_at_preferences_file() {
    init_test_logging();
    let env = TestEnv::new();
    env.write_prefs(&serde_json::json!({}));
    let result = env.runner().run_robot(&["config", "path"]);
    result.assert_success();

    let json = result.json();
    assert_eq!(
        json["path"].as_str(),
        Some(env.prefs_path().to_string_lossy().as_ref())
    );
}

#[test]
fn catalog_env_adds_profiles() {
    init_test_logging();
    let env = TestEnv::new();
    let catalog = env.write(
        "catalog.yaml",
        "profiles:\n  - id: mame\n    name: MAME\n    kind: generic\n    extensions: [\".dat\"]\n    default_extension: \".dat\"\n    subdir: MAME/cheat\n    filename_hint: \"<GameID>\"\n",
    );
    let result = env
        .runner()
        .with_env("CHEATX_CATALOG", &catalog.to_string_lossy())
        .run_robot(&["show", "mame"]);
    result.assert_success();
    result.assert_json_field("/id", &serde_json::json!("mame"));
    result.assert_json_field("/kind", &serde_json::json!("generic"));
}

#[test]
fn missing_catalog_is_a_config_error() {
    init_test_logging();
    let env = TestEnv::new();
    let missing = env.dir.path().join("nope.yaml");
    let result = env
        .runner()
        .with_env("CHEATX_CATALOG", &missing.to_string_lossy())
        .run_robot(&["profiles"]);
    result.assert_exit_code(1);

    let err = result.error_json();
    assert_eq!(err["kind"].as_str(), Some("config"));
}
