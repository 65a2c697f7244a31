//! Robot-mode end-to-end tests.

use serde_json::{Value, json};

use crate::common::assertions::{assert_json_has_fields, list_files};
use crate::common::fixtures::{BUILD_ID_A, BUILD_ID_B, SWITCH_DOC, TITLE_ID, TestEnv};
use crate::common::init_test_logging;

fn atmosphere_env() -> TestEnv {
    let env = TestEnv::new();
    env.write_prefs(&json!({}));
    env.write("cheats.txt", SWITCH_DOC);
    env
}

#[test]
fn robot_quick_start_outputs_json() {
    init_test_logging();
    let env = TestEnv::new();
    let result = env.runner().run_robot(&[]);
    result.assert_success();

    let json = result.json();
    assert_eq!(json.get("tool").and_then(Value::as_str), Some("cheatx"));
    assert_json_has_fields(&result.stdout, &["discovery", "export", "fields", "output_modes", "advisories"]);
}

#[test]
fn robot_profiles_lists_every_builtin() {
    init_test_logging();
    let env = TestEnv::new();
    let result = env.runner().run_robot(&["profiles"]);
    result.assert_success().assert_json_array_len("", 19);

    let json = result.json();
    let ids: Vec<&str> = json
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|p| p["id"].as_str())
        .collect();
    assert!(ids.contains(&"atmosphere"));
    assert!(ids.contains(&"retroarch"));
}

#[test]
fn robot_show_outputs_profile() {
    init_test_logging();
    let env = TestEnv::new();
    let result = env.runner().run_robot(&["show", "dolphin"]);
    result
        .assert_success()
        .assert_json_field("/id", &json!("dolphin"))
        .assert_json_field("/default_extension", &json!(".ini"));
}

#[test]
fn robot_unknown_profile_reports_error_json() {
    init_test_logging();
    let env = TestEnv::new();
    let result = env.runner().run_robot(&["show", "no-such-emulator"]);
    result.assert_exit_code(1);
    assert!(result.stdout.trim().is_empty());

    let err = assert_json_has_fields(&result.stderr, &["error", "kind", "message", "suggestion", "recoverable"]);
    assert_eq!(err["kind"], json!("profile"));
    assert_eq!(err["recoverable"], json!(true));
}

#[test]
fn robot_plan_lists_one_file_per_build_id() {
    init_test_logging();
    let env = atmosphere_env();
    let bids = format!("{BUILD_ID_A},{BUILD_ID_B}");
    let result = env
        .runner()
        .run_robot(&["plan", "atmosphere", "--tid", TITLE_ID, "--bid", &bids]);
    result
        .assert_success()
        .assert_json_field("/blocked", &json!(false))
        .assert_json_array_len("/plan/files", 2);

    let json = result.json();
    let first = json["plan"]["files"][0].as_str().unwrap_or_default();
    assert!(first.ends_with(&format!("{BUILD_ID_A}.txt")), "{first}");
    assert!(first.contains(TITLE_ID));
    assert!(
        json["preview"]
            .as_str()
            .is_some_and(|p| p.starts_with("Export preview:"))
    );
    // Planning never touches the disk.
    assert!(!env.export_root().exists());
}

#[test]
fn robot_plan_without_fields_is_blocked() {
    init_test_logging();
    let env = atmosphere_env();
    let result = env.runner().run_robot(&["plan", "atmosphere"]);
    result.assert_success().assert_json_field("/blocked", &json!(true));

    let json = result.json();
    let fields: Vec<&str> = json["issues"]
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|i| i["field"].as_str())
        .collect();
    assert!(fields.contains(&"title_id"));
    assert!(fields.contains(&"build_ids"));
}

#[test]
fn robot_plan_retroarch_without_document_needs_game_name() {
    init_test_logging();
    let env = atmosphere_env();
    let result = env.runner().run_robot(&["plan", "retroarch"]);
    result.assert_success().assert_json_field("/blocked", &json!(true));

    let json = result.json();
    let fields: Vec<&str> = json["issues"]
        .as_array()
        .into_iter()
        .flatten()
        .filter(|i| i["severity"] == json!("blocking"))
        .filter_map(|i| i["field"].as_str())
        .collect();
    assert_eq!(fields, vec!["identifier"]);
    assert!(
        !json["plan"]["files"]
            .as_array()
            .into_iter()
            .flatten()
            .any(|f| f.as_str().is_some_and(|p| p.ends_with("Cheats.cht")))
    );
}

#[test]
fn robot_export_writes_every_file() {
    init_test_logging();
    let env = atmosphere_env();
    let bids = format!("{BUILD_ID_A} {BUILD_ID_B}");
    let result = env.runner().run_robot(&[
        "export",
        "atmosphere",
        "-d",
        "cheats.txt",
        "--tid",
        TITLE_ID,
        "--bid",
        &bids,
    ]);
    result
        .assert_success()
        .assert_json_field("/ok", &json!(true))
        .assert_json_array_len("/written", 2);

    let files = list_files(&env.export_root());
    assert_eq!(
        files,
        vec![
            format!("atmosphere/contents/{TITLE_ID}/cheats/{BUILD_ID_A}.txt"),
            format!("atmosphere/contents/{TITLE_ID}/cheats/{BUILD_ID_B}.txt"),
        ]
    );
    let written = env.export_root().join(&files[0]);
    assert_eq!(env.read(&written), SWITCH_DOC);
}

#[test]
fn robot_export_declines_advisories_without_yes() {
    init_test_logging();
    let env = atmosphere_env();
    let bids = format!("{BUILD_ID_A},12345");
    let result = env.runner().run_robot(&[
        "export",
        "atmosphere",
        "-d",
        "cheats.txt",
        "--tid",
        TITLE_ID,
        "--bid",
        &bids,
    ]);
    result.assert_exit_code(1);
    assert_eq!(result.error_json()["kind"], json!("advisory"));
    assert!(!env.export_root().exists());
}

#[test]
fn robot_export_with_yes_accepts_advisories() {
    init_test_logging();
    let env = atmosphere_env();
    let bids = format!("{BUILD_ID_A},12345");
    let result = env.runner().run_robot(&[
        "export",
        "atmosphere",
        "-d",
        "cheats.txt",
        "--tid",
        TITLE_ID,
        "--bid",
        &bids,
        "--yes",
    ]);
    result.assert_success().assert_json_array_len("/written", 2);

    let json = result.json();
    assert!(
        !json["accepted_advisories"]
            .as_array()
            .is_none_or(Vec::is_empty)
    );
}

#[test]
fn robot_blocked_export_lists_issues() {
    init_test_logging();
    let env = atmosphere_env();
    let result = env
        .runner()
        .run_robot(&["export", "atmosphere", "-d", "cheats.txt", "--yes"]);
    result.assert_exit_code(1);

    let err = result.error_json();
    assert_eq!(err["kind"], json!("validation"));
    assert!(err["issues"].as_array().is_some_and(|i| i.len() >= 2));
    assert!(!env.export_root().exists());
}

#[test]
fn robot_detect_reads_atmosphere_layout() {
    init_test_logging();
    let env = TestEnv::new();
    let path = env.write(
        &format!("sd/atmosphere/contents/{TITLE_ID}/cheats/{BUILD_ID_A}.txt"),
        SWITCH_DOC,
    );
    let result = env
        .runner()
        .run_robot(&["detect", &path.to_string_lossy()]);
    result
        .assert_success()
        .assert_json_field("/inference/title_id", &json!(TITLE_ID))
        .assert_json_field("/inference/build_id", &json!(BUILD_ID_A));
}

#[test]
fn compact_format_emits_one_line() {
    init_test_logging();
    let env = TestEnv::new();
    let result = env.runner().run(&["--format=json-compact", "show", "retroarch"]);
    result.assert_success();
    assert_eq!(result.stdout.trim_end().lines().count(), 1);
    result.assert_json_field("/kind", &json!("retroarch"));
}
