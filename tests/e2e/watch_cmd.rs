//! E2E tests for the watch command's single-shot mode.

use std::time::Duration;

use serde_json::json;

use crate::common::fixtures::{BUILD_ID_A, BUILD_ID_B, TITLE_ID, TestEnv};
use crate::common::init_test_logging;

fn watch_env(fields: &str, name: &str) -> TestEnv {
    let env = TestEnv::new();
    env.write_prefs(&json!({}));
    env.write(name, fields);
    env
}

#[test]
fn watch_once_prints_single_file_preview() {
    init_test_logging();
    let fields = format!("{{\"title_id\": \"{TITLE_ID}\", \"build_ids\": \"{BUILD_ID_A}\"}}");
    let env = watch_env(&fields, "fields.json");
    let result = env.runner().run(&["watch", "atmosphere", "fields.json", "--once"]);
    result.assert_success();

    let expected = env
        .export_root()
        .join("atmosphere/contents")
        .join(TITLE_ID)
        .join("cheats")
        .join(format!("{BUILD_ID_A}.txt"));
    result.assert_stdout_contains(&format!("Export preview: {}", expected.display()));
}

#[test]
fn watch_once_lists_multiple_build_ids() {
    init_test_logging();
    let fields = format!("title_id: \"{TITLE_ID}\"\nbuild_ids: \"{BUILD_ID_A}, {BUILD_ID_B}\"\n");
    let env = watch_env(&fields, "fields.yaml");
    let result = env.runner().run(&["watch", "atmosphere", "fields.yaml", "--once"]);
    result
        .assert_success()
        .assert_stdout_contains(&format!("{BUILD_ID_A}.txt  {BUILD_ID_B}.txt"));
}

#[test]
fn watch_once_asks_for_missing_switch_ids() {
    init_test_logging();
    let env = watch_env("", "fields.toml");
    env.runner()
        .run(&["watch", "atmosphere", "fields.toml", "--once"])
        .assert_success()
        .assert_stdout_contains("enter TID + BID");
}

#[test]
fn watch_once_robot_emits_generation_line() {
    init_test_logging();
    let env = watch_env("identifier = \"GMSE01\"\n", "fields.toml");
    env.write("game.ini", "[ActionReplay]\n$Moon Jump\n00000000 00000000\n");
    let result = env.runner().run_robot(&[
        "watch",
        "dolphin",
        "fields.toml",
        "--document",
        "game.ini",
        "--once",
    ]);
    result
        .assert_success()
        .assert_duration_under(Duration::from_secs(10))
        .assert_json_field("/generation", &json!(0));

    let preview = result.json()["preview"].as_str().unwrap_or_default().to_string();
    assert!(preview.ends_with("GMSE01.ini"), "{preview}");
}

#[test]
fn watch_rejects_unknown_fields_format() {
    init_test_logging();
    let env = watch_env("title_id=1", "fields.ini");
    let result = env
        .runner()
        .run_robot(&["watch", "atmosphere", "fields.ini", "--once"]);
    result.assert_exit_code(1);
    assert_eq!(result.error_json()["kind"], json!("prefs"));
}

#[test]
fn watch_reports_missing_document() {
    init_test_logging();
    let env = watch_env("{}", "fields.json");
    let result = env.runner().run_robot(&[
        "watch",
        "atmosphere",
        "fields.json",
        "-d",
        "missing.txt",
        "--once",
    ]);
    result.assert_exit_code(1);
    assert_eq!(result.error_json()["kind"], json!("other"));
}
