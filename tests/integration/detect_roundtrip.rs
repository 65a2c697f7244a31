//! Fields inferred from an exported file plan back to the same file.

use cheatx::config::Preferences;
use cheatx::detect::infer_fields;
use cheatx::export::{AcceptAll, ExportExecutor, ExportRequest};
use cheatx::plan::{ExportFields, PathPlanner};
use cheatx::profile::ProfileRegistry;
use tempfile::TempDir;

fn round_trip(profile_id: &str, fields: ExportFields, document: &str) {
    let dir = TempDir::new().unwrap();
    let prefs = Preferences::with_export_root(dir.path());
    let registry = ProfileRegistry::builtin();
    let profile = registry.find_by_id(profile_id).unwrap();

    let report = ExportExecutor::new(&prefs)
        .run(
            ExportRequest {
                profile,
                fields,
                document,
            },
            &mut AcceptAll,
        )
        .unwrap();
    let written = &report.written[0];

    let text = std::fs::read_to_string(written).unwrap();
    let inference = infer_fields(written, &text, &registry, &prefs.retroarch_cores);
    assert_eq!(inference.profile_id.as_deref(), Some(profile_id), "{:?}", inference.hints);

    let replanned = PathPlanner::new(&prefs).resolve(profile, &inference.to_fields().with_document(&text));
    assert_eq!(&replanned.files[0], written);
}

#[test]
fn atmosphere_file_round_trips() {
    round_trip(
        "atmosphere",
        ExportFields {
            title_id: Some("0100abcdef123456".to_string()),
            build_ids: Some("1122334455667788".to_string()),
            ..ExportFields::default()
        },
        "[Infinite HP]\n04000000 00123456 0000270F\n",
    );
}

#[test]
fn retroarch_file_round_trips() {
    round_trip(
        "retroarch",
        ExportFields {
            core_name: Some("Snes9x".to_string()),
            identifier: Some("Super Metroid".to_string()),
            ..ExportFields::default()
        },
        "cheats = 1\n\ncheat0_desc = \"Infinite HP\"\ncheat0_code = \"7E09C2FF\"\ncheat0_enable = true\n",
    );
}

#[test]
fn dolphin_file_round_trips() {
    round_trip(
        "dolphin",
        ExportFields {
            identifier: Some("GMSE01".to_string()),
            ..ExportFields::default()
        },
        "[ActionReplay]\n$Moon Jump\n00000000 00000000\n",
    );
}

#[test]
fn header_ids_are_read_from_downloaded_text() {
    let registry = ProfileRegistry::builtin();
    let prefs = Preferences::default();
    let text = "TID: 0100ABCDEF123456\nBID: 1122334455667788\n\n[Infinite HP]\n04000000 00123456 0000270F\n";
    let inference = infer_fields(
        std::path::Path::new("/downloads/some game.txt"),
        text,
        &registry,
        &prefs.retroarch_cores,
    );
    assert_eq!(inference.title_id.as_deref(), Some("0100ABCDEF123456"));
    assert_eq!(inference.build_id.as_deref(), Some("1122334455667788"));
    assert_eq!(inference.profile_id.as_deref(), Some("atmosphere"));
}
