//! Integration tests for the export pipeline.

use std::path::{Path, PathBuf};

use cheatx::config::Preferences;
use cheatx::error::{CxError, Result};
use cheatx::export::{AcceptAll, ExportExecutor, ExportRequest};
use cheatx::plan::ExportFields;
use cheatx::profile::{Profile, ProfileKind, ProfileRegistry};
use cheatx::validate::{FieldId, Issue};
use tempfile::TempDir;

const DOC: &str = "[Infinite HP]\n04000000 00123456 0000270F\n";
const TID: &str = "0100ABCDEF123456";
const BID_A: &str = "1122334455667788";
const BID_B: &str = "99AABBCCDDEEFF00";

fn profile(id: &str) -> Profile {
    ProfileRegistry::builtin()
        .find_by_id(id)
        .unwrap_or_else(|| panic!("builtin profile {id}"))
        .clone()
}

fn full_fields() -> ExportFields {
    ExportFields {
        title_id: Some(TID.to_string()),
        build_ids: Some(BID_A.to_string()),
        core_name: Some("Snes9x".to_string()),
        identifier: Some("GMSE01".to_string()),
        ..ExportFields::default()
    }
}

fn switch_fields(bids: &str) -> ExportFields {
    ExportFields {
        title_id: Some(TID.to_string()),
        build_ids: Some(bids.to_string()),
        ..ExportFields::default()
    }
}

fn export(prefs: &Preferences, profile: &Profile, fields: ExportFields) -> Result<Vec<PathBuf>> {
    ExportExecutor::new(prefs)
        .run(
            ExportRequest {
                profile,
                fields,
                document: DOC,
            },
            &mut AcceptAll,
        )
        .map(|report| report.written)
}

#[test]
fn every_builtin_profile_exports_under_the_root() {
    let dir = TempDir::new().unwrap();
    let prefs = Preferences::with_export_root(dir.path());
    let registry = ProfileRegistry::builtin();

    for profile in registry.profiles() {
        let written = export(&prefs, profile, full_fields())
            .unwrap_or_else(|e| panic!("{} failed: {e}", profile.id));
        assert!(!written.is_empty(), "{} wrote nothing", profile.id);
        for path in &written {
            assert!(path.starts_with(dir.path()), "{} escaped: {}", profile.id, path.display());
            assert_eq!(std::fs::read_to_string(path).unwrap(), DOC);
            let name = path.file_name().unwrap().to_string_lossy();
            assert!(!name.contains(['<', '>']), "{} left a placeholder: {name}", profile.id);
        }
    }
}

#[test]
fn switch_exports_one_file_per_unique_build_id() {
    let dir = TempDir::new().unwrap();
    let prefs = Preferences::with_export_root(dir.path());
    let bids = format!("{BID_A}\n{BID_B}, {BID_A}");
    let written = export(&prefs, &profile("atmosphere"), switch_fields(&bids)).unwrap();

    let cheats = dir.path().join("atmosphere/contents").join(TID).join("cheats");
    assert_eq!(
        written,
        vec![cheats.join(format!("{BID_A}.txt")), cheats.join(format!("{BID_B}.txt"))]
    );
}

#[test]
fn yuzu_folder_uses_first_document_line() {
    let dir = TempDir::new().unwrap();
    let prefs = Preferences::with_export_root(dir.path());
    let written = export(&prefs, &profile("yuzu"), switch_fields(BID_A)).unwrap();

    let expected = dir
        .path()
        .join("yuzu/load")
        .join(TID)
        .join("[Infinite HP]/cheats")
        .join(format!("{BID_A}.txt"));
    assert_eq!(written, vec![expected]);
}

#[test]
fn pinned_profile_ignores_every_override() {
    let dir = TempDir::new().unwrap();
    let mut prefs = Preferences::with_export_root(dir.path().join("sd"));
    prefs
        .emulator_paths
        .insert("atmosphere".to_string(), dir.path().join("elsewhere").display().to_string());
    let mut fields = switch_fields(BID_A);
    fields.root_override = Some(dir.path().join("other").display().to_string());

    let written = export(&prefs, &profile("atmosphere"), fields).unwrap();
    assert!(written[0].starts_with(dir.path().join("sd")));
    assert!(!dir.path().join("elsewhere").exists());
    assert!(!dir.path().join("other").exists());
}

#[test]
fn profile_override_redirects_export() {
    let dir = TempDir::new().unwrap();
    let emu = profile("dolphin");
    let mut prefs = Preferences::with_export_root(dir.path().join("sd"));
    prefs
        .set_override(&emu, &dir.path().join("dolphin-user").display().to_string())
        .unwrap();

    let written = export(&prefs, &emu, full_fields()).unwrap();
    assert_eq!(
        written,
        vec![dir.path().join("dolphin-user/Dolphin Emulator/GameSettings/GMSE01.ini")]
    );
}

#[test]
fn retroarch_default_core_has_no_subfolder() {
    let dir = TempDir::new().unwrap();
    let prefs = Preferences::with_export_root(dir.path());
    let fields = ExportFields {
        identifier: Some("Super Metroid".to_string()),
        ..ExportFields::default()
    };
    let written = export(&prefs, &profile("retroarch"), fields).unwrap();
    assert_eq!(written, vec![dir.path().join("RetroArch/cheats/Super Metroid.cht")]);
}

#[test]
fn declined_advisories_write_nothing() {
    let dir = TempDir::new().unwrap();
    let prefs = Preferences::with_export_root(dir.path());
    let emu = profile("atmosphere");
    let mut seen: Vec<Issue> = Vec::new();
    let mut decline = |issues: &[Issue]| {
        seen.extend_from_slice(issues);
        false
    };

    let err = ExportExecutor::new(&prefs)
        .run(
            ExportRequest {
                profile: &emu,
                fields: switch_fields(&format!("{BID_A},XYZ12")),
                document: DOC,
            },
            &mut decline,
        )
        .unwrap_err();

    assert!(matches!(err, CxError::AdvisoryDeclined { count: 1 }));
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].field, FieldId::BuildIds);
    assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
}

#[test]
fn empty_document_is_blocked() {
    let dir = TempDir::new().unwrap();
    let prefs = Preferences::with_export_root(dir.path());
    let emu = profile("dolphin");
    let err = ExportExecutor::new(&prefs)
        .run(
            ExportRequest {
                profile: &emu,
                fields: full_fields(),
                document: "  \n",
            },
            &mut AcceptAll,
        )
        .unwrap_err();

    assert_eq!(err.kind(), "validation");
    let CxError::Blocked { issues } = err else {
        panic!("expected a blocked export");
    };
    assert!(issues.iter().any(|i| i.field == FieldId::Document));
}

#[test]
fn partial_write_reports_files_already_written() {
    let dir = TempDir::new().unwrap();
    let prefs = Preferences::with_export_root(dir.path());
    let cheats = dir.path().join("atmosphere/contents").join(TID).join("cheats");
    // A directory where the second file should go makes that write fail.
    std::fs::create_dir_all(cheats.join(format!("{BID_B}.txt"))).unwrap();

    let err = export(
        &prefs,
        &profile("atmosphere"),
        switch_fields(&format!("{BID_A},{BID_B}")),
    )
    .unwrap_err();

    let CxError::Materialize { path, written, .. } = err else {
        panic!("expected a materialize error");
    };
    assert_eq!(path, cheats.join(format!("{BID_B}.txt")));
    assert_eq!(written, vec![cheats.join(format!("{BID_A}.txt"))]);
    assert!(Path::new(&written[0]).is_file());
}

#[test]
fn custom_singlefile_profile_uses_fixed_name() {
    let dir = TempDir::new().unwrap();
    let prefs = Preferences::with_export_root(dir.path());
    let mut custom = Profile::minimal("custom-emu", "My Emu", ".cfg");
    custom.kind = ProfileKind::Singlefile;
    custom.subdir = "MyEmu/<GameID>".to_string();
    custom.fixed_filename = Some("cheats.cfg".to_string());

    let written = export(&prefs, &custom, full_fields()).unwrap();
    assert_eq!(written, vec![dir.path().join("MyEmu/GMSE01/cheats.cfg")]);
}
