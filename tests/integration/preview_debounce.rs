//! Debounced preview recompute against real profiles.

use std::time::Duration;

use cheatx::config::Preferences;
use cheatx::plan::ExportFields;
use cheatx::preview::{DEFAULT_PREVIEW_DELAY, PreviewDebouncer, preview_for};
use cheatx::profile::ProfileRegistry;

fn switch_fields(tid: &str, bids: &str) -> ExportFields {
    ExportFields {
        title_id: Some(tid.to_string()),
        build_ids: Some(bids.to_string()),
        ..ExportFields::default()
    }
}

#[tokio::test(start_paused = true)]
async fn typing_a_build_id_settles_on_the_final_path() {
    let profile = ProfileRegistry::builtin()
        .find_by_id("atmosphere")
        .unwrap()
        .clone();
    let prefs = Preferences::with_export_root("/sd");
    let (mut debouncer, mut rx) =
        PreviewDebouncer::new(DEFAULT_PREVIEW_DELAY, move |f: &ExportFields| {
            preview_for(&profile, f, &prefs)
        });

    let tid = "0100ABCDEF123456";
    let bid = "1122334455667788";
    for end in [4, 8, 12, 16] {
        debouncer.schedule(switch_fields(tid, &bid[..end]));
        tokio::time::sleep(Duration::from_millis(30)).await;
    }

    let update = rx.recv().await.unwrap();
    assert_eq!(update.generation, 4);
    assert_eq!(
        update.text,
        format!("Export preview: /sd/atmosphere/contents/{tid}/cheats/{bid}.txt")
    );
    assert_eq!(debouncer.generation(), 4);
}

#[tokio::test(start_paused = true)]
async fn spaced_edits_each_produce_a_preview() {
    let profile = ProfileRegistry::builtin()
        .find_by_id("atmosphere")
        .unwrap()
        .clone();
    let prefs = Preferences::with_export_root("/sd");
    let (mut debouncer, mut rx) =
        PreviewDebouncer::new(DEFAULT_PREVIEW_DELAY, move |f: &ExportFields| {
            preview_for(&profile, f, &prefs)
        });

    debouncer.schedule(ExportFields::default());
    let first = rx.recv().await.unwrap();
    assert_eq!(first.generation, 1);
    assert!(first.text.contains("enter TID + BID"));

    debouncer.schedule(switch_fields("0100ABCDEF123456", ""));
    let second = rx.recv().await.unwrap();
    assert_eq!(second.generation, 2);
    assert!(second.text.contains("enter BID"));
}

#[tokio::test(start_paused = true)]
async fn cancel_drops_the_pending_preview() {
    let (mut debouncer, mut rx) =
        PreviewDebouncer::new(DEFAULT_PREVIEW_DELAY, |_: &ExportFields| "x".to_string());
    debouncer.schedule(ExportFields::default());
    debouncer.cancel();

    tokio::time::sleep(DEFAULT_PREVIEW_DELAY * 4).await;
    assert!(rx.try_recv().is_err());
}
