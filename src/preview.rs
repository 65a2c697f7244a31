//! Export preview text and the debounced recompute used while fields are
//! being edited.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::trace;

use crate::config::Preferences;
use crate::plan::sanitize::clean_hex;
use crate::plan::{ExportFields, ExportPlan, PathPlanner};
use crate::profile::{Profile, ProfileKind};

/// Idle time before a scheduled preview is computed.
pub const DEFAULT_PREVIEW_DELAY: Duration = Duration::from_millis(160);

/// File names listed before the remainder is summarized.
const MAX_LISTED_FILES: usize = 6;

/// Preview line(s) for a resolved plan.
pub fn render(plan: &ExportPlan, fields: &ExportFields) -> String {
    if plan.kind == ProfileKind::Switch {
        let mut missing = Vec::new();
        if fields.title_id().is_none_or(|tid| clean_hex(tid).len() != 16) {
            missing.push("TID");
        }
        if fields.build_id_list().is_empty() {
            missing.push("BID");
        }
        if !missing.is_empty() {
            return format!(
                "Export preview: enter {} to see final output path.",
                missing.join(" + ")
            );
        }
    }
    match plan.files.as_slice() {
        [] => "Export preview: (no output)".to_string(),
        [only] => format!("Export preview: {}", only.display()),
        files => {
            let names: Vec<String> = files
                .iter()
                .take(MAX_LISTED_FILES)
                .map(|f| {
                    f.file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default()
                })
                .collect();
            let mut lines = vec![
                format!("Export preview: {}", plan.out_dir.display()),
                format!("  {}", names.join("  ")),
            ];
            let more = files.len().saturating_sub(MAX_LISTED_FILES);
            if more > 0 {
                lines.push(format!("  … +{more} more"));
            }
            lines.join("\n")
        }
    }
}

/// Plan and render in one step.
pub fn preview_for(profile: &Profile, fields: &ExportFields, prefs: &Preferences) -> String {
    render(&PathPlanner::new(prefs).resolve(profile, fields), fields)
}

/// A computed preview and the schedule call it answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewUpdate {
    pub generation: u64,
    pub text: String,
}

/// Coalesces rapid field edits into one recompute after an idle delay.
///
/// Every [`schedule`](Self::schedule) supersedes the pending one; only the
/// latest generation is ever delivered. Must be used inside a tokio runtime.
pub struct PreviewDebouncer<F> {
    delay: Duration,
    compute: Arc<F>,
    latest: Arc<AtomicU64>,
    pending: Option<JoinHandle<()>>,
    tx: mpsc::UnboundedSender<PreviewUpdate>,
}

impl<F> PreviewDebouncer<F>
where
    F: Fn(&ExportFields) -> String + Send + Sync + 'static,
{
    pub fn new(delay: Duration, compute: F) -> (Self, mpsc::UnboundedReceiver<PreviewUpdate>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let debouncer = Self {
            delay,
            compute: Arc::new(compute),
            latest: Arc::new(AtomicU64::new(0)),
            pending: None,
            tx,
        };
        (debouncer, rx)
    }

    /// Queue a recompute for `fields`, replacing any pending one. Returns the
    /// generation number of this request.
    pub fn schedule(&mut self, fields: ExportFields) -> u64 {
        let generation = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        self.cancel_pending();

        let delay = self.delay;
        let compute = Arc::clone(&self.compute);
        let latest = Arc::clone(&self.latest);
        let tx = self.tx.clone();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if latest.load(Ordering::SeqCst) != generation {
                return;
            }
            let text = compute(&fields);
            // A newer schedule may have arrived while computing.
            if latest.load(Ordering::SeqCst) == generation {
                trace!(generation, "Preview recomputed");
                let _ = tx.send(PreviewUpdate { generation, text });
            }
        }));
        generation
    }

    /// Generation of the most recent schedule call.
    pub fn generation(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }

    /// Drop the pending recompute without scheduling another.
    pub fn cancel(&mut self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
        self.cancel_pending();
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl<F> Drop for PreviewDebouncer<F> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}
