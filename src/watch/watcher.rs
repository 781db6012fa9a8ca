// src/watch/watcher.rs

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use notify::{EventKind, RecommendedWatcher, RecursiveMode};
use notify_debouncer_full::{new_debouncer, DebounceEventResult, Debouncer, RecommendedCache};
use tracing::{debug, error, info};

use crate::graph::{execute, RunContext};
use crate::reload::ReloadChannel;
use crate::watch::bindings::WatchBinding;

/// Debounce window for coalescing editor write bursts into one dispatch.
const DEBOUNCE_WINDOW: Duration = Duration::from_millis(100);

/// Handle for the filesystem watcher.
///
/// This exists mainly so the underlying debouncer (and its watcher) is
/// kept alive for as long as needed. Dropping this handle stops file
/// watching.
pub struct WatcherHandle {
    _inner: Debouncer<RecommendedWatcher, RecommendedCache>,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// Spawn a debounced filesystem watcher over `root` and dispatch matching
/// bindings as changes arrive.
///
/// Dispatch is asynchronous: each fired binding runs its node on its own
/// Tokio task, so a long build never blocks detection of further changes.
/// A failed run is logged and the watcher keeps going; the dev loop
/// favors availability over strictness.
pub fn spawn_watcher(
    root: impl Into<PathBuf>,
    bindings: Vec<WatchBinding>,
    ctx: RunContext,
    reload: ReloadChannel,
) -> Result<WatcherHandle> {
    let root = root.into();
    let root = root.canonicalize().unwrap_or_else(|_| root.clone()); // best-effort

    let bindings = Arc::new(bindings);

    // Channel from the blocking debouncer callback into the async world.
    let (event_tx, mut event_rx) =
        tokio::sync::mpsc::unbounded_channel::<Vec<notify_debouncer_full::DebouncedEvent>>();

    let mut debouncer = new_debouncer(DEBOUNCE_WINDOW, None, {
        move |result: DebounceEventResult| match result {
            Ok(events) => {
                if let Err(err) = event_tx.send(events) {
                    // We can't log via tracing here easily, so fallback to stderr.
                    eprintln!("assetpipe: failed to forward watch events: {err}");
                }
            }
            Err(errors) => {
                for err in errors {
                    eprintln!("assetpipe: file watch error: {err}");
                }
            }
        }
    })?;

    debouncer.watch(&root, RecursiveMode::Recursive)?;

    info!("file watcher started on {:?}", root);

    let async_root = root.clone();
    let async_bindings = Arc::clone(&bindings);
    tokio::spawn(async move {
        while let Some(events) = event_rx.recv().await {
            debug!(count = events.len(), "received debounced event batch");

            // One batch fires each matching binding at most once, even when
            // several of its paths changed together.
            let mut fired: BTreeSet<usize> = BTreeSet::new();

            for event in &events {
                if !matches!(
                    event.event.kind,
                    EventKind::Create(..) | EventKind::Modify(..) | EventKind::Remove(..)
                ) {
                    continue;
                }
                for path in &event.event.paths {
                    let Some(rel_str) = relative_str(&async_root, path) else {
                        continue;
                    };
                    for (i, binding) in async_bindings.iter().enumerate() {
                        if binding.matches(&rel_str) {
                            debug!(
                                binding = %binding.name(),
                                path = %rel_str,
                                "watch match"
                            );
                            fired.insert(i);
                        }
                    }
                }
            }

            for i in fired {
                dispatch(Arc::clone(&async_bindings), i, ctx.clone(), reload.clone());
            }
        }

        debug!("file watcher loop ended");
    });

    Ok(WatcherHandle { _inner: debouncer })
}

/// Run one binding on its own task: execute the node (if any), then emit
/// the reload signal on success.
fn dispatch(bindings: Arc<Vec<WatchBinding>>, index: usize, ctx: RunContext, reload: ReloadChannel) {
    tokio::spawn(async move {
        let binding = &bindings[index];
        info!(binding = %binding.name(), "dispatching watch binding");

        if let Some(node) = &binding.node {
            match execute(node, &ctx).await {
                Ok(()) => {
                    if let Some(kind) = binding.reload {
                        reload.notify(kind);
                    }
                }
                Err(err) => {
                    // Never fatal: report and keep the dev loop alive.
                    error!(binding = %binding.name(), error = %err, "triggered run failed");
                }
            }
        } else if let Some(kind) = binding.reload {
            reload.notify(kind);
        }
    });
}

/// Convert a path into a string relative to `root`, with forward slashes.
///
/// Returns `None` if the path is not under `root` and cannot be
/// relativized.
fn relative_str(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let s = rel.to_string_lossy().replace('\\', "/");
    Some(s)
}
