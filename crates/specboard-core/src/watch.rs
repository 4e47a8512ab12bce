//! Filesystem watching for the projects root.
//!
//! Watch scope is the immediate children of the root only — changes nested
//! inside a project never touch the registry. Events are debounced so a
//! burst of directory churn collapses into one pass.

use crate::error::{Result, SpecboardError};
use crate::registry::ProjectRegistry;
use notify::{EventKind, RecursiveMode, Watcher};
use notify_debouncer_full::{new_debouncer, DebounceEventResult, Debouncer, FileIdMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// A change to an immediate child of the watched root.
#[derive(Debug, Clone, PartialEq)]
pub enum RootChange {
    Created(PathBuf),
    Removed(PathBuf),
}

/// Map one raw notify event to root-child changes.
fn root_changes(root: &Path, event: &notify::Event) -> Vec<RootChange> {
    if !matches!(event.kind, EventKind::Create(_) | EventKind::Remove(_)) {
        return Vec::new();
    }
    event
        .paths
        .iter()
        .filter(|path| path.parent() == Some(root))
        .map(|path| match event.kind {
            EventKind::Create(_) => RootChange::Created(path.clone()),
            _ => RootChange::Removed(path.clone()),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// RootWatcher
// ---------------------------------------------------------------------------

pub struct RootWatcher {
    // Kept alive for the duration of the watch; dropping it stops notify.
    _debouncer: Debouncer<notify::RecommendedWatcher, FileIdMap>,
    rx: mpsc::Receiver<RootChange>,
}

impl RootWatcher {
    /// Watch `root` (non-recursive) with the given debounce window.
    pub fn new(root: &Path, debounce: Duration) -> Result<Self> {
        let (tx, rx) = mpsc::channel(64);
        let watched = root.to_path_buf();

        let mut debouncer = new_debouncer(debounce, None, move |result: DebounceEventResult| {
            match result {
                Ok(events) => {
                    for event in &events {
                        for change in root_changes(&watched, event) {
                            // Receiver gone means the watcher is shutting down.
                            let _ = tx.blocking_send(change);
                        }
                    }
                }
                Err(errors) => {
                    for error in errors {
                        tracing::warn!(%error, "filesystem watch error");
                    }
                }
            }
        })
        .map_err(|e| SpecboardError::Watch(e.to_string()))?;

        debouncer
            .watcher()
            .watch(root, RecursiveMode::NonRecursive)
            .map_err(|e| SpecboardError::Watch(e.to_string()))?;

        Ok(Self {
            _debouncer: debouncer,
            rx,
        })
    }

    /// Next debounced change, or `None` once the watcher backend is gone.
    pub async fn recv(&mut self) -> Option<RootChange> {
        self.rx.recv().await
    }

    /// Apply changes to the registry until the channel closes.
    pub async fn run(mut self, registry: Arc<ProjectRegistry>) {
        while let Some(change) = self.rx.recv().await {
            match change {
                RootChange::Created(path) => {
                    tracing::debug!(path = %path.display(), "directory appeared under root");
                    registry.note_created(path).await;
                }
                RootChange::Removed(path) => {
                    tracing::debug!(path = %path.display(), "directory removed from root");
                    registry.note_removed(&path);
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
