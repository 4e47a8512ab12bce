use specboard_core::registry::ProjectRegistry;
use specboard_core::watch::RootWatcher;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// How often the background loop rescans the root, independent of watch
/// events.
const RESCAN_INTERVAL: Duration = Duration::from_secs(60);

const WATCH_DEBOUNCE: Duration = Duration::from_secs(2);

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ProjectRegistry>,
}

impl AppState {
    pub fn new(root: PathBuf) -> Self {
        let registry = Arc::new(ProjectRegistry::new(root));

        // Initial scan, periodic rescans, and the root watcher all run in
        // the background. Guard: only spawn if inside a Tokio runtime
        // (skipped in sync unit tests).
        if tokio::runtime::Handle::try_current().is_ok() {
            let scanner = registry.clone();
            tokio::spawn(async move {
                loop {
                    if let Err(e) = scanner.scan_root().await {
                        tracing::warn!(error = %e, "project scan failed");
                    }
                    tokio::time::sleep(RESCAN_INTERVAL).await;
                }
            });

            let watched = registry.clone();
            tokio::spawn(async move {
                match RootWatcher::new(watched.root(), WATCH_DEBOUNCE) {
                    Ok(watcher) => watcher.run(watched).await,
                    Err(e) => tracing::warn!(error = %e, "filesystem watching unavailable"),
                }
            });
        }

        Self { registry }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_stores_root() {
        let state = AppState::new(PathBuf::from("/tmp/projects"));
        assert_eq!(state.registry.root(), std::path::Path::new("/tmp/projects"));
    }
}
